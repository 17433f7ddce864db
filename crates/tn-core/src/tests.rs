//! Unit tests for tn-core.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, TrailId, VertexId};

    #[test]
    fn invalid_sentinel_is_default() {
        assert_eq!(VertexId::default(), VertexId::INVALID);
        assert_eq!(EdgeId::default(), EdgeId::INVALID);
        assert_eq!(VertexId::INVALID.0, u32::MAX);
    }

    #[test]
    fn index_round_trip() {
        let v = VertexId(42);
        assert_eq!(v.index(), 42);
        assert_eq!(usize::from(v), 42);
    }

    #[test]
    fn trail_id_orders_lexicographically() {
        let a = TrailId::from("trail-00a");
        let b = TrailId::from("trail-00b");
        assert!(a < b);
        assert_eq!(a.as_str(), "trail-00a");
    }

    #[test]
    fn display_forms() {
        assert_eq!(VertexId(7).to_string(), "VertexId(7)");
        assert_eq!(TrailId::from("t1").to_string(), "t1");
    }
}

#[cfg(test)]
mod units {
    use crate::units::*;

    #[test]
    fn degree_meter_round_trip() {
        let m = 150.0;
        let deg = meters_to_degrees(m);
        assert!((degrees_to_meters(deg) - m).abs() < 1e-9);
    }

    #[test]
    fn one_degree_is_the_locked_constant() {
        assert_eq!(degrees_to_meters(1.0), METERS_PER_DEGREE);
    }

    #[test]
    fn km_conversions() {
        assert_eq!(meters_to_km(1_500.0), 1.5);
        assert_eq!(km_to_meters(0.25), 250.0);
    }
}

#[cfg(test)]
mod config {
    use crate::{BBox, ConfigError, NetworkConfig, TopologyStrategy};

    #[test]
    fn default_is_valid() {
        let cfg = NetworkConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.strategy, TopologyStrategy::NodeNetwork);
    }

    #[test]
    fn rejects_non_positive_tolerance() {
        let cfg = NetworkConfig { edge_snap_tol_m: 0.0, ..Default::default() };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositiveTolerance { name: "edge_snap_tol_m", .. })
        ));
    }

    #[test]
    fn rejects_inverted_gap_band() {
        let cfg = NetworkConfig { gap_min_m: 30.0, gap_max_m: 20.0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidGapBand { .. })));
    }

    #[test]
    fn rejects_zero_merge_budget() {
        let cfg = NetworkConfig { degree2_max_iterations: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroIterationBudget)));
    }

    #[test]
    fn rejects_inverted_bbox() {
        let cfg = NetworkConfig {
            bbox: Some(BBox::new(1.0, 0.0, 0.0, 1.0)),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidBBox)));
    }

    #[test]
    fn bbox_contains_boundary() {
        let b = BBox::new(-1.0, -1.0, 1.0, 1.0);
        assert!(b.contains(0.0, 0.0));
        assert!(b.contains(1.0, -1.0));
        assert!(!b.contains(1.000001, 0.0));
    }
}
