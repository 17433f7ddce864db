//! Unit tests for tn-geom.
//!
//! All fixtures are hand-crafted degree-scale lines near the origin so
//! planar expectations stay easy to read.

#[cfg(test)]
mod helpers {
    use geo::{Coord, LineString};

    pub fn line(coords: &[(f64, f64)]) -> LineString<f64> {
        LineString::new(coords.iter().map(|&(x, y)| Coord { x, y }).collect())
    }
}

#[cfg(test)]
mod kernel {
    use geo::Point;

    use super::helpers::line;
    use crate::kernel::*;
    use crate::GeomError;

    #[test]
    fn validity_requires_two_finite_points_and_length() {
        assert!(is_valid(&line(&[(0.0, 0.0), (1.0, 0.0)])));
        assert!(!is_valid(&line(&[(0.0, 0.0)])));
        assert!(!is_valid(&line(&[(0.0, 0.0), (f64::NAN, 0.0)])));
        assert!(!is_valid(&line(&[(0.0, 0.0), (0.0, 0.0)])));
        assert!(matches!(
            ensure_valid(&line(&[(0.0, 0.0)])),
            Err(GeomError::InvalidGeometry { reason: "fewer than 2 points" })
        ));
    }

    #[test]
    fn simplicity() {
        // Straight polyline with a collinear interior vertex is simple.
        assert!(is_simple(&line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])));
        // A bowtie crosses itself.
        assert!(!is_simple(&line(&[
            (0.0, 0.0),
            (1.0, 1.0),
            (1.0, 0.0),
            (0.0, 1.0),
        ])));
        // A closed ring touches itself only at its start point.
        assert!(is_simple(&line(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (0.0, 0.0),
        ])));
        // Doubling back over the previous segment is not simple.
        assert!(!is_simple(&line(&[(0.0, 0.0), (2.0, 0.0), (1.0, 0.0)])));
    }

    #[test]
    fn planar_length_and_endpoints() {
        let l = line(&[(0.0, 0.0), (3.0, 4.0)]);
        assert!((length_planar(&l) - 5.0).abs() < 1e-12);
        assert_eq!(start_point(&l), Point::new(0.0, 0.0));
        assert_eq!(end_point(&l), Point::new(3.0, 4.0));
    }

    #[test]
    fn geodesic_length_of_one_longitude_degree_at_equator() {
        let l = line(&[(0.0, 0.0), (1.0, 0.0)]);
        let m = length_meters(&l);
        // Haversine with the mean Earth radius: ~111.19 km.
        assert!((m - 111_195.0).abs() < 200.0, "got {m}");
        assert!((length_km(&l) - m / 1000.0).abs() < 1e-9);
    }

    #[test]
    fn reverse_round_trip() {
        let l = line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let r = reverse(&l);
        assert_eq!(r.0[0], l.0[2]);
        assert_eq!(reverse(&r), l);
    }

    #[test]
    fn interpolate_and_locate_agree() {
        let l = line(&[(0.0, 0.0), (2.0, 0.0)]);
        let p = interpolate(&l, 0.25).unwrap();
        assert!((p.x() - 0.5).abs() < 1e-12);
        assert!((locate(&l, p) - 0.25).abs() < 1e-12);
        // Clamped, not an error.
        assert!((interpolate(&l, 7.0).unwrap().x() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn distance_meters_uses_the_locked_constant() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.001, 0.0);
        assert!((distance_meters(a, b) - 111.32).abs() < 1e-9);
    }

    #[test]
    fn point_to_line_distance() {
        let l = line(&[(0.0, 0.0), (2.0, 0.0)]);
        assert!((point_line_distance(Point::new(1.0, 0.5), &l) - 0.5).abs() < 1e-12);
        // Beyond the segment end, distance is to the endpoint.
        assert!((point_line_distance(Point::new(3.0, 0.0), &l) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn min_and_hausdorff_line_distances() {
        let a = line(&[(0.0, 0.0), (2.0, 0.0)]);
        let crossing = line(&[(1.0, -1.0), (1.0, 1.0)]);
        assert_eq!(lines_min_distance(&a, &crossing), 0.0);

        let parallel = line(&[(0.0, 0.001), (2.0, 0.001)]);
        assert!((lines_min_distance(&a, &parallel) - 0.001).abs() < 1e-12);
        assert!((lines_max_vertex_distance(&a, &parallel) - 0.001).abs() < 1e-12);
        assert_eq!(lines_max_vertex_distance(&a, &a), 0.0);
    }

    #[test]
    fn envelope_dwithin() {
        let a = envelope(&line(&[(0.0, 0.0), (1.0, 1.0)])).unwrap();
        let b = envelope(&line(&[(1.5, 0.0), (2.0, 1.0)])).unwrap();
        assert!(!rects_dwithin(a, b, 0.2));
        assert!(rects_dwithin(a, b, 0.6));
    }
}

#[cfg(test)]
mod merge {
    use super::helpers::line;
    use crate::{line_merge, GeomError, Merged};

    const EPS: f64 = 1e-9;

    #[test]
    fn joins_two_parts_sharing_an_endpoint() {
        let a = line(&[(0.0, 0.0), (1.0, 0.0)]);
        let b = line(&[(1.0, 0.0), (2.0, 0.0)]);
        match line_merge(&[a, b], EPS).unwrap() {
            Merged::Single(l) => assert_eq!(l.0.len(), 3),
            Merged::Multiple(_) => panic!("expected a single run"),
        }
    }

    #[test]
    fn joins_with_reversal() {
        // b runs end-to-end against a's tail: (2,0) → (1,0).
        let a = line(&[(0.0, 0.0), (1.0, 0.0)]);
        let b = line(&[(2.0, 0.0), (1.0, 0.0)]);
        let merged = line_merge(&[a, b], EPS).unwrap();
        let l = merged.largest_component();
        assert_eq!(l.0.len(), 3);
        assert_eq!(l.0[0].x, 0.0);
        assert_eq!(l.0[2].x, 2.0);
    }

    #[test]
    fn disjoint_parts_stay_multiple() {
        let a = line(&[(0.0, 0.0), (1.0, 0.0)]);
        let b = line(&[(5.0, 0.0), (6.0, 0.0), (7.0, 0.0)]);
        let merged = line_merge(&[a, b.clone()], EPS).unwrap();
        assert!(!merged.is_single());
        // Largest component by planar length is b.
        assert_eq!(merged.largest_component(), b);
    }

    #[test]
    fn empty_collection_is_an_error() {
        assert!(matches!(line_merge(&[], EPS), Err(GeomError::EmptyCollection)));
    }
}

#[cfg(test)]
mod node {
    use super::helpers::line;
    use crate::kernel::length_planar;
    use crate::node::{crossing_measures, NODE_EPS};
    use crate::{node_collection, split_at_measures};

    #[test]
    fn x_crossing_splits_into_four() {
        let a = line(&[(-1.0, 0.0), (1.0, 0.0)]);
        let b = line(&[(0.0, -1.0), (0.0, 1.0)]);
        let before: f64 = length_planar(&a) + length_planar(&b);
        let parts = node_collection(&[a, b]).unwrap();
        assert_eq!(parts.len(), 4);
        let after: f64 = parts.iter().map(length_planar).sum();
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn endpoint_touch_does_not_split() {
        // V shape: two lines sharing only a terminal vertex.
        let a = line(&[(-1.0, 1.0), (0.0, 0.0)]);
        let b = line(&[(0.0, 0.0), (1.0, 1.0)]);
        let parts = node_collection(&[a, b]).unwrap();
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn envelope_touch_without_intersection_does_not_split() {
        // Envelopes overlap; geometries never meet.
        let a = line(&[(0.0, 0.0), (1.0, 1.0)]);
        let b = line(&[(0.0, 0.9), (0.05, 1.0)]);
        let parts = node_collection(&[a, b]).unwrap();
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn self_intersection_is_noded() {
        // Bowtie: crosses itself once at (0.5, 0.5).
        let bow = line(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]);
        let parts = node_collection(&[bow]).unwrap();
        assert_eq!(parts.len(), 3);
        for p in &parts {
            assert!(crate::kernel::is_simple(p));
        }
    }

    #[test]
    fn collinear_overlap_nodes_at_overlap_ends() {
        let a = line(&[(0.0, 0.0), (3.0, 0.0)]);
        let b = line(&[(1.0, 0.0), (2.0, 0.0)]);
        let measures = crossing_measures(&a, &b);
        let parts = split_at_measures(&a, &measures, NODE_EPS);
        assert_eq!(parts.len(), 3);
    }

    #[test]
    fn split_ignores_terminal_and_duplicate_measures() {
        let l = line(&[(0.0, 0.0), (2.0, 0.0)]);
        let parts = split_at_measures(&l, &[0.0, 1.0, 1.0 + 1e-12, 2.0], NODE_EPS);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].0.len(), 2);
        assert!((parts[0].0[1].x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn split_at_existing_vertex_does_not_duplicate_it() {
        let l = line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let parts = split_at_measures(&l, &[1.0], NODE_EPS);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].0.len(), 2);
        assert_eq!(parts[1].0.len(), 2);
    }
}

#[cfg(test)]
mod snap {
    use super::helpers::line;
    use crate::snap::snap_to_reference;

    #[test]
    fn vertex_snap_beats_segment_snap() {
        let geom = line(&[(0.0, 0.01), (1.0, 0.5)]);
        let reference = line(&[(0.0, 0.0), (2.0, 0.0)]);
        let snapped = snap_to_reference(&geom, &reference, 0.05);
        // First vertex is near the reference's (0,0) vertex.
        assert_eq!(snapped.0[0].x, 0.0);
        assert_eq!(snapped.0[0].y, 0.0);
        // Second vertex is out of tolerance and untouched.
        assert_eq!(snapped.0[1].y, 0.5);
    }

    #[test]
    fn interior_vertex_projects_onto_segment() {
        let geom = line(&[(0.5, 0.02), (1.5, 0.02)]);
        let reference = line(&[(0.0, 0.0), (2.0, 0.0)]);
        let snapped = snap_to_reference(&geom, &reference, 0.05);
        assert_eq!(snapped.0[0].y, 0.0);
        assert!((snapped.0[0].x - 0.5).abs() < 1e-12);
    }
}

#[cfg(test)]
mod index {
    use geo::Point;

    use super::helpers::line;
    use crate::kernel::envelope;
    use crate::{EnvelopeIndex, PointIndex};

    #[test]
    fn bbox_intersects_sorted_ids() {
        let ls = [
            line(&[(0.0, 0.0), (1.0, 1.0)]),
            line(&[(0.5, 0.5), (1.5, 1.5)]),
            line(&[(10.0, 10.0), (11.0, 11.0)]),
        ];
        let idx = EnvelopeIndex::build(
            ls.iter()
                .enumerate()
                .map(|(i, l)| (i as u32, envelope(l).unwrap()))
                .collect(),
        );
        let hits = idx.bbox_intersects(envelope(&ls[0]).unwrap());
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn dwithin_expands_the_query_rect() {
        let ls = [line(&[(0.0, 0.0), (1.0, 0.0)]), line(&[(1.2, 0.0), (2.0, 0.0)])];
        let idx = EnvelopeIndex::build(
            ls.iter()
                .enumerate()
                .map(|(i, l)| (i as u32, envelope(l).unwrap()))
                .collect(),
        );
        let e = envelope(&ls[0]).unwrap();
        assert_eq!(idx.bbox_intersects(e), vec![0]);
        assert_eq!(idx.dwithin(e, 0.3), vec![0, 1]);
    }

    #[test]
    fn point_queries_order_by_distance() {
        let idx = PointIndex::build(vec![
            (0, Point::new(0.0, 0.0)),
            (1, Point::new(1.0, 0.0)),
            (2, Point::new(3.0, 0.0)),
        ]);
        let (id, d) = idx.nearest_one(Point::new(0.1, 0.0)).unwrap();
        assert_eq!(id, 0);
        assert!((d - 0.1).abs() < 1e-12);
        assert_eq!(idx.nearest(Point::new(0.9, 0.0), 2), vec![1, 0]);
        assert_eq!(idx.dwithin(Point::new(0.0, 0.0), 1.5), vec![0, 1]);
    }

    #[test]
    fn empty_indexes() {
        assert!(EnvelopeIndex::build(vec![]).is_empty());
        let p = PointIndex::build(vec![]);
        assert!(p.is_empty());
        assert!(p.nearest_one(Point::new(0.0, 0.0)).is_none());
    }
}

#[cfg(test)]
mod linez {
    use super::helpers::line;
    use crate::{GeomError, LineZ};

    #[test]
    fn profile_length_must_match() {
        let l = line(&[(0.0, 0.0), (1.0, 0.0)]);
        assert!(matches!(
            LineZ::new_3d(l, vec![100.0]),
            Err(GeomError::MismatchedProfile { coords: 2, z: 1 })
        ));
    }

    #[test]
    fn force_2d_preserves_xy() {
        let l = line(&[(0.0, 0.0), (1.0, 0.0)]);
        let lz = LineZ::new_3d(l.clone(), vec![100.0, 150.0]).unwrap();
        assert_eq!(lz.force_2d(), l);
    }

    #[test]
    fn elevation_stats_split_gain_and_loss() {
        let l = line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let lz = LineZ::new_3d(l, vec![100.0, 180.0, 150.0]).unwrap();
        let (gain, loss) = lz.elevation_stats().unwrap();
        assert_eq!(gain, 80.0);
        assert_eq!(loss, 30.0);
    }

    #[test]
    fn reverse_keeps_profile_aligned() {
        let l = line(&[(0.0, 0.0), (1.0, 0.0)]);
        let lz = LineZ::new_3d(l, vec![100.0, 200.0]).unwrap();
        let r = lz.reverse();
        assert_eq!(r.line.0[0].x, 1.0);
        assert_eq!(r.z.unwrap(), vec![200.0, 100.0]);
    }

    #[test]
    fn plain_2d_has_no_stats() {
        let lz = LineZ::new_2d(line(&[(0.0, 0.0), (1.0, 0.0)]));
        assert!(!lz.has_z());
        assert!(lz.elevation_stats().is_none());
    }
}
