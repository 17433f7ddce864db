//! Build configuration.
//!
//! `NetworkConfig` is an immutable value constructed once and handed to the
//! build coordinator; no stage mutates it.  All tolerances are metres (see
//! [`crate::units`] for the degree conversion rule).

use crate::error::ConfigError;

// ── TopologyStrategy ──────────────────────────────────────────────────────────

/// How the Layer-1 noder splits trails before topology construction.
///
/// All three strategies produce the same post-condition: a split-trail set in
/// which no two segments cross except at shared endpoints.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TopologyStrategy {
    /// Trails are already pre-split upstream; pass them through and only
    /// diagnose residual crossings.
    Manual,
    /// Collect every geometry and node the whole collection at once, then
    /// re-associate segments to parents.  The default.
    #[default]
    NodeNetwork,
    /// Split each trail incrementally against its spatial neighbors, then
    /// run a light residual-crossing validation.
    NativeNode,
}

// ── BBox ──────────────────────────────────────────────────────────────────────

/// Axis-aligned geographic filter applied to input trails.
///
/// Coordinates are EPSG:4326 (`x` = longitude, `y` = latitude).
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// `true` if `(x, y)` lies inside or on the boundary.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

// ── NetworkConfig ─────────────────────────────────────────────────────────────

/// Tolerances, strategy selection, and iteration budgets for a network build.
///
/// | Field                    | Default | Used by                          |
/// |--------------------------|---------|----------------------------------|
/// | `strategy`               | `NodeNetwork` | Noder                      |
/// | `intersection_tol_m`     | 1.0     | Noder segment association        |
/// | `edge_snap_tol_m`        | 2.0     | TopologyBuilder, chain merge     |
/// | `vertex_weld_tol_m`      | 2.0     | VertexWelder                     |
/// | `true_loop_tol_m`        | 10.0    | Self-loop policy                 |
/// | `dup_bbox_tol_m`         | 200.0   | DuplicateResolver stage 1        |
/// | `dup_proximity_tol_m`    | 100.0   | DuplicateResolver stage 2        |
/// | `dup_precision_tol_m`    | 1.0     | DuplicateResolver stage 3        |
/// | `gap_min_m` / `gap_max_m`| 2 / 20  | TrailGapBridger band             |
/// | `short_connector_max_m`  | 2.0     | Pre-merge sliver cleanup         |
/// | `degree2_max_iterations` | 8       | Degree-2 merge fix-point budget  |
/// | `min_edge_length_m`      | 0.1     | Segment drop threshold           |
/// | `bbox`                   | `None`  | Input trail filter               |
/// | `strict_validation`      | `true`  | NetworkValidator severity        |
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    pub strategy: TopologyStrategy,
    pub intersection_tol_m: f64,
    pub edge_snap_tol_m: f64,
    pub vertex_weld_tol_m: f64,
    pub true_loop_tol_m: f64,
    pub dup_bbox_tol_m: f64,
    pub dup_proximity_tol_m: f64,
    pub dup_precision_tol_m: f64,
    pub gap_min_m: f64,
    pub gap_max_m: f64,
    pub short_connector_max_m: f64,
    pub degree2_max_iterations: u32,
    pub min_edge_length_m: f64,
    pub bbox: Option<BBox>,
    pub strict_validation: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            strategy: TopologyStrategy::NodeNetwork,
            intersection_tol_m: 1.0,
            edge_snap_tol_m: 2.0,
            vertex_weld_tol_m: 2.0,
            true_loop_tol_m: 10.0,
            dup_bbox_tol_m: 200.0,
            dup_proximity_tol_m: 100.0,
            dup_precision_tol_m: 1.0,
            gap_min_m: 2.0,
            gap_max_m: 20.0,
            short_connector_max_m: 2.0,
            degree2_max_iterations: 8,
            min_edge_length_m: 0.1,
            bbox: None,
            strict_validation: true,
        }
    }
}

impl NetworkConfig {
    /// Check the configuration for internally inconsistent values.
    ///
    /// The coordinator calls this before opening the build; stages may
    /// assume a validated config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerances = [
            ("intersection_tol_m", self.intersection_tol_m),
            ("edge_snap_tol_m", self.edge_snap_tol_m),
            ("vertex_weld_tol_m", self.vertex_weld_tol_m),
            ("true_loop_tol_m", self.true_loop_tol_m),
            ("dup_bbox_tol_m", self.dup_bbox_tol_m),
            ("dup_proximity_tol_m", self.dup_proximity_tol_m),
            ("dup_precision_tol_m", self.dup_precision_tol_m),
            ("short_connector_max_m", self.short_connector_max_m),
            ("min_edge_length_m", self.min_edge_length_m),
        ];
        for (name, value) in tolerances {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositiveTolerance { name, value });
            }
        }

        if !(self.gap_min_m >= 0.0)
            || !self.gap_min_m.is_finite()
            || !self.gap_max_m.is_finite()
            || self.gap_min_m > self.gap_max_m
        {
            return Err(ConfigError::InvalidGapBand {
                min: self.gap_min_m,
                max: self.gap_max_m,
            });
        }

        if self.degree2_max_iterations == 0 {
            return Err(ConfigError::ZeroIterationBudget);
        }

        if let Some(b) = &self.bbox {
            if b.min_x > b.max_x || b.min_y > b.max_y {
                return Err(ConfigError::InvalidBBox);
            }
        }

        Ok(())
    }
}
