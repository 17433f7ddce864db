//! The `Trail` entity.

use tn_core::TrailId;
use tn_geom::{kernel, LineZ};

/// A source trail: stable identifier, display name, geometry, and the
/// elevation attributes the route layer scores against.
///
/// Invariants (enforced by [`TrailStore`](crate::TrailStore) on insert):
/// geometry valid and ≥ 2 points, `length_km > 0`, elevation fields
/// non-negative, `id` unique across the store.
#[derive(Clone, Debug)]
pub struct Trail {
    pub id: TrailId,
    pub name: String,
    pub geom: LineZ,
    /// Geodesic length in kilometres, derived from geometry.
    pub length_km: f64,
    pub elevation_gain: f64,
    pub elevation_loss: f64,
    /// Optional integer handle of the unsplit upstream feature.
    pub original_id: Option<i64>,
}

impl Trail {
    /// Build a trail, deriving `length_km` from the geometry and, when an
    /// elevation profile is present, gain/loss from the profile.
    pub fn new(id: TrailId, name: impl Into<String>, geom: LineZ) -> Self {
        let length_km = kernel::length_km(&geom.line);
        let (elevation_gain, elevation_loss) = geom.elevation_stats().unwrap_or((0.0, 0.0));
        Self {
            id,
            name: name.into(),
            geom,
            length_km,
            elevation_gain,
            elevation_loss,
            original_id: None,
        }
    }

    pub fn with_elevation(mut self, gain: f64, loss: f64) -> Self {
        self.elevation_gain = gain;
        self.elevation_loss = loss;
        self
    }

    pub fn with_original_id(mut self, id: i64) -> Self {
        self.original_id = Some(id);
        self
    }

    /// Re-derive `length_km` after a geometry change.
    pub fn recompute_length(&mut self) {
        self.length_km = kernel::length_km(&self.geom.line);
    }
}
