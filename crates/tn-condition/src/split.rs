//! Split-trail tables.

use geo::LineString;

use tn_core::TrailId;

// ── SplitTrail ────────────────────────────────────────────────────────────────

/// One noded segment of a parent trail.
///
/// Invariants: `ordinal ≥ 1` and ordinals of a parent's segments follow the
/// linear-reference order of their midpoints; `0 ≤ start_measure <
/// end_measure ≤ parent.length_km` (km along the parent).
#[derive(Clone, Debug)]
pub struct SplitTrail {
    pub parent: TrailId,
    pub parent_name: String,
    pub ordinal: u32,
    pub geom: LineString<f64>,
    /// Geodesic length of this segment in km.
    pub length_km: f64,
    pub start_measure: f64,
    pub end_measure: f64,
    /// Parent elevation attributes prorated by length share, so summing the
    /// segments reconstitutes the parent totals.
    pub elevation_gain: f64,
    pub elevation_loss: f64,
    /// `true` when this segment lies inside a gap-bridge connector range.
    pub from_connector: bool,
}

// ── SplitSet ──────────────────────────────────────────────────────────────────

/// The Layer-1 output: all split trails plus diagnostics.
#[derive(Clone, Debug, Default)]
pub struct SplitSet {
    pub segments: Vec<SplitTrail>,
    /// Noded pieces that could not be associated with any parent.  The
    /// build may continue; the validator surfaces the discrepancy.
    pub unmatched: Vec<LineString<f64>>,
    /// Pieces dropped for falling under the minimum edge length.
    pub dropped_short: usize,
    /// Interior crossings still present between segments (zero after a
    /// healthy noding pass; nonzero under the manual strategy means the
    /// upstream pre-split promise was broken).
    pub residual_crossings: u32,
}

impl SplitSet {
    /// Sum of segment lengths in km.
    pub fn total_length_km(&self) -> f64 {
        self.segments.iter().map(|s| s.length_km).sum()
    }

    /// Segments of one parent, in ordinal order.
    pub fn of_parent<'a>(&'a self, parent: &'a TrailId) -> impl Iterator<Item = &'a SplitTrail> {
        self.segments.iter().filter(move |s| &s.parent == parent)
    }
}
