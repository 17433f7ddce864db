//! Build summary and warning types.

use tn_core::TrailId;

// ── BuildWarning ──────────────────────────────────────────────────────────────

/// Non-fatal findings surfaced to the caller.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuildWarning {
    /// The degree-2 merge fix-point ran out of iteration budget.
    MergeBudgetExceeded { passes: u32 },
    /// Chains abandoned because their merged geometry was discontinuous.
    ChainsSkipped { count: u32 },
    /// Noded pieces that could not be associated with a parent trail.
    UnmatchedSegments { count: usize },
    /// Candidate edges rejected for unsnapped endpoints.
    UnsnappedEndpoints { count: usize },
    /// Interior crossings that survived the (manual/native) split strategy.
    ResidualCrossings { count: u32 },
    /// A conditioned trail is not fully covered by the final edge set.
    CoverageShortfall { trail: TrailId, gap_m: f64 },
    /// Validator findings downgraded by `strict_validation = false`, plus
    /// advisory ring findings.
    ValidationFindings { count: usize },
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildWarning::MergeBudgetExceeded { passes } => {
                write!(f, "degree-2 merge budget exhausted after {passes} pass(es)")
            }
            BuildWarning::ChainsSkipped { count } => {
                write!(f, "{count} chain(s) skipped for discontinuous geometry")
            }
            BuildWarning::UnmatchedSegments { count } => {
                write!(f, "{count} noded segment(s) without a parent trail")
            }
            BuildWarning::UnsnappedEndpoints { count } => {
                write!(f, "{count} candidate edge(s) rejected for unsnapped endpoints")
            }
            BuildWarning::ResidualCrossings { count } => {
                write!(f, "{count} residual crossing pair(s) after splitting")
            }
            BuildWarning::CoverageShortfall { trail, gap_m } => {
                write!(f, "trail {trail} has ~{gap_m:.1} m not covered by any edge")
            }
            BuildWarning::ValidationFindings { count } => {
                write!(f, "{count} validation finding(s) downgraded to warnings")
            }
        }
    }
}

// ── BuildSummary ──────────────────────────────────────────────────────────────

/// Per-stage counts for the whole build, in pipeline order.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildSummary {
    pub trails_in: usize,
    pub trails_filtered: usize,
    pub duplicates_removed: usize,
    pub gaps_bridged: usize,
    pub split_segments: usize,
    pub segments_dropped_short: usize,
    pub vertices: usize,
    pub edges: usize,
    pub welded_vertices: u32,
    pub parallel_edges_removed: u32,
    pub merge_passes: u32,
    pub chains_merged: u32,
    pub connectors_removed: u32,
    pub composition_entries: usize,
    /// Weakly connected component sizes, descending.
    pub component_sizes: Vec<usize>,
    pub warnings: Vec<BuildWarning>,
}

impl BuildSummary {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
