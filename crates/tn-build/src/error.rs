//! Build error types.

use thiserror::Error;

use tn_condition::ConditionError;
use tn_core::ConfigError;
use tn_store::StoreError;
use tn_topology::TopologyError;

// ── BuildStage ────────────────────────────────────────────────────────────────

/// Pipeline stages, in execution order.  Failures always name one.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuildStage {
    Filter,
    Dedupe,
    Bridge,
    Split,
    Topology,
    Weld,
    EdgeDedup,
    ChainMerge,
    Validate,
    Coverage,
}

impl std::fmt::Display for BuildStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BuildStage::Filter => "filter",
            BuildStage::Dedupe => "dedupe",
            BuildStage::Bridge => "bridge",
            BuildStage::Split => "split",
            BuildStage::Topology => "topology",
            BuildStage::Weld => "weld",
            BuildStage::EdgeDedup => "edge-dedup",
            BuildStage::ChainMerge => "chain-merge",
            BuildStage::Validate => "validate",
            BuildStage::Coverage => "coverage",
        };
        f.write_str(name)
    }
}

// ── StageError ────────────────────────────────────────────────────────────────

/// The underlying cause of a stage failure.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Condition(#[from] ConditionError),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

// ── BuildError ────────────────────────────────────────────────────────────────

/// A failed build.  The caller's store is untouched in every case.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("build cancelled before stage {stage}")]
    Cancelled { stage: BuildStage },

    #[error("stage {stage} failed: {source}")]
    Stage {
        stage: BuildStage,
        #[source]
        source: StageError,
    },

    #[error("validation failed with {count} violation(s); first: {first}")]
    ValidationFailed { count: usize, first: String },
}

impl BuildError {
    pub(crate) fn at<E: Into<StageError>>(stage: BuildStage) -> impl FnOnce(E) -> BuildError {
        move |e| BuildError::Stage { stage, source: e.into() }
    }
}
