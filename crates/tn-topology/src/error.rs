//! Topology-layer error type.

use thiserror::Error;

use tn_geom::GeomError;

/// Errors produced by `tn-topology`.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error(transparent)]
    Geometry(#[from] GeomError),

    #[error("topology inconsistency: {0}")]
    Inconsistent(String),
}

pub type TopologyResult<T> = Result<T, TopologyError>;
