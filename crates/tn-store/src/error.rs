//! Store error type.

use thiserror::Error;

use tn_core::TrailId;
use tn_geom::GeomError;

/// Errors produced by `tn-store`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("trail {id}: invalid geometry: {source}")]
    InvalidGeometry {
        id: TrailId,
        #[source]
        source: GeomError,
    },

    #[error("trail {0} already exists in the store")]
    DuplicateId(TrailId),

    #[error("trail {0} not found")]
    NotFound(TrailId),

    #[error("row {row}: {message}")]
    Parse { row: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
