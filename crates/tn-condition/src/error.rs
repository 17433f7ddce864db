//! Conditioning-stage error type.

use thiserror::Error;

use tn_geom::GeomError;
use tn_store::StoreError;

/// Errors produced by `tn-condition`.
#[derive(Debug, Error)]
pub enum ConditionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Geom(#[from] GeomError),
}

pub type ConditionResult<T> = Result<T, ConditionError>;
