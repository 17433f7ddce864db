//! Geometry-kernel error type.

use thiserror::Error;

/// Errors produced by `tn-geom`.
#[derive(Debug, Error)]
pub enum GeomError {
    #[error("invalid geometry: {reason}")]
    InvalidGeometry { reason: &'static str },

    #[error("operation requires a non-empty collection")]
    EmptyCollection,

    #[error("elevation profile has {z} values for {coords} coordinates")]
    MismatchedProfile { coords: usize, z: usize },
}

pub type GeomResult<T> = Result<T, GeomError>;
