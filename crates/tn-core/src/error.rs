//! Configuration error type.
//!
//! Sub-crates define their own error enums and wrap each other via `#[from]`
//! where a stage delegates; nothing funnels through a single god-enum.

use thiserror::Error;

/// Rejections from [`NetworkConfig::validate`](crate::NetworkConfig::validate).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tolerance {name} must be a positive finite number, got {value}")]
    NonPositiveTolerance { name: &'static str, value: f64 },

    #[error("gap band [{min}, {max}] m is empty or not finite")]
    InvalidGapBand { min: f64, max: f64 },

    #[error("degree2_max_iterations must be at least 1")]
    ZeroIterationBudget,

    #[error("bbox has min > max on at least one axis")]
    InvalidBBox,
}
