//! `tn-core` — foundational types for the `trailnet` workspace.
//!
//! This crate is a dependency of every other `tn-*` crate.  It intentionally
//! has no `tn-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`ids`]    | `TrailId`, `VertexId`, `EdgeId`                           |
//! | [`units`]  | degree ↔ metre conversions, `METERS_PER_DEGREE`           |
//! | [`config`] | `NetworkConfig`, `TopologyStrategy`, `BBox`               |
//! | [`error`]  | `ConfigError`                                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod units;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{BBox, NetworkConfig, TopologyStrategy};
pub use error::ConfigError;
pub use ids::{EdgeId, TrailId, VertexId};
