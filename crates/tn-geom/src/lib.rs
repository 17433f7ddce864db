//! `tn-geom` — 2D LineString operations and spatial indexing.
//!
//! Every persistent geometry in the workspace is a planar
//! `geo::LineString<f64>` in EPSG:4326.  This crate supplies the operations
//! the conditioning and topology layers consume, plus the R-tree indexes
//! used for candidate pruning.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`kernel`] | validity, simplicity, lengths, interpolation, distances    |
//! | [`linez`]  | `LineZ` — a 2D line with an optional elevation profile     |
//! | [`merge`]  | `line_merge` — join shareable endpoints                    |
//! | [`node`]   | `node_collection` — split at all pairwise crossings        |
//! | [`snap`]   | vertex snapping onto a reference geometry                  |
//! | [`index`]  | `EnvelopeIndex`, `PointIndex` (rstar)                      |
//! | [`error`]  | `GeomError`, `GeomResult<T>`                               |
//!
//! # Totality
//!
//! Operations that cannot produce a valid result return
//! [`GeomError`] instead of silently emitting degenerate geometry; callers
//! never observe a NaN coordinate or a single-point "line".

pub mod error;
pub mod index;
pub mod kernel;
pub mod linez;
pub mod merge;
pub mod node;
pub mod snap;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{GeomError, GeomResult};
pub use index::{EnvelopeIndex, PointIndex};
pub use linez::LineZ;
pub use merge::{line_merge, Merged};
pub use node::{node_collection, split_at_measures};
