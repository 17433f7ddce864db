//! `tn-topology` — Layer-2 network topology.
//!
//! Consumes the conditioned split-trail set and produces a clean routable
//! graph: edges + vertices with authoritative degree counts and an
//! edge-to-trail composition index that survives every rewrite.
//!
//! # Crate layout
//!
//! | Module          | Contents                                            |
//! |-----------------|------------------------------------------------------|
//! | [`graph`]       | `NetworkGraph`, `Vertex`, `Edge`, `EdgeKind`        |
//! | [`composition`] | `CompositionIndex`, `CompositionEntry`              |
//! | [`build`]       | `TopologyBuilder` — split trails → graph            |
//! | [`weld`]        | `VertexWelder` — merge near-coincident vertices     |
//! | [`dedup`]       | `EdgeDeduplicator` — drop parallel duplicates       |
//! | [`chains`]      | `Degree2ChainMerger` — collapse degree-2 chains     |
//! | [`validate`]    | `NetworkValidator` — post-build invariant checks    |
//! | [`error`]       | `TopologyError`, `TopologyResult<T>`                |
//!
//! # Mutation discipline
//!
//! The graph is two flat integer-keyed tables; `degree` is a denormalized
//! cache refreshed at stage boundaries, never trusted across one.  Every
//! edge rewrite that touches the composition index happens inside a single
//! `NetworkGraph` method so the two can never diverge.

pub mod build;
pub mod chains;
pub mod composition;
pub mod dedup;
pub mod error;
pub mod graph;
pub mod validate;
pub mod weld;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use build::{TopologyBuilder, TopologyOutcome};
pub use chains::{ChainMergeStats, Degree2ChainMerger};
pub use composition::{CompositionEntry, CompositionIndex, CompositionType, TrailShare};
pub use dedup::EdgeDeduplicator;
pub use error::{TopologyError, TopologyResult};
pub use graph::{Edge, EdgeKind, NetworkGraph, NewEdge, Vertex};
pub use validate::{NetworkValidator, ValidationReport, Violation};
pub use weld::{VertexWelder, WeldStats};
