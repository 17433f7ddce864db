//! `tn-build` — the build coordinator.
//!
//! Runs the whole pipeline — duplicate resolution, gap bridging, noding,
//! topology construction, welding, deduplication, chain merging, validation,
//! coverage — as one logical transaction: the coordinator works on a private
//! clone of the caller's store and returns state only on success, so a
//! failed or cancelled build leaves nothing half-written.
//!
//! # Crate layout
//!
//! | Module          | Contents                                         |
//! |-----------------|---------------------------------------------------|
//! | [`coordinator`] | `BuildCoordinator`, `BuildOutcome`               |
//! | [`summary`]     | `BuildSummary`, `BuildWarning`                   |
//! | [`cancel`]      | `CancelToken`                                    |
//! | [`error`]       | `BuildError`, `BuildStage`, `StageError`         |

pub mod cancel;
pub mod coordinator;
pub mod error;
pub mod summary;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cancel::CancelToken;
pub use coordinator::{BuildCoordinator, BuildOutcome};
pub use error::{BuildError, BuildStage, StageError};
pub use summary::{BuildSummary, BuildWarning};
