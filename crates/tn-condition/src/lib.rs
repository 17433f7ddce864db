//! `tn-condition` — Layer-1 trail conditioning.
//!
//! Takes the raw trail table and produces a split-trail set that is
//! node-splittable without residual crossings:
//!
//! 1. [`DuplicateResolver`] — remove near-identical same-name trails.
//! 2. [`TrailGapBridger`] — close small endpoint gaps by extending trails.
//! 3. [`TrailSplitter`] — split at all at-grade crossings and re-associate
//!    segments with their parent trails.
//!
//! # Crate layout
//!
//! | Module     | Contents                                              |
//! |------------|--------------------------------------------------------|
//! | [`dedupe`] | `DuplicateResolver`, `DuplicateRemoval`                |
//! | [`bridge`] | `TrailGapBridger`, `GapBridge`, `BridgeOutcome`        |
//! | [`split`]  | `SplitTrail`, `SplitSet`                               |
//! | [`noder`]  | `TrailSplitter` + the three strategy implementations   |
//! | [`error`]  | `ConditionError`, `ConditionResult<T>`                 |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Rayon fan-out of duplicate-candidate distance checks.  |

pub mod bridge;
pub mod dedupe;
pub mod error;
pub mod noder;
pub mod split;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use bridge::{BridgeOutcome, GapBridge, TrailGapBridger};
pub use dedupe::{DuplicateRemoval, DuplicateResolver};
pub use error::{ConditionError, ConditionResult};
pub use noder::{splitter_for, ManualSplitter, NativeSplitter, NodeNetworkSplitter, TrailSplitter};
pub use split::{SplitSet, SplitTrail};
