//! `tn-store` — the source trail table.
//!
//! The store exclusively owns `Trail` rows.  Conditioning stages mutate
//! through it (duplicate removal, gap extension); everything downstream
//! reads through cursors.  Iteration order is always ascending `TrailId`, so
//! every consumer sees trails in the same deterministic order.
//!
//! # Crate layout
//!
//! | Module     | Contents                                           |
//! |------------|-----------------------------------------------------|
//! | [`trail`]  | `Trail` entity                                      |
//! | [`store`]  | `TrailStore`, `SpatialSnapshot`                     |
//! | [`loader`] | CSV/WKT ingest                                      |
//! | [`error`]  | `StoreError`, `StoreResult<T>`                      |

pub mod error;
pub mod loader;
pub mod store;
pub mod trail;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{StoreError, StoreResult};
pub use loader::{load_trails_csv, load_trails_reader};
pub use store::{SpatialSnapshot, TrailStore};
pub use trail::Trail;
