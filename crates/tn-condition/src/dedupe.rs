//! Duplicate-trail resolution.
//!
//! Trails with the same `name` and nearly identical geometry are removed,
//! keeping the longer member of each pair (ties keep the lexicographically
//! smaller id).  Candidates narrow through three strictly tightening stages:
//!
//! 1. envelopes within the bbox tolerance (R-tree),
//! 2. geometries within the proximity tolerance (minimum distance),
//! 3. geometries within the precision tolerance (directed discrete
//!    Hausdorff — the shorter trail lies entirely along the longer one).

use std::collections::BTreeSet;

use tn_core::units::meters_to_degrees;
use tn_core::{NetworkConfig, TrailId};
use tn_geom::kernel;
use tn_store::{StoreResult, TrailStore};

// ── DuplicateRemoval ──────────────────────────────────────────────────────────

/// One planned removal: which trail goes, which near-identical trail made it
/// redundant, and why.
#[derive(Clone, Debug)]
pub struct DuplicateRemoval {
    pub remove: TrailId,
    pub keep: TrailId,
    pub reason: String,
}

// ── DuplicateResolver ─────────────────────────────────────────────────────────

/// Finds and removes near-identical same-name trails.
pub struct DuplicateResolver<'a> {
    config: &'a NetworkConfig,
}

impl<'a> DuplicateResolver<'a> {
    pub fn new(config: &'a NetworkConfig) -> Self {
        Self { config }
    }

    /// Plan removals without mutating the store.
    ///
    /// Pairs are examined in ascending `(a, b)` id order with `a < b`; a
    /// trail already planned for removal participates in no further pairs,
    /// so the pass is single-shot deterministic.
    pub fn find(&self, store: &TrailStore) -> Vec<DuplicateRemoval> {
        let snapshot = store.spatial_snapshot();
        let proximity = meters_to_degrees(self.config.dup_proximity_tol_m);
        let precision = meters_to_degrees(self.config.dup_precision_tol_m);

        // Stage 1: same-name envelope pairs, ascending.
        let mut pairs: Vec<(&TrailId, &TrailId)> = Vec::new();
        for a in store.iter() {
            let Ok(env) = kernel::envelope(&a.geom.line) else {
                continue;
            };
            for b_id in snapshot.dwithin(env, self.config.dup_bbox_tol_m) {
                if *b_id <= a.id {
                    continue;
                }
                let b = store.by_id(b_id).expect("snapshot ids come from the store");
                if a.name == b.name {
                    pairs.push((&a.id, b_id));
                }
            }
        }

        // Stages 2–3: geometry checks.  Read-only, so the fan-out is safe to
        // parallelize; results are re-sorted to keep the pass deterministic.
        let check = |&(a_id, b_id): &(&TrailId, &TrailId)| -> Option<(TrailId, TrailId)> {
            let a = store.by_id(a_id)?;
            let b = store.by_id(b_id)?;
            let min = kernel::lines_min_distance(&a.geom.line, &b.geom.line);
            if min > proximity {
                return None;
            }
            // Directed from the shorter onto the longer: the shorter member
            // is redundant exactly when all of it lies along the other.
            let (shorter, longer) = if a.length_km <= b.length_km { (a, b) } else { (b, a) };
            let hausdorff =
                kernel::lines_directed_max_vertex_distance(&shorter.geom.line, &longer.geom.line);
            if hausdorff > precision {
                return None;
            }
            Some((a_id.clone(), b_id.clone()))
        };

        #[cfg(feature = "parallel")]
        let mut matched: Vec<(TrailId, TrailId)> = {
            use rayon::prelude::*;
            pairs.par_iter().filter_map(check).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let mut matched: Vec<(TrailId, TrailId)> = pairs.iter().filter_map(check).collect();

        matched.sort();

        // Reduce to removals, first-wins.
        let mut consumed: BTreeSet<TrailId> = BTreeSet::new();
        let mut removals = Vec::new();
        for (a_id, b_id) in matched {
            if consumed.contains(&a_id) || consumed.contains(&b_id) {
                continue;
            }
            let a = store.by_id(&a_id).expect("ids come from the store");
            let b = store.by_id(&b_id).expect("ids come from the store");

            // Keep the longer; ties keep the smaller id (a).
            let (keep, remove) = if a.length_km >= b.length_km { (a, b) } else { (b, a) };
            removals.push(DuplicateRemoval {
                remove: remove.id.clone(),
                keep: keep.id.clone(),
                reason: format!(
                    "duplicate of {} ({}): {:.3} km vs {:.3} km",
                    keep.id, keep.name, remove.length_km, keep.length_km
                ),
            });
            consumed.insert(remove.id.clone());
        }
        removals
    }

    /// Plan and apply removals in a single pass.
    pub fn apply(&self, store: &mut TrailStore) -> StoreResult<Vec<DuplicateRemoval>> {
        let removals = self.find(store);
        for r in &removals {
            store.remove(&r.remove)?;
            log::debug!("removed duplicate trail {}: {}", r.remove, r.reason);
        }
        if !removals.is_empty() {
            log::info!("duplicate resolution removed {} trail(s)", removals.len());
        }
        Ok(removals)
    }
}
