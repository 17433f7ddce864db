//! Endpoint gap bridging.
//!
//! For trail pairs whose end→start separation falls inside the configured
//! band, the downstream trail is extended by prepending a straight
//! connector.  No new trail rows are created; the extension is recorded so
//! later stages can recognise connector-born segments.

use std::collections::{BTreeMap, BTreeSet};

use geo::{Coord, LineString};

use tn_core::units::meters_to_km;
use tn_core::{NetworkConfig, TrailId};
use tn_geom::{kernel, LineZ};
use tn_store::{StoreResult, TrailStore};

// ── GapBridge ─────────────────────────────────────────────────────────────────

/// One applied bridge: `extended` gained a connector reaching back to the
/// end of `toward`.
#[derive(Clone, Debug)]
pub struct GapBridge {
    pub extended: TrailId,
    pub toward: TrailId,
    pub gap_m: f64,
}

/// The result of a bridging pass: the applied bridges plus the connector
/// provenance consumed by the topology builder (extended trail id → length
/// of the prepended connector in km).
#[derive(Clone, Debug, Default)]
pub struct BridgeOutcome {
    pub bridges: Vec<GapBridge>,
    pub connector_km: BTreeMap<TrailId, f64>,
}

// ── TrailGapBridger ───────────────────────────────────────────────────────────

/// Extends trails across small endpoint gaps.
pub struct TrailGapBridger<'a> {
    config: &'a NetworkConfig,
}

impl<'a> TrailGapBridger<'a> {
    pub fn new(config: &'a NetworkConfig) -> Self {
        Self { config }
    }

    /// Run one bridging pass over the store.
    ///
    /// Candidate ordered pairs `(t1, t2)` with
    /// `distance(end(t1), start(t2)) ∈ [gap_min_m, gap_max_m]` are applied
    /// in ascending gap order; each trail participates in at most one bridge
    /// per pass (first wins).
    pub fn apply(&self, store: &mut TrailStore) -> StoreResult<BridgeOutcome> {
        // Endpoint snapshot, ascending id.
        let endpoints: Vec<(TrailId, geo::Point<f64>, geo::Point<f64>)> = store
            .iter()
            .map(|t| {
                (
                    t.id.clone(),
                    kernel::start_point(&t.geom.line),
                    kernel::end_point(&t.geom.line),
                )
            })
            .collect();

        // All in-band ordered pairs.
        let mut candidates: Vec<(f64, TrailId, TrailId)> = Vec::new();
        for (id1, _, end1) in &endpoints {
            for (id2, start2, _) in &endpoints {
                if id1 == id2 {
                    continue;
                }
                let gap = kernel::distance_meters(*end1, *start2);
                if gap >= self.config.gap_min_m && gap <= self.config.gap_max_m {
                    candidates.push((gap, id1.clone(), id2.clone()));
                }
            }
        }
        candidates.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .expect("finite gaps")
                .then_with(|| a.1.cmp(&b.1))
                .then_with(|| a.2.cmp(&b.2))
        });

        // First-wins selection, then extension.
        let mut used: BTreeSet<TrailId> = BTreeSet::new();
        let mut outcome = BridgeOutcome::default();
        for (gap, t1, t2) in candidates {
            if used.contains(&t1) || used.contains(&t2) {
                continue;
            }
            let end1: Coord<f64> = {
                let t = store.by_id(&t1).expect("endpoint snapshot ids");
                *t.geom.line.0.last().expect("valid trails have coordinates")
            };

            let t2_trail = store.by_id(&t2).expect("endpoint snapshot ids");
            let mut coords = Vec::with_capacity(t2_trail.geom.line.0.len() + 1);
            coords.push(end1);
            coords.extend_from_slice(&t2_trail.geom.line.0);
            let z = t2_trail.geom.z.as_ref().map(|z| {
                // The connector inherits the first known elevation.
                let mut z2 = Vec::with_capacity(z.len() + 1);
                z2.push(z[0]);
                z2.extend_from_slice(z);
                z2
            });
            let geom = match z {
                Some(z) => LineZ::new_3d(LineString::new(coords), z)
                    .expect("profile grown in lockstep with coordinates"),
                None => LineZ::new_2d(LineString::new(coords)),
            };
            store.update_geometry(&t2, geom)?;

            used.insert(t1.clone());
            used.insert(t2.clone());
            outcome.connector_km.insert(t2.clone(), meters_to_km(gap));
            log::debug!("bridged {:.1} m gap: extended {} toward {}", gap, t2, t1);
            outcome.bridges.push(GapBridge { extended: t2, toward: t1, gap_m: gap });
        }

        if !outcome.bridges.is_empty() {
            log::info!("gap bridging extended {} trail(s)", outcome.bridges.len());
        }
        Ok(outcome)
    }
}
