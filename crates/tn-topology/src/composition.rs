//! Edge-to-trail composition tracking.
//!
//! Every persistent edge maps to an ordered list of original-trail segments
//! with percentages.  The index is rewritten atomically with the edge
//! mutations that affect it (see `NetworkGraph::replace_edges`); a validator
//! pass at build end enforces that no edge lacks a composition and no
//! composition outlives its edge.

use std::collections::BTreeMap;

use tn_core::{EdgeId, TrailId};

// ── CompositionType ───────────────────────────────────────────────────────────

/// Provenance class of one composition entry.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CompositionType {
    /// Straight from a split trail.
    Direct,
    /// Absorbed into a merged edge.
    Merged,
    /// Born from a gap-bridge connector; survives merging so synthetic
    /// geometry stays distinguishable from surveyed trail.
    Connector,
}

// ── CompositionEntry ──────────────────────────────────────────────────────────

/// One original-trail segment contributing to an edge.
#[derive(Clone, Debug)]
pub struct CompositionEntry {
    pub trail: TrailId,
    pub trail_name: String,
    /// Measures along the original trail, in km.
    pub start_measure: f64,
    pub end_measure: f64,
    /// 1-based position within the edge's composition list.
    pub ordinal: u32,
    /// Share of the owning edge's length, in (0, 100].
    pub percentage: f64,
    pub kind: CompositionType,
}

impl CompositionEntry {
    /// Contributed length in km.
    #[inline]
    pub fn length_km(&self) -> f64 {
        self.end_measure - self.start_measure
    }
}

// ── TrailShare ────────────────────────────────────────────────────────────────

/// Aggregated contribution of one trail across a set of edges.
#[derive(Clone, Debug)]
pub struct TrailShare {
    pub trail: TrailId,
    pub trail_name: String,
    pub length_km: f64,
    pub percentage: f64,
}

// ── CompositionIndex ──────────────────────────────────────────────────────────

/// `edge_id → ordered composition entries`.
///
/// Keyed by a `BTreeMap` so integrity sweeps and summaries iterate in
/// ascending edge order.
#[derive(Clone, Debug, Default)]
pub struct CompositionIndex {
    entries: BTreeMap<EdgeId, Vec<CompositionEntry>>,
}

impl CompositionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total entry count across all edges.
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    // ── Mutations ─────────────────────────────────────────────────────────

    /// Attach the single-segment composition of a freshly built edge.
    pub fn init_direct(
        &mut self,
        edge: EdgeId,
        trail: TrailId,
        trail_name: impl Into<String>,
        start_measure: f64,
        end_measure: f64,
        kind: CompositionType,
    ) {
        self.entries.insert(
            edge,
            vec![CompositionEntry {
                trail,
                trail_name: trail_name.into(),
                start_measure,
                end_measure,
                ordinal: 1,
                percentage: 100.0,
                kind,
            }],
        );
    }

    /// Re-home the compositions of `sources` (in the order passed) onto
    /// `new_edge`, re-assigning ordinals and percentages, then drop the
    /// source lists.
    ///
    /// Entries keep their `Connector` provenance; everything else becomes
    /// `kind`.
    pub fn merge(&mut self, new_edge: EdgeId, sources: &[EdgeId], kind: CompositionType) {
        let mut gathered: Vec<CompositionEntry> = Vec::new();
        for src in sources {
            if let Some(list) = self.entries.remove(src) {
                gathered.extend(list);
            }
        }

        let total: f64 = gathered.iter().map(CompositionEntry::length_km).sum();
        for (i, entry) in gathered.iter_mut().enumerate() {
            entry.ordinal = i as u32 + 1;
            entry.percentage = if total > 0.0 {
                (entry.length_km() / total * 100.0).clamp(f64::MIN_POSITIVE, 100.0)
            } else {
                100.0 / sources.len().max(1) as f64
            };
            if entry.kind != CompositionType::Connector {
                entry.kind = kind;
            }
        }
        self.entries.insert(new_edge, gathered);
    }

    /// Drop the composition of a deleted edge.
    pub fn remove(&mut self, edge: EdgeId) {
        self.entries.remove(&edge);
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    pub fn lookup(&self, edge: EdgeId) -> Option<&[CompositionEntry]> {
        self.entries.get(&edge).map(Vec::as_slice)
    }

    /// Edges with a composition list, ascending.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.entries.keys().copied()
    }

    /// Aggregate trail contributions across `edges`, ascending trail id.
    pub fn summarize(&self, edges: &[EdgeId]) -> Vec<TrailShare> {
        let mut by_trail: BTreeMap<TrailId, (String, f64)> = BTreeMap::new();
        let mut total = 0.0;
        for id in edges {
            let Some(list) = self.entries.get(id) else {
                continue;
            };
            for e in list {
                let slot = by_trail
                    .entry(e.trail.clone())
                    .or_insert_with(|| (e.trail_name.clone(), 0.0));
                slot.1 += e.length_km();
                total += e.length_km();
            }
        }
        by_trail
            .into_iter()
            .map(|(trail, (trail_name, length_km))| TrailShare {
                trail,
                trail_name,
                length_km,
                percentage: if total > 0.0 { length_km / total * 100.0 } else { 0.0 },
            })
            .collect()
    }
}
