//! Noding strategies — the Layer-1 finisher.
//!
//! All three strategies satisfy the same post-condition: the returned
//! [`SplitSet`] holds pairwise non-crossing segments, each associated with
//! exactly one parent trail, ordinals assigned in linear-reference order.
//!
//! | Strategy                | How                                          |
//! |-------------------------|----------------------------------------------|
//! | [`NodeNetworkSplitter`] | node the whole collection, re-associate      |
//! | [`ManualSplitter`]      | trust upstream pre-splitting, diagnose       |
//! | [`NativeSplitter`]      | split each trail against neighbors, validate |

use std::collections::BTreeMap;

use geo::LineString;

use tn_core::units::{km_to_meters, meters_to_degrees};
use tn_core::{NetworkConfig, TopologyStrategy, TrailId};
use tn_geom::node::{crossing_measures, NODE_EPS};
use tn_geom::{kernel, node_collection, split_at_measures, EnvelopeIndex};
use tn_store::{Trail, TrailStore};

use crate::error::ConditionResult;
use crate::split::{SplitSet, SplitTrail};

/// Measure slop when classifying a segment as connector-born, in km (1 mm).
const CONNECTOR_EPS_KM: f64 = 1e-6;

// ── TrailSplitter ─────────────────────────────────────────────────────────────

/// A Layer-1 splitting strategy.
///
/// `connectors` carries the gap-bridge provenance (extended trail id →
/// prepended connector length in km) so strategies can flag connector-born
/// segments.
pub trait TrailSplitter {
    fn name(&self) -> &'static str;

    fn split(
        &self,
        store: &TrailStore,
        connectors: &BTreeMap<TrailId, f64>,
        config: &NetworkConfig,
    ) -> ConditionResult<SplitSet>;
}

/// The strategy implementation for a configured [`TopologyStrategy`].
pub fn splitter_for(strategy: TopologyStrategy) -> Box<dyn TrailSplitter> {
    match strategy {
        TopologyStrategy::Manual => Box::new(ManualSplitter),
        TopologyStrategy::NodeNetwork => Box::new(NodeNetworkSplitter),
        TopologyStrategy::NativeNode => Box::new(NativeSplitter),
    }
}

// ── NodeNetworkSplitter ───────────────────────────────────────────────────────

/// Default strategy: `node(collect(geoms))` over every trail, then spatial
/// re-association of the pieces.
pub struct NodeNetworkSplitter;

impl TrailSplitter for NodeNetworkSplitter {
    fn name(&self) -> &'static str {
        "node_network"
    }

    fn split(
        &self,
        store: &TrailStore,
        connectors: &BTreeMap<TrailId, f64>,
        config: &NetworkConfig,
    ) -> ConditionResult<SplitSet> {
        if store.is_empty() {
            return Ok(SplitSet::default());
        }
        let lines: Vec<LineString<f64>> = store.iter().map(|t| t.geom.force_2d()).collect();
        let pieces = node_collection(&lines)?;
        let (grouped, unmatched) = associate(pieces, store, config);

        let mut set = finish(store, grouped, connectors, config);
        if !unmatched.is_empty() {
            log::warn!("{} noded piece(s) failed parent association", unmatched.len());
        }
        set.unmatched = unmatched;
        Ok(set)
    }
}

// ── ManualSplitter ────────────────────────────────────────────────────────────

/// Pass-through strategy for inputs already split upstream.  Each trail
/// becomes a single segment; residual crossings are diagnosed, not fixed.
pub struct ManualSplitter;

impl TrailSplitter for ManualSplitter {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn split(
        &self,
        store: &TrailStore,
        connectors: &BTreeMap<TrailId, f64>,
        config: &NetworkConfig,
    ) -> ConditionResult<SplitSet> {
        let grouped: Vec<(TrailId, Vec<LineString<f64>>)> = store
            .iter()
            .map(|t| (t.id.clone(), vec![t.geom.force_2d()]))
            .collect();

        let mut set = finish(store, grouped, connectors, config);
        set.residual_crossings = count_residual_crossings(&set.segments);
        if set.residual_crossings > 0 {
            log::warn!(
                "manual strategy found {} residual crossing pair(s); upstream pre-split promise broken",
                set.residual_crossings
            );
        }
        Ok(set)
    }
}

// ── NativeSplitter ────────────────────────────────────────────────────────────

/// Incremental strategy: each trail is split at its intersections with its
/// spatial neighbors (provenance preserved), followed by a light residual
/// validation pass.
pub struct NativeSplitter;

impl TrailSplitter for NativeSplitter {
    fn name(&self) -> &'static str {
        "native_node"
    }

    fn split(
        &self,
        store: &TrailStore,
        connectors: &BTreeMap<TrailId, f64>,
        config: &NetworkConfig,
    ) -> ConditionResult<SplitSet> {
        let snapshot = store.spatial_snapshot();
        let mut grouped: Vec<(TrailId, Vec<LineString<f64>>)> = Vec::new();

        for trail in store.iter() {
            let line = trail.geom.force_2d();
            let Ok(env) = kernel::envelope(&line) else {
                continue;
            };
            let mut measures = Vec::new();
            for other_id in snapshot.dwithin(env, config.intersection_tol_m) {
                if *other_id == trail.id {
                    continue;
                }
                let other = store.by_id(other_id).expect("snapshot ids come from the store");
                measures.extend(crossing_measures(&line, &other.geom.line));
            }
            grouped.push((trail.id.clone(), split_at_measures(&line, &measures, NODE_EPS)));
        }

        let mut set = finish(store, grouped, connectors, config);
        set.residual_crossings = count_residual_crossings(&set.segments);
        if set.residual_crossings > 0 {
            log::warn!(
                "native noder left {} residual crossing pair(s)",
                set.residual_crossings
            );
        }
        Ok(set)
    }
}

// ── Association ───────────────────────────────────────────────────────────────

/// Associate each noded piece with exactly one parent trail.
///
/// Candidates come from the envelope index; a candidate qualifies when the
/// piece lies entirely within the intersection-tolerance buffer of the
/// parent's geometry.  Among qualifiers the ranking is (overlap length desc,
/// mean distance asc, parent id asc).
fn associate(
    pieces: Vec<LineString<f64>>,
    store: &TrailStore,
    config: &NetworkConfig,
) -> (Vec<(TrailId, Vec<LineString<f64>>)>, Vec<LineString<f64>>) {
    let snapshot = store.spatial_snapshot();
    let buffer = meters_to_degrees(config.intersection_tol_m);

    let mut by_parent: BTreeMap<TrailId, Vec<LineString<f64>>> = BTreeMap::new();
    let mut unmatched = Vec::new();

    for piece in pieces {
        let Ok(env) = kernel::envelope(&piece) else {
            unmatched.push(piece);
            continue;
        };

        let samples = sample_points(&piece);
        let mut best: Option<(f64, f64, &TrailId)> = None; // (overlap_km, mean_dist, id)
        for parent_id in snapshot.dwithin(env, config.intersection_tol_m) {
            let parent = store.by_id(parent_id).expect("snapshot ids come from the store");
            let dists: Vec<f64> = samples
                .iter()
                .map(|&p| kernel::point_line_distance(p, &parent.geom.line))
                .collect();
            if dists.iter().any(|&d| d > buffer) {
                continue;
            }
            let overlap = kernel::length_km(&piece);
            let mean = dists.iter().sum::<f64>() / dists.len() as f64;
            let better = match &best {
                None => true,
                Some((bo, bm, bid)) => {
                    overlap > *bo
                        || (overlap == *bo && mean < *bm)
                        || (overlap == *bo && mean == *bm && parent_id < *bid)
                }
            };
            if better {
                best = Some((overlap, mean, parent_id));
            }
        }

        match best {
            Some((_, _, id)) => by_parent.entry(id.clone()).or_default().push(piece),
            None => unmatched.push(piece),
        }
    }

    (by_parent.into_iter().collect(), unmatched)
}

/// Sample a piece at its vertices plus its linear-reference midpoint.
fn sample_points(piece: &LineString<f64>) -> Vec<geo::Point<f64>> {
    let mut pts: Vec<geo::Point<f64>> = piece.0.iter().map(|&c| c.into()).collect();
    if let Ok(mid) = kernel::midpoint(piece) {
        pts.push(mid);
    }
    pts
}

// ── Segment construction ──────────────────────────────────────────────────────

/// Turn grouped pieces into measured, ordinal-assigned split trails.
fn finish(
    store: &TrailStore,
    grouped: Vec<(TrailId, Vec<LineString<f64>>)>,
    connectors: &BTreeMap<TrailId, f64>,
    config: &NetworkConfig,
) -> SplitSet {
    let mut set = SplitSet::default();

    for (parent_id, pieces) in grouped {
        let parent = store.by_id(&parent_id).expect("grouping ids come from the store");

        // Measure each piece, dropping invalid and under-length ones.
        let mut measured: Vec<(f64, SplitTrail)> = Vec::new(); // keyed by midpoint measure
        for piece in pieces {
            if kernel::ensure_valid(&piece).is_err() {
                set.dropped_short += 1;
                continue;
            }
            let length_km = kernel::length_km(&piece);
            if km_to_meters(length_km) < config.min_edge_length_m {
                set.dropped_short += 1;
                continue;
            }
            measured.push(make_segment(parent, piece, length_km, connectors));
        }

        measured.sort_by(|a, b| {
            (a.0, a.1.start_measure)
                .partial_cmp(&(b.0, b.1.start_measure))
                .expect("finite measures")
        });
        for (ordinal, (_, mut seg)) in measured.into_iter().enumerate() {
            seg.ordinal = ordinal as u32 + 1;
            set.segments.push(seg);
        }
    }
    set
}

fn make_segment(
    parent: &Trail,
    piece: LineString<f64>,
    length_km: f64,
    connectors: &BTreeMap<TrailId, f64>,
) -> (f64, SplitTrail) {
    let line = &parent.geom.line;
    // A piece spanning the whole parent (closed rings locate both endpoints
    // at 0) covers the full measure range by definition.
    let (lo, hi) = if (length_km - parent.length_km).abs() <= CONNECTOR_EPS_KM {
        (0.0, 1.0)
    } else {
        let loc_start = kernel::locate(line, kernel::start_point(&piece));
        let loc_end = kernel::locate(line, kernel::end_point(&piece));
        if loc_start <= loc_end { (loc_start, loc_end) } else { (loc_end, loc_start) }
    };
    let start_measure = lo * parent.length_km;
    let end_measure = hi * parent.length_km;

    let mid = kernel::midpoint(&piece)
        .map(|p| kernel::locate(line, p))
        .unwrap_or(lo);

    let share = if parent.length_km > 0.0 { length_km / parent.length_km } else { 0.0 };
    let from_connector = connectors
        .get(&parent.id)
        .is_some_and(|&ck| end_measure <= ck + CONNECTOR_EPS_KM);

    let seg = SplitTrail {
        parent: parent.id.clone(),
        parent_name: parent.name.clone(),
        ordinal: 0, // assigned after sorting
        geom: piece,
        length_km,
        start_measure,
        end_measure,
        elevation_gain: parent.elevation_gain * share,
        elevation_loss: parent.elevation_loss * share,
        from_connector,
    };
    (mid, seg)
}

// ── Light validation ──────────────────────────────────────────────────────────

/// Count segment pairs that still cross in their interiors.
pub(crate) fn count_residual_crossings(segments: &[SplitTrail]) -> u32 {
    let envs: Vec<_> = segments
        .iter()
        .enumerate()
        .filter_map(|(i, s)| kernel::envelope(&s.geom).ok().map(|e| (i as u32, e)))
        .collect();
    let index = EnvelopeIndex::build(envs.clone());

    let mut crossings = 0;
    for (i, env) in envs {
        for j in index.bbox_intersects(env) {
            if j <= i {
                continue;
            }
            let a = &segments[i as usize].geom;
            let b = &segments[j as usize].geom;
            let len_a = kernel::length_planar(a);
            let interior = crossing_measures(a, b)
                .into_iter()
                .any(|m| m > NODE_EPS && m < len_a - NODE_EPS);
            if interior {
                crossings += 1;
            }
        }
    }
    crossings
}
