//! TopologyBuilder — split trails → edges + vertices.

use std::collections::BTreeMap;

use geo::Point;

use tn_core::units::{km_to_meters, meters_to_degrees};
use tn_core::{NetworkConfig, VertexId};
use tn_geom::kernel;

use tn_condition::{SplitSet, SplitTrail};

use crate::composition::CompositionType;
use crate::error::TopologyResult;
use crate::graph::{EdgeKind, NetworkGraph, NewEdge};

// ── TopologyOutcome ───────────────────────────────────────────────────────────

/// The built graph plus builder diagnostics.
#[derive(Debug)]
pub struct TopologyOutcome {
    pub graph: NetworkGraph,
    /// Candidate edges rejected because an endpoint had no vertex within
    /// the snap tolerance.
    pub rejected_unsnapped: usize,
    /// `source = target` candidates that were not true loops and were
    /// dropped.
    pub dropped_self_loops: usize,
    /// Edges marked as intentional true loops.
    pub true_loops: usize,
}

// ── TopologyBuilder ───────────────────────────────────────────────────────────

/// Builds the vertex and edge tables from a conditioned split-trail set.
pub struct TopologyBuilder<'a> {
    config: &'a NetworkConfig,
}

impl<'a> TopologyBuilder<'a> {
    pub fn new(config: &'a NetworkConfig) -> Self {
        Self { config }
    }

    /// Run the build:
    ///
    /// 1. one candidate edge per split trail (attributes inherited),
    /// 2. one vertex per distinct candidate endpoint,
    /// 3. source/target assignment by nearest vertex within the snap
    ///    tolerance (failures reject the candidate),
    /// 4. degree initialization,
    /// 5. self-loop policy — keep approximate cycles as true loops, drop
    ///    the rest.
    pub fn build(&self, split: &SplitSet) -> TopologyResult<TopologyOutcome> {
        let mut graph = NetworkGraph::new();
        let snap_deg = meters_to_degrees(self.config.edge_snap_tol_m);

        // ── Vertices: one per bitwise-distinct endpoint ───────────────────
        // Near-coincident endpoints are the welder's concern, not ours.
        let mut vertex_at: BTreeMap<(u64, u64), VertexId> = BTreeMap::new();
        for seg in &split.segments {
            for p in [kernel::start_point(&seg.geom), kernel::end_point(&seg.geom)] {
                vertex_at
                    .entry(point_key(p))
                    .or_insert_with(|| graph.alloc_vertex(p));
            }
        }
        let (vertex_ids, point_index) = graph.vertex_point_index();

        // ── Edges ─────────────────────────────────────────────────────────
        let mut outcome_rejected = 0;
        let mut candidates: Vec<(&SplitTrail, VertexId, VertexId)> = Vec::new();
        for seg in &split.segments {
            let start = kernel::start_point(&seg.geom);
            let end = kernel::end_point(&seg.geom);
            let source = snap_vertex(&point_index, &vertex_ids, start, snap_deg);
            let target = snap_vertex(&point_index, &vertex_ids, end, snap_deg);
            match (source, target) {
                (Some(s), Some(t)) => candidates.push((seg, s, t)),
                _ => {
                    outcome_rejected += 1;
                    log::warn!(
                        "rejected segment of trail {} (ordinal {}): unsnapped endpoint",
                        seg.parent,
                        seg.ordinal
                    );
                }
            }
        }

        let mut dropped_self_loops = 0;
        let mut true_loops = 0;
        for (seg, source, target) in candidates {
            let kind = if seg.from_connector { EdgeKind::Bridge } else { EdgeKind::Direct };
            let comp_kind =
                if seg.from_connector { CompositionType::Connector } else { CompositionType::Direct };

            let mut is_true_loop = false;
            if source == target {
                if self.is_true_loop(seg) {
                    is_true_loop = true;
                    true_loops += 1;
                } else {
                    dropped_self_loops += 1;
                    log::debug!(
                        "dropped degenerate self-loop from trail {} (ordinal {})",
                        seg.parent,
                        seg.ordinal
                    );
                    continue;
                }
            }

            let id = graph.insert_edge(NewEdge {
                source,
                target,
                geom: seg.geom.clone(),
                length_km: seg.length_km,
                elevation_gain: seg.elevation_gain,
                elevation_loss: seg.elevation_loss,
                name: seg.parent_name.clone(),
                kind,
                is_true_loop,
            });
            graph.composition.init_direct(
                id,
                seg.parent.clone(),
                seg.parent_name.clone(),
                seg.start_measure,
                seg.end_measure,
                comp_kind,
            );
        }

        graph.remove_orphan_vertices();
        graph.recompute_degrees();

        Ok(TopologyOutcome {
            graph,
            rejected_unsnapped: outcome_rejected,
            dropped_self_loops,
            true_loops,
        })
    }

    /// A `source = target` candidate is a true loop when its endpoints form
    /// an approximate cycle: they sit within the true-loop tolerance of
    /// each other *and* the ring is long enough to actually wrap around
    /// (otherwise it is a noding sliver).
    fn is_true_loop(&self, seg: &SplitTrail) -> bool {
        let start = kernel::start_point(&seg.geom);
        let end = kernel::end_point(&seg.geom);
        kernel::distance_meters(start, end) < self.config.true_loop_tol_m
            && km_to_meters(seg.length_km) >= 2.0 * self.config.true_loop_tol_m
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn point_key(p: Point<f64>) -> (u64, u64) {
    (p.x().to_bits(), p.y().to_bits())
}

fn snap_vertex(
    index: &tn_geom::PointIndex,
    ids: &[VertexId],
    p: Point<f64>,
    tol_deg: f64,
) -> Option<VertexId> {
    index
        .nearest_one(p)
        .filter(|&(_, d)| d <= tol_deg)
        .map(|(i, _)| ids[i as usize])
}
