//! VertexWelder — merge near-coincident vertices.
//!
//! Independent endpoint snapping can mint several vertices for what is
//! physically one junction.  Welding remaps edges from each such vertex onto
//! the smallest-id survivor, re-pins edge geometry endpoints so the
//! edge–vertex snap invariant keeps holding, and deletes the orphaned
//! vertices.  Repeats until a pass changes nothing.

use tn_core::units::meters_to_degrees;
use tn_core::{NetworkConfig, VertexId};

use crate::graph::NetworkGraph;

/// Welding pass statistics.
#[derive(Copy, Clone, Debug, Default)]
pub struct WeldStats {
    pub passes: u32,
    pub welded: u32,
    /// Edges that collapsed to degenerate (non-true-loop) self-loops and
    /// were removed.
    pub dropped_self_loops: u32,
}

/// Fix-point vertex welder.
pub struct VertexWelder<'a> {
    config: &'a NetworkConfig,
}

impl<'a> VertexWelder<'a> {
    pub fn new(config: &'a NetworkConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, graph: &mut NetworkGraph) -> WeldStats {
        let tol_deg = meters_to_degrees(self.config.vertex_weld_tol_m);
        let mut stats = WeldStats::default();

        loop {
            stats.passes += 1;

            // Plan this pass: ascending-u pairs, each vertex consumed once.
            let (ids, index) = graph.vertex_point_index();
            let mut consumed = vec![false; ids.len()];
            let mut welds: Vec<(VertexId, VertexId)> = Vec::new(); // (v → u)
            for (i, &u) in ids.iter().enumerate() {
                if consumed[i] {
                    continue;
                }
                let u_point = graph.vertex(u).expect("id from live table").point;
                for j in index.dwithin(u_point, tol_deg) {
                    let j = j as usize;
                    if j <= i || consumed[j] {
                        continue;
                    }
                    consumed[j] = true;
                    welds.push((ids[j], u));
                }
            }

            if welds.is_empty() {
                break;
            }

            for (v, u) in welds {
                self.weld_into(graph, v, u);
                stats.welded += 1;
            }

            // Welding both endpoints of a short edge onto one vertex leaves
            // a degenerate self-loop; true loops are the only ones allowed
            // to survive.
            let degenerate: Vec<_> = graph
                .edges()
                .filter(|e| e.source == e.target && !e.is_true_loop)
                .map(|e| e.id)
                .collect();
            for id in degenerate {
                graph.remove_edge(id);
                stats.dropped_self_loops += 1;
            }

            graph.remove_orphan_vertices();
        }

        graph.recompute_degrees();
        if stats.welded > 0 {
            log::info!(
                "vertex welding merged {} vertex(es) in {} pass(es)",
                stats.welded,
                stats.passes
            );
        }
        stats
    }

    /// Remap every edge endpoint at `v` onto `u`, re-pinning geometry, then
    /// delete `v`.
    fn weld_into(&self, graph: &mut NetworkGraph, v: VertexId, u: VertexId) {
        let u_point = graph.vertex(u).expect("weld target is live").point;
        let affected: Vec<_> = graph
            .edges()
            .filter(|e| e.source == v || e.target == v)
            .map(|e| e.id)
            .collect();

        for id in affected {
            let e = graph.edge_mut(id).expect("id from live table");
            if e.source == v {
                e.source = u;
                if let Some(first) = e.geom.0.first_mut() {
                    *first = u_point.into();
                }
            }
            if e.target == v {
                e.target = u;
                if let Some(last) = e.geom.0.last_mut() {
                    *last = u_point.into();
                }
            }
            graph.refresh_edge_length(id);
        }
        graph.remove_vertex(v);
    }
}
