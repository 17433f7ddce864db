//! Degree2ChainMerger — collapse chains of degree-2 vertices.
//!
//! A chain is a maximal walk `v0 − e1 − v1 − … − ek − vk` whose interior
//! vertices all have degree 2.  Each mergeable chain (k ≥ 2, anchored at a
//! non-degree-2 endpoint) is rewritten as a single edge whose attributes sum
//! its constituents and whose composition is the ordered concatenation of
//! theirs.  The stage runs as an explicit fix-point loop under a declared
//! iteration budget; exhausting the budget is a warning, not a failure.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use tn_core::units::{meters_to_degrees, meters_to_km};
use tn_core::{EdgeId, NetworkConfig, VertexId};
use tn_geom::{kernel, line_merge};

use crate::composition::CompositionType;
use crate::graph::{EdgeKind, NetworkGraph, NewEdge};

// ── ChainMergeStats ───────────────────────────────────────────────────────────

/// Outcome of the merge fix-point.
#[derive(Copy, Clone, Debug, Default)]
pub struct ChainMergeStats {
    pub passes: u32,
    pub merged_chains: u32,
    /// Chains abandoned because `line_merge` could not produce a continuous
    /// geometry reaching both endpoints.
    pub skipped_chains: u32,
    /// Short dead-end connectors removed by the pre-pass cleanup.
    pub removed_connectors: u32,
    /// The fix-point did not settle within the iteration budget.
    pub budget_exceeded: bool,
}

// ── Chain ─────────────────────────────────────────────────────────────────────

struct Chain {
    edges: Vec<EdgeId>,
    v0: VertexId,
    vk: VertexId,
    total_km: f64,
    min_edge: EdgeId,
}

// ── Degree2ChainMerger ────────────────────────────────────────────────────────

pub struct Degree2ChainMerger<'a> {
    config: &'a NetworkConfig,
}

impl<'a> Degree2ChainMerger<'a> {
    pub fn new(config: &'a NetworkConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, graph: &mut NetworkGraph) -> ChainMergeStats {
        let mut stats = ChainMergeStats::default();

        for pass in 1..=self.config.degree2_max_iterations {
            stats.passes = pass;
            stats.removed_connectors += self.cleanup_short_connectors(graph);

            graph.recompute_degrees();
            let mut chains = discover_chains(graph);
            if chains.is_empty() {
                log::info!(
                    "degree-2 merge settled after {} pass(es): {} merged, {} skipped",
                    pass,
                    stats.merged_chains,
                    stats.skipped_chains
                );
                return stats;
            }

            // Rank: longest chains first so the greedy selection favors the
            // biggest rewrites; min-edge-id keeps ties deterministic.
            chains.sort_by(|a, b| {
                b.edges
                    .len()
                    .cmp(&a.edges.len())
                    .then_with(|| {
                        b.total_km
                            .partial_cmp(&a.total_km)
                            .expect("finite lengths")
                    })
                    .then_with(|| a.min_edge.cmp(&b.min_edge))
            });

            // Greedy maximal non-overlapping subset.
            let mut used: FxHashSet<EdgeId> = FxHashSet::default();
            let mut merged_this_pass = 0;
            for chain in chains {
                if chain.edges.iter().any(|e| used.contains(e)) {
                    continue;
                }
                used.extend(chain.edges.iter().copied());
                match self.merge_chain(graph, &chain) {
                    Ok(()) => merged_this_pass += 1,
                    Err(reason) => {
                        stats.skipped_chains += 1;
                        log::warn!(
                            "skipped {}-edge chain {}~{}: {}",
                            chain.edges.len(),
                            chain.v0,
                            chain.vk,
                            reason
                        );
                    }
                }
            }
            stats.merged_chains += merged_this_pass;

            graph.remove_orphan_vertices();
            graph.recompute_degrees();

            // Every remaining chain was skipped: re-running discovery would
            // only rediscover them, so the graph is at its fix point.
            if merged_this_pass == 0 {
                return stats;
            }
        }

        stats.budget_exceeded = true;
        log::warn!(
            "degree-2 merge budget of {} pass(es) exhausted; continuing with the current graph",
            self.config.degree2_max_iterations
        );
        stats
    }

    // ── Pre-pass cleanup ──────────────────────────────────────────────────

    /// Remove edges at most `short_connector_max_m` long that attach to a
    /// dead-end vertex.  Noding slivers of this shape otherwise manufacture
    /// artificial degree-3 junctions.
    fn cleanup_short_connectors(&self, graph: &mut NetworkGraph) -> u32 {
        graph.recompute_degrees();
        let max_km = meters_to_km(self.config.short_connector_max_m);
        let degree = |g: &NetworkGraph, v: VertexId| g.vertex(v).map_or(0, |x| x.degree);

        let doomed: Vec<EdgeId> = graph
            .edges()
            .filter(|e| {
                e.length_km <= max_km
                    && !e.is_true_loop
                    && (degree(graph, e.source) == 1 || degree(graph, e.target) == 1)
            })
            .map(|e| e.id)
            .collect();

        for id in &doomed {
            graph.remove_edge(*id);
        }
        if !doomed.is_empty() {
            graph.remove_orphan_vertices();
            log::debug!("removed {} short dead-end connector(s)", doomed.len());
        }
        doomed.len() as u32
    }

    // ── Chain rewrite ─────────────────────────────────────────────────────

    fn merge_chain(&self, graph: &mut NetworkGraph, chain: &Chain) -> Result<(), &'static str> {
        // Orient v0 → vk; ties (rings, anchor pairs) put the smaller id
        // first.
        let (v0, vk, ordered): (VertexId, VertexId, Vec<EdgeId>) = if chain.vk < chain.v0 {
            (chain.vk, chain.v0, chain.edges.iter().rev().copied().collect())
        } else {
            (chain.v0, chain.vk, chain.edges.clone())
        };

        // Walk the chain, orienting each constituent geometry with it.
        let mut cur = v0;
        let mut geoms = Vec::with_capacity(ordered.len());
        let mut length_km = 0.0;
        let mut gain = 0.0;
        let mut loss = 0.0;
        let mut any_connector = false;
        let mut name_votes: BTreeMap<String, u32> = BTreeMap::new();

        for &eid in &ordered {
            let e = graph.edge(eid).ok_or("constituent edge no longer exists")?;
            let g = if e.source == cur {
                cur = e.target;
                e.geom.clone()
            } else if e.target == cur {
                cur = e.source;
                kernel::reverse(&e.geom)
            } else {
                return Err("chain walk is discontinuous");
            };
            geoms.push(g);
            length_km += e.length_km;
            gain += e.elevation_gain;
            loss += e.elevation_loss;
            any_connector |= matches!(e.kind, EdgeKind::Bridge | EdgeKind::ConnectorCollapsed);
            *name_votes.entry(e.name.clone()).or_default() += 1;
        }
        if cur != vk {
            return Err("chain walk did not reach the far endpoint");
        }

        // Majority name; ascending iteration makes ties pick the
        // lexicographically smallest.
        let mut best: Option<(u32, &str)> = None;
        for (name, &count) in &name_votes {
            if best.is_none_or(|(bc, _)| count > bc) {
                best = Some((count, name.as_str()));
            }
        }
        let name = best.map(|(_, n)| n.to_owned()).unwrap_or_default();

        // Merge geometry; a MultiLineString falls back to its largest
        // component, which must still reach both chain endpoints.
        let join_eps = meters_to_degrees(self.config.edge_snap_tol_m);
        let merged = line_merge(&geoms, join_eps).map_err(|_| "no geometry to merge")?;
        let mut line = merged.largest_component();

        let snap_m = self.config.edge_snap_tol_m;
        let p0 = graph.vertex(v0).ok_or("chain endpoint vanished")?.point;
        let pk = graph.vertex(vk).ok_or("chain endpoint vanished")?.point;
        let s = kernel::start_point(&line);
        let e = kernel::end_point(&line);
        let forward =
            kernel::distance_meters(s, p0) <= snap_m && kernel::distance_meters(e, pk) <= snap_m;
        let backward =
            kernel::distance_meters(s, pk) <= snap_m && kernel::distance_meters(e, p0) <= snap_m;
        if !forward {
            if backward {
                line = kernel::reverse(&line);
            } else {
                return Err("merged geometry does not span the chain endpoints");
            }
        }

        graph.replace_edges(
            NewEdge {
                source: v0,
                target: vk,
                geom: line,
                length_km,
                elevation_gain: gain,
                elevation_loss: loss,
                name,
                kind: if any_connector { EdgeKind::ConnectorCollapsed } else { EdgeKind::Merged },
                is_true_loop: v0 == vk,
            },
            &ordered,
            CompositionType::Merged,
        );
        Ok(())
    }
}

// ── Chain discovery ───────────────────────────────────────────────────────────

/// Find all mergeable chains: walks from every non-degree-2 anchor through
/// degree-2 interiors.  Discovered chains are edge-disjoint by construction
/// (the visited set), so the later greedy selection is a formality that
/// guards against pathological states.
fn discover_chains(graph: &NetworkGraph) -> Vec<Chain> {
    let incidence = graph.incidence();
    let degree = |v: VertexId| graph.vertex(v).map_or(0, |x| x.degree);

    let mut visited: FxHashSet<EdgeId> = FxHashSet::default();
    let mut chains = Vec::new();

    let anchors: Vec<VertexId> = graph
        .vertices()
        .filter(|v| v.degree != 2)
        .map(|v| v.id)
        .collect();

    for a in anchors {
        let Some(start_edges) = incidence.get(&a) else {
            continue;
        };
        for &e0 in start_edges {
            if visited.contains(&e0) {
                continue;
            }
            let first = graph.edge(e0).expect("incidence ids are live");
            if first.source == first.target {
                continue; // self-loops never participate in chains
            }

            let mut edges = vec![e0];
            let mut cur = graph.opposite(e0, a).expect("edge is incident to anchor");
            let budget = graph.edge_count();

            while degree(cur) == 2 && cur != a && edges.len() <= budget {
                let Some(inc) = incidence.get(&cur) else {
                    break;
                };
                let last = *edges.last().expect("chain walk is non-empty");
                let Some(&next) =
                    inc.iter().find(|&&e| e != last && !visited.contains(&e))
                else {
                    break;
                };
                cur = match graph.opposite(next, cur) {
                    Some(v) => v,
                    None => break,
                };
                edges.push(next);
            }

            visited.extend(edges.iter().copied());
            if edges.len() >= 2 {
                let total_km = edges
                    .iter()
                    .map(|id| graph.edge(*id).expect("live").length_km)
                    .sum();
                let min_edge = *edges.iter().min().expect("non-empty");
                chains.push(Chain { edges, v0: a, vk: cur, total_km, min_edge });
            }
        }
    }
    chains
}
