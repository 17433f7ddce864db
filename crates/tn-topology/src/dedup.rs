//! EdgeDeduplicator — drop parallel duplicate edges.
//!
//! After welding, two trails surveyed over the same corridor can leave
//! multiple edges between one vertex pair.  Per unordered `(source, target)`
//! pair (self-loops excluded) the longest survives; rank is descending
//! planar length, then descending geodesic length, then ascending id.

use std::collections::BTreeMap;

use tn_core::{EdgeId, VertexId};
use tn_geom::kernel;

use crate::graph::NetworkGraph;

/// Fields don't need a config: the operation is tolerance-free.
pub struct EdgeDeduplicator;

impl EdgeDeduplicator {
    /// Returns the number of edges removed.
    pub fn run(graph: &mut NetworkGraph) -> u32 {
        let mut groups: BTreeMap<(VertexId, VertexId), Vec<EdgeId>> = BTreeMap::new();
        for e in graph.edges() {
            if e.source == e.target {
                continue;
            }
            let key = (e.source.min(e.target), e.source.max(e.target));
            groups.entry(key).or_default().push(e.id);
        }

        let mut removed = 0;
        for (_, mut ids) in groups {
            if ids.len() < 2 {
                continue;
            }
            ids.sort_by(|&a, &b| {
                let ea = graph.edge(a).expect("grouped from live table");
                let eb = graph.edge(b).expect("grouped from live table");
                let pa = kernel::length_planar(&ea.geom);
                let pb = kernel::length_planar(&eb.geom);
                pb.partial_cmp(&pa)
                    .expect("finite lengths")
                    .then_with(|| {
                        eb.length_km
                            .partial_cmp(&ea.length_km)
                            .expect("finite lengths")
                    })
                    .then_with(|| a.cmp(&b))
            });
            for &id in &ids[1..] {
                graph.remove_edge(id);
                removed += 1;
            }
        }

        if removed > 0 {
            graph.recompute_degrees();
            log::info!("edge deduplication removed {removed} parallel edge(s)");
        }
        removed
    }
}
