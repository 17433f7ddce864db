//! Unit tests for tn-topology.
//!
//! Fixture scale: `D` below is 0.001° ≈ 111 m, comfortably above every
//! default tolerance.

#[cfg(test)]
mod helpers {
    use geo::{Coord, LineString};

    use tn_condition::{SplitSet, SplitTrail};
    use tn_core::{EdgeId, TrailId, VertexId};
    use tn_geom::kernel;

    use crate::composition::CompositionType;
    use crate::graph::{EdgeKind, NetworkGraph, NewEdge};

    /// ~111 m in degrees.
    pub const D: f64 = 0.001;

    pub fn line(coords: &[(f64, f64)]) -> LineString<f64> {
        LineString::new(coords.iter().map(|&(x, y)| Coord { x, y }).collect())
    }

    pub fn seg(parent: &str, name: &str, ordinal: u32, coords: &[(f64, f64)]) -> SplitTrail {
        let geom = line(coords);
        let length_km = kernel::length_km(&geom);
        SplitTrail {
            parent: TrailId::from(parent),
            parent_name: name.to_owned(),
            ordinal,
            geom,
            length_km,
            start_measure: 0.0,
            end_measure: length_km,
            elevation_gain: 0.0,
            elevation_loss: 0.0,
            from_connector: false,
        }
    }

    pub fn split_set(segments: Vec<SplitTrail>) -> SplitSet {
        SplitSet { segments, ..Default::default() }
    }

    /// Insert a straight edge between two live vertices, with a direct
    /// single-trail composition.
    pub fn add_edge(
        g: &mut NetworkGraph,
        trail: &str,
        name: &str,
        a: VertexId,
        b: VertexId,
    ) -> EdgeId {
        let pa = g.vertex(a).unwrap().point;
        let pb = g.vertex(b).unwrap().point;
        add_edge_with_geom(g, trail, name, a, b, line(&[(pa.x(), pa.y()), (pb.x(), pb.y())]))
    }

    pub fn add_edge_with_geom(
        g: &mut NetworkGraph,
        trail: &str,
        name: &str,
        a: VertexId,
        b: VertexId,
        geom: LineString<f64>,
    ) -> EdgeId {
        let length_km = kernel::length_km(&geom);
        let id = g.insert_edge(NewEdge {
            source: a,
            target: b,
            geom,
            length_km,
            elevation_gain: 0.0,
            elevation_loss: 0.0,
            name: name.to_owned(),
            kind: EdgeKind::Direct,
            is_true_loop: false,
        });
        g.composition.init_direct(
            id,
            TrailId::from(trail),
            name,
            0.0,
            length_km,
            CompositionType::Direct,
        );
        id
    }
}

#[cfg(test)]
mod build {
    use tn_core::NetworkConfig;

    use super::helpers::{seg, split_set, D};
    use crate::{EdgeKind, TopologyBuilder};

    #[test]
    fn x_split_set_becomes_degree_four_junction() {
        // Two crossing trails already noded at the origin.
        let set = split_set(vec![
            seg("aa", "EastWest", 1, &[(-D, 0.0), (0.0, 0.0)]),
            seg("aa", "EastWest", 2, &[(0.0, 0.0), (D, 0.0)]),
            seg("bb", "NorthSouth", 1, &[(0.0, -D), (0.0, 0.0)]),
            seg("bb", "NorthSouth", 2, &[(0.0, 0.0), (0.0, D)]),
        ]);

        let cfg = NetworkConfig::default();
        let out = TopologyBuilder::new(&cfg).build(&set).unwrap();
        let g = &out.graph;

        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.vertex_count(), 5);
        assert_eq!(out.rejected_unsnapped, 0);

        let center = g
            .vertices()
            .find(|v| v.point.x() == 0.0 && v.point.y() == 0.0)
            .expect("center vertex exists");
        assert_eq!(center.degree, 4);

        // Every edge carries a one-entry direct composition at 100 %.
        for e in g.edges() {
            let comp = g.composition.lookup(e.id).unwrap();
            assert_eq!(comp.len(), 1);
            assert_eq!(comp[0].percentage, 100.0);
            assert_eq!(e.kind, EdgeKind::Direct);
        }
    }

    #[test]
    fn true_loop_is_kept_and_marked() {
        // A ~1.7 km ring returning exactly to its start.
        let ring = seg(
            "loop",
            "Lollipop Head",
            1,
            &[(0.0, 0.0), (4.0 * D, 0.0), (4.0 * D, 4.0 * D), (0.0, 4.0 * D), (0.0, 0.0)],
        );
        let cfg = NetworkConfig::default();
        let out = TopologyBuilder::new(&cfg).build(&split_set(vec![ring])).unwrap();

        assert_eq!(out.true_loops, 1);
        assert_eq!(out.dropped_self_loops, 0);
        let e = out.graph.edges().next().unwrap();
        assert_eq!(e.source, e.target);
        assert!(e.is_true_loop);
        // Self-loop contributes 2 to its vertex.
        let v = out.graph.vertex(e.source).unwrap();
        assert_eq!(v.degree, 2);
        assert!(v.true_loop_attached);
    }

    #[test]
    fn sliver_self_loop_is_dropped() {
        // ~17 m ring: endpoints coincide but nothing actually wraps.
        let m5 = 5.0 / 111_320.0;
        let sliver = seg("s", "Sliver", 1, &[(0.0, 0.0), (m5, 0.0), (m5, m5), (0.0, 0.0)]);
        let cfg = NetworkConfig::default();
        let out = TopologyBuilder::new(&cfg).build(&split_set(vec![sliver])).unwrap();

        assert_eq!(out.dropped_self_loops, 1);
        assert_eq!(out.graph.edge_count(), 0);
        assert_eq!(out.graph.vertex_count(), 0); // orphan removed
    }

    #[test]
    fn connector_segments_become_bridge_edges() {
        let mut s = seg("bb", "Extended", 1, &[(0.0, 0.0), (D, 0.0)]);
        s.from_connector = true;
        let cfg = NetworkConfig::default();
        let out = TopologyBuilder::new(&cfg).build(&split_set(vec![s])).unwrap();

        let e = out.graph.edges().next().unwrap();
        assert_eq!(e.kind, EdgeKind::Bridge);
        let comp = out.graph.composition.lookup(e.id).unwrap();
        assert_eq!(comp[0].kind, crate::CompositionType::Connector);
    }
}

#[cfg(test)]
mod weld {
    use geo::Point;

    use tn_core::NetworkConfig;

    use super::helpers::{add_edge, D};
    use crate::{NetworkGraph, VertexWelder};

    #[test]
    fn near_coincident_vertices_merge_and_geometry_repins() {
        let one_m = 1.0 / 111_320.0;
        let mut g = NetworkGraph::new();
        let v0 = g.alloc_vertex(Point::new(0.0, 0.0));
        let v1 = g.alloc_vertex(Point::new(D, 0.0));
        let v2 = g.alloc_vertex(Point::new(D + one_m, 0.0));
        let v3 = g.alloc_vertex(Point::new(2.0 * D, 0.0));
        add_edge(&mut g, "t1", "West", v0, v1);
        let e2 = add_edge(&mut g, "t2", "East", v2, v3);

        let cfg = NetworkConfig::default(); // weld tol 2 m
        let stats = VertexWelder::new(&cfg).run(&mut g);

        assert_eq!(stats.welded, 1);
        assert_eq!(g.vertex_count(), 3);
        assert!(g.vertex(v2).is_none(), "larger id is consumed");

        // The east edge now starts at the canonical vertex, geometry pinned.
        let e = g.edge(e2).unwrap();
        assert_eq!(e.source, v1);
        assert_eq!(e.geom.0[0].x, D);
        assert_eq!(g.vertex(v1).unwrap().degree, 2);
    }

    #[test]
    fn distant_vertices_stay_apart() {
        let five_m = 5.0 / 111_320.0;
        let mut g = NetworkGraph::new();
        let v0 = g.alloc_vertex(Point::new(0.0, 0.0));
        let v1 = g.alloc_vertex(Point::new(D, 0.0));
        let v2 = g.alloc_vertex(Point::new(D + five_m, 0.0));
        let v3 = g.alloc_vertex(Point::new(2.0 * D, 0.0));
        add_edge(&mut g, "t1", "West", v0, v1);
        add_edge(&mut g, "t2", "East", v2, v3);

        let cfg = NetworkConfig::default();
        let stats = VertexWelder::new(&cfg).run(&mut g);
        assert_eq!(stats.welded, 0);
        assert_eq!(g.vertex_count(), 4);
    }
}

#[cfg(test)]
mod dedup {
    use geo::Point;

    use super::helpers::{add_edge, add_edge_with_geom, line, D};
    use crate::{EdgeDeduplicator, NetworkGraph};

    #[test]
    fn keeps_only_the_longest_parallel_edge() {
        let mut g = NetworkGraph::new();
        let a = g.alloc_vertex(Point::new(0.0, 0.0));
        let b = g.alloc_vertex(Point::new(D, 0.0));
        let straight = add_edge(&mut g, "t1", "Short Way", a, b);
        let dogleg = add_edge_with_geom(
            &mut g,
            "t2",
            "Long Way",
            a,
            b,
            line(&[(0.0, 0.0), (D / 2.0, D / 2.0), (D, 0.0)]),
        );

        let removed = EdgeDeduplicator::run(&mut g);
        assert_eq!(removed, 1);
        assert!(g.edge(straight).is_none());
        assert!(g.edge(dogleg).is_some());
        // Cascaded composition.
        assert!(g.composition.lookup(straight).is_none());
        assert!(g.composition.lookup(dogleg).is_some());
        assert_eq!(g.vertex(a).unwrap().degree, 1);
    }

    #[test]
    fn self_loops_are_exempt() {
        let mut g = NetworkGraph::new();
        let a = g.alloc_vertex(Point::new(0.0, 0.0));
        let ring = line(&[(0.0, 0.0), (D, 0.0), (D, D), (0.0, 0.0)]);
        let e1 = add_edge_with_geom(&mut g, "l1", "Ring", a, a, ring.clone());
        let e2 = add_edge_with_geom(&mut g, "l2", "Ring", a, a, ring);

        assert_eq!(EdgeDeduplicator::run(&mut g), 0);
        assert!(g.edge(e1).is_some() && g.edge(e2).is_some());
    }
}

#[cfg(test)]
mod chains {
    use geo::Point;

    use tn_core::{NetworkConfig, TrailId};

    use super::helpers::{add_edge, add_edge_with_geom, line, D};
    use crate::{CompositionType, Degree2ChainMerger, EdgeKind, NetworkGraph};

    /// S1: dead-end − degree-2 − junction.
    #[test]
    fn two_edge_dead_end_merge() {
        let mut g = NetworkGraph::new();
        let v1 = g.alloc_vertex(Point::new(0.0, 0.0));
        let v2 = g.alloc_vertex(Point::new(D, 0.0));
        let v3 = g.alloc_vertex(Point::new(2.0 * D, 0.0));
        let v4 = g.alloc_vertex(Point::new(3.0 * D, D));
        let v5 = g.alloc_vertex(Point::new(3.0 * D, -D));
        add_edge(&mut g, "ta", "Marshall Valley", v1, v2);
        add_edge(&mut g, "tb", "Marshall Valley", v2, v3);
        add_edge(&mut g, "tc", "Spur A", v3, v4);
        add_edge(&mut g, "td", "Spur B", v3, v5);
        g.recompute_degrees();

        let cfg = NetworkConfig::default();
        let stats = Degree2ChainMerger::new(&cfg).run(&mut g);

        assert_eq!(stats.merged_chains, 1);
        assert_eq!(stats.skipped_chains, 0);
        assert!(!stats.budget_exceeded);
        assert_eq!(g.edge_count(), 3); // 4 − 2 + 1
        assert!(g.vertex(v2).is_none(), "interior vertex removed");

        let merged = g
            .edges()
            .find(|e| e.kind == EdgeKind::Merged)
            .expect("one merged edge");
        assert_eq!((merged.source, merged.target), (v1, v3));
        assert_eq!(merged.name, "Marshall Valley");
        assert_eq!(merged.geom.0.first().unwrap().x, 0.0);
        assert_eq!(merged.geom.0.last().unwrap().x, 2.0 * D);

        let comp = g.composition.lookup(merged.id).unwrap();
        assert_eq!(comp.len(), 2);
        assert_eq!(comp[0].trail, TrailId::from("ta"));
        assert_eq!(comp[1].trail, TrailId::from("tb"));
        assert_eq!(comp[0].ordinal, 1);
        assert_eq!(comp[1].ordinal, 2);
        assert!(comp.iter().all(|c| c.kind == CompositionType::Merged));
    }

    /// S2: three-edge chain through two interior vertices.
    #[test]
    fn three_edge_chain_merge() {
        let mut g = NetworkGraph::new();
        let n0 = g.alloc_vertex(Point::new(0.0, 0.0));
        let n1 = g.alloc_vertex(Point::new(D, 0.0));
        let n2 = g.alloc_vertex(Point::new(2.0 * D, 0.0));
        let n3 = g.alloc_vertex(Point::new(3.0 * D, 0.0));
        let n4 = g.alloc_vertex(Point::new(4.0 * D, D));
        let n5 = g.alloc_vertex(Point::new(4.0 * D, -D));
        add_edge(&mut g, "t1", "Mesa", n0, n1);
        add_edge(&mut g, "t2", "Mesa", n1, n2);
        add_edge(&mut g, "t3", "Mesa", n2, n3);
        add_edge(&mut g, "t4", "Spur A", n3, n4);
        add_edge(&mut g, "t5", "Spur B", n3, n5);
        g.recompute_degrees();

        let cfg = NetworkConfig::default();
        let before_km = g.total_length_km();
        let stats = Degree2ChainMerger::new(&cfg).run(&mut g);

        assert_eq!(stats.merged_chains, 1);
        assert_eq!(g.edge_count(), 3); // 5 − 3 + 1
        assert!(g.vertex(n1).is_none() && g.vertex(n2).is_none());

        let merged = g.edges().find(|e| e.kind == EdgeKind::Merged).unwrap();
        assert_eq!((merged.source, merged.target), (n0, n3));
        assert_eq!(g.composition.lookup(merged.id).unwrap().len(), 3);
        // Length conservation across the merge.
        assert!((g.total_length_km() - before_km).abs() < 1e-9);
    }

    #[test]
    fn merge_sums_attributes_and_votes_on_names() {
        let mut g = NetworkGraph::new();
        let v0 = g.alloc_vertex(Point::new(0.0, 0.0));
        let v1 = g.alloc_vertex(Point::new(D, 0.0));
        let v2 = g.alloc_vertex(Point::new(2.0 * D, 0.0));
        let v3 = g.alloc_vertex(Point::new(3.0 * D, 0.0));
        let v4 = g.alloc_vertex(Point::new(4.0 * D, D));
        let v5 = g.alloc_vertex(Point::new(4.0 * D, -D));
        let e1 = add_edge(&mut g, "t1", "Bear Peak", v0, v1);
        let e2 = add_edge(&mut g, "t2", "Bear Peak", v1, v2);
        let e3 = add_edge(&mut g, "t3", "Green Mountain", v2, v3);
        add_edge(&mut g, "t4", "Spur A", v3, v4);
        add_edge(&mut g, "t5", "Spur B", v3, v5);
        for (e, gain, loss) in [(e1, 10.0, 2.0), (e2, 20.0, 3.0), (e3, 5.0, 1.0)] {
            let edge = g.edge_mut(e).unwrap();
            edge.elevation_gain = gain;
            edge.elevation_loss = loss;
        }
        g.recompute_degrees();

        let cfg = NetworkConfig::default();
        Degree2ChainMerger::new(&cfg).run(&mut g);

        let merged = g.edges().find(|e| e.kind == EdgeKind::Merged).unwrap();
        assert_eq!(merged.name, "Bear Peak"); // 2 votes vs 1
        assert_eq!(merged.elevation_gain, 35.0);
        assert_eq!(merged.elevation_loss, 6.0);
    }

    #[test]
    fn short_dead_end_connector_is_cleaned_before_merging() {
        let one_m = 1.0 / 111_320.0;
        let mut g = NetworkGraph::new();
        let v0 = g.alloc_vertex(Point::new(0.0, 0.0));
        let v1 = g.alloc_vertex(Point::new(D, 0.0));
        let v2 = g.alloc_vertex(Point::new(2.0 * D, 0.0));
        // A 1 m stub hanging off v1 turns it into a fake junction.
        let stub_tip = g.alloc_vertex(Point::new(D, one_m));
        add_edge(&mut g, "t1", "Mesa", v0, v1);
        add_edge(&mut g, "t2", "Mesa", v1, v2);
        add_edge(&mut g, "stub", "Sliver", v1, stub_tip);
        g.recompute_degrees();

        let cfg = NetworkConfig::default(); // short_connector_max_m = 2
        let stats = Degree2ChainMerger::new(&cfg).run(&mut g);

        assert_eq!(stats.removed_connectors, 1);
        assert_eq!(stats.merged_chains, 1, "stub removal unblocked the chain");
        assert_eq!(g.edge_count(), 1);
        assert!(g.vertex(stub_tip).is_none());
    }

    #[test]
    fn discontinuous_geometry_skips_the_chain() {
        let mut g = NetworkGraph::new();
        let v0 = g.alloc_vertex(Point::new(0.0, 0.0));
        let v1 = g.alloc_vertex(Point::new(D, 0.0));
        let v2 = g.alloc_vertex(Point::new(2.0 * D, 0.0));
        let v3 = g.alloc_vertex(Point::new(3.0 * D, D));
        let v4 = g.alloc_vertex(Point::new(3.0 * D, -D));
        add_edge(&mut g, "t1", "Mesa", v0, v1);
        // Geometry displaced far from its own endpoints: line_merge cannot
        // span the chain, so the merge must abandon it untouched.
        add_edge_with_geom(&mut g, "t2", "Mesa", v1, v2, line(&[(D, 0.5), (2.0 * D, 0.5)]));
        add_edge(&mut g, "t3", "Spur A", v2, v3);
        add_edge(&mut g, "t4", "Spur B", v2, v4);
        g.recompute_degrees();

        let cfg = NetworkConfig::default();
        let stats = Degree2ChainMerger::new(&cfg).run(&mut g);

        assert_eq!(stats.merged_chains, 0);
        assert_eq!(stats.skipped_chains, 1);
        assert!(!stats.budget_exceeded);
        assert_eq!(g.edge_count(), 4, "graph untouched");
        assert_eq!(g.composition.entry_count(), 4);
    }

    #[test]
    fn isolated_ring_of_degree_2_vertices_is_left_alone() {
        let mut g = NetworkGraph::new();
        let a = g.alloc_vertex(Point::new(0.0, 0.0));
        let b = g.alloc_vertex(Point::new(D, 0.0));
        let c = g.alloc_vertex(Point::new(D, D));
        add_edge(&mut g, "r1", "Ring", a, b);
        add_edge(&mut g, "r2", "Ring", b, c);
        add_edge(&mut g, "r3", "Ring", c, a);
        g.recompute_degrees();

        let cfg = NetworkConfig::default();
        let stats = Degree2ChainMerger::new(&cfg).run(&mut g);
        assert_eq!(stats.merged_chains, 0);
        assert_eq!(g.edge_count(), 3);
    }

    /// A ring hanging off one junction collapses to a true-loop self-edge.
    #[test]
    fn anchored_ring_merges_into_true_loop() {
        let mut g = NetworkGraph::new();
        let hub = g.alloc_vertex(Point::new(0.0, 0.0));
        let b = g.alloc_vertex(Point::new(D, 0.0));
        let c = g.alloc_vertex(Point::new(D, D));
        let tail = g.alloc_vertex(Point::new(-D, 0.0));
        add_edge(&mut g, "r1", "Lollipop", hub, b);
        add_edge(&mut g, "r2", "Lollipop", b, c);
        add_edge(&mut g, "r3", "Lollipop", c, hub);
        add_edge(&mut g, "t", "Approach", tail, hub);
        g.recompute_degrees();

        let cfg = NetworkConfig::default();
        let stats = Degree2ChainMerger::new(&cfg).run(&mut g);

        assert_eq!(stats.merged_chains, 1);
        let loop_edge = g.edges().find(|e| e.source == e.target).unwrap();
        assert!(loop_edge.is_true_loop);
        assert_eq!(loop_edge.source, hub);
        assert_eq!(g.composition.lookup(loop_edge.id).unwrap().len(), 3);
    }
}

#[cfg(test)]
mod composition {
    use tn_core::{EdgeId, TrailId};

    use crate::{CompositionIndex, CompositionType};

    #[test]
    fn init_direct_and_lookup() {
        let mut idx = CompositionIndex::new();
        idx.init_direct(
            EdgeId(0),
            TrailId::from("t1"),
            "Mesa",
            0.0,
            1.5,
            CompositionType::Direct,
        );
        let list = idx.lookup(EdgeId(0)).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].percentage, 100.0);
        assert!((list[0].length_km() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn merge_reorders_and_recomputes_percentages() {
        let mut idx = CompositionIndex::new();
        idx.init_direct(EdgeId(0), TrailId::from("t1"), "Mesa", 0.0, 3.0, CompositionType::Direct);
        idx.init_direct(EdgeId(1), TrailId::from("t2"), "Mesa", 0.0, 1.0, CompositionType::Direct);

        idx.merge(EdgeId(2), &[EdgeId(0), EdgeId(1)], CompositionType::Merged);

        assert!(idx.lookup(EdgeId(0)).is_none());
        assert!(idx.lookup(EdgeId(1)).is_none());
        let list = idx.lookup(EdgeId(2)).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].ordinal, 1);
        assert_eq!(list[1].ordinal, 2);
        assert!((list[0].percentage - 75.0).abs() < 1e-9);
        assert!((list[1].percentage - 25.0).abs() < 1e-9);
    }

    #[test]
    fn connector_provenance_survives_merging() {
        let mut idx = CompositionIndex::new();
        idx.init_direct(EdgeId(0), TrailId::from("t1"), "Mesa", 0.0, 1.0, CompositionType::Direct);
        idx.init_direct(
            EdgeId(1),
            TrailId::from("t1"),
            "Mesa",
            1.0,
            1.012,
            CompositionType::Connector,
        );
        idx.merge(EdgeId(2), &[EdgeId(0), EdgeId(1)], CompositionType::Merged);
        let list = idx.lookup(EdgeId(2)).unwrap();
        assert_eq!(list[0].kind, CompositionType::Merged);
        assert_eq!(list[1].kind, CompositionType::Connector);
    }

    #[test]
    fn summarize_aggregates_by_trail() {
        let mut idx = CompositionIndex::new();
        idx.init_direct(EdgeId(0), TrailId::from("t1"), "Mesa", 0.0, 2.0, CompositionType::Direct);
        idx.init_direct(EdgeId(1), TrailId::from("t1"), "Mesa", 2.0, 3.0, CompositionType::Direct);
        idx.init_direct(EdgeId(2), TrailId::from("t2"), "Bear", 0.0, 1.0, CompositionType::Direct);

        let shares = idx.summarize(&[EdgeId(0), EdgeId(1), EdgeId(2)]);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].trail, TrailId::from("t1"));
        assert!((shares[0].length_km - 3.0).abs() < 1e-12);
        assert!((shares[0].percentage - 75.0).abs() < 1e-9);
        assert!((shares[1].percentage - 25.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod validate {
    use geo::Point;

    use tn_core::{EdgeId, TrailId};

    use super::helpers::{add_edge, add_edge_with_geom, line, D};
    use crate::composition::CompositionType;
    use crate::{NetworkGraph, NetworkValidator, Violation};

    fn path_graph() -> NetworkGraph {
        let mut g = NetworkGraph::new();
        let a = g.alloc_vertex(Point::new(0.0, 0.0));
        let b = g.alloc_vertex(Point::new(D, 0.0));
        let c = g.alloc_vertex(Point::new(2.0 * D, D));
        add_edge(&mut g, "t1", "Mesa", a, b);
        add_edge(&mut g, "t2", "Mesa North", b, c);
        g
    }

    #[test]
    fn clean_graph_passes() {
        let mut g = path_graph();
        g.recompute_degrees();
        let report = NetworkValidator::run(&g);
        // b has degree 2 but is a path interior — still a violation by the
        // post-merge contract. Collapse first, then validate.
        assert!(report
            .violations
            .iter()
            .all(|v| matches!(v, Violation::InteriorDegree2 { .. })));
        assert_eq!(report.component_sizes, vec![3]);
    }

    #[test]
    fn stale_degree_cache_is_reported() {
        let g = path_graph(); // recompute_degrees never called
        let report = NetworkValidator::run(&g);
        assert!(report
            .violations
            .iter()
            .any(|v| matches!(v, Violation::DegreeMismatch { .. })));
    }

    #[test]
    fn unmarked_self_loop_is_reported() {
        let mut g = NetworkGraph::new();
        let a = g.alloc_vertex(Point::new(0.0, 0.0));
        add_edge_with_geom(&mut g, "l", "Ring", a, a, line(&[(0.0, 0.0), (D, 0.0), (0.0, 0.0)]));
        g.recompute_degrees();
        let report = NetworkValidator::run(&g);
        assert!(report
            .violations
            .iter()
            .any(|v| matches!(v, Violation::UnmarkedSelfLoop { .. })));
    }

    #[test]
    fn duplicate_pair_is_reported() {
        let mut g = NetworkGraph::new();
        let a = g.alloc_vertex(Point::new(0.0, 0.0));
        let b = g.alloc_vertex(Point::new(D, 0.0));
        add_edge(&mut g, "t1", "Mesa", a, b);
        add_edge(&mut g, "t2", "Mesa", a, b);
        g.recompute_degrees();
        let report = NetworkValidator::run(&g);
        assert!(report
            .violations
            .iter()
            .any(|v| matches!(v, Violation::DuplicatePair { count: 2, .. })));
    }

    #[test]
    fn floating_ring_downgrades_to_warning() {
        let mut g = NetworkGraph::new();
        let a = g.alloc_vertex(Point::new(0.0, 0.0));
        let b = g.alloc_vertex(Point::new(D, 0.0));
        let c = g.alloc_vertex(Point::new(D, D));
        add_edge(&mut g, "r1", "Ring", a, b);
        add_edge(&mut g, "r2", "Ring", b, c);
        add_edge(&mut g, "r3", "Ring", c, a);
        g.recompute_degrees();

        let report = NetworkValidator::run(&g);
        assert!(report.is_clean());
        assert_eq!(report.warnings.len(), 3);
        assert_eq!(report.component_sizes, vec![3]);
    }

    #[test]
    fn orphan_composition_is_reported() {
        let mut g = path_graph();
        g.recompute_degrees();
        g.composition.init_direct(
            EdgeId(999),
            TrailId::from("ghost"),
            "Ghost",
            0.0,
            1.0,
            CompositionType::Direct,
        );
        let report = NetworkValidator::run(&g);
        assert!(report
            .violations
            .iter()
            .any(|v| matches!(v, Violation::OrphanComposition { edge } if *edge == EdgeId(999))));
    }

    #[test]
    fn two_components_are_reported_by_size() {
        let mut g = NetworkGraph::new();
        let a = g.alloc_vertex(Point::new(0.0, 0.0));
        let b = g.alloc_vertex(Point::new(D, 0.0));
        let c = g.alloc_vertex(Point::new(10.0 * D, 0.0));
        let d = g.alloc_vertex(Point::new(11.0 * D, 0.0));
        let e = g.alloc_vertex(Point::new(12.0 * D, D));
        add_edge(&mut g, "t1", "West", a, b);
        add_edge(&mut g, "t2", "East", c, d);
        add_edge(&mut g, "t3", "East Spur", d, e);
        g.recompute_degrees();
        let report = NetworkValidator::run(&g);
        assert_eq!(report.component_sizes, vec![3, 2]);
    }
}
