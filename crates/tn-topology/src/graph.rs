//! The noded graph: flat vertex and edge tables.
//!
//! Cyclic references are avoided by construction — edges refer to vertices
//! through integer IDs and the two tables are `BTreeMap`s, giving every
//! stage an ascending-id iteration order for free.

use std::collections::BTreeMap;

use geo::{LineString, Point};
use rustc_hash::FxHashMap;

use tn_core::{EdgeId, VertexId};
use tn_geom::{kernel, PointIndex};

use crate::composition::{CompositionIndex, CompositionType};

// ── EdgeKind ──────────────────────────────────────────────────────────────────

/// How an edge came to exist.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EdgeKind {
    /// One split trail, unmodified.
    Direct,
    /// Product of a degree-2 chain merge.
    Merged,
    /// Born from a gap-bridge connector.
    Bridge,
    /// A merge whose constituents included connector geometry.
    ConnectorCollapsed,
}

// ── Vertex ────────────────────────────────────────────────────────────────────

/// A graph vertex.
///
/// `degree` is a cache: authoritative only after
/// [`NetworkGraph::recompute_degrees`], which every stage runs at its
/// boundary.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub id: VertexId,
    pub point: Point<f64>,
    pub degree: u32,
    /// `true` when a true-loop edge is anchored here.
    pub true_loop_attached: bool,
}

// ── Edge ──────────────────────────────────────────────────────────────────────

/// A graph edge.  Geometry endpoints are pinned to the source/target vertex
/// points within the edge-snap tolerance.
#[derive(Clone, Debug)]
pub struct Edge {
    pub id: EdgeId,
    pub source: VertexId,
    pub target: VertexId,
    pub geom: LineString<f64>,
    pub length_km: f64,
    pub elevation_gain: f64,
    pub elevation_loss: f64,
    pub name: String,
    pub kind: EdgeKind,
    /// Self-loop retained intentionally (a near-closed ring).
    pub is_true_loop: bool,
}

/// Field bundle for inserting an edge (the graph assigns the id).
#[derive(Clone, Debug)]
pub struct NewEdge {
    pub source: VertexId,
    pub target: VertexId,
    pub geom: LineString<f64>,
    pub length_km: f64,
    pub elevation_gain: f64,
    pub elevation_loss: f64,
    pub name: String,
    pub kind: EdgeKind,
    pub is_true_loop: bool,
}

// ── NetworkGraph ──────────────────────────────────────────────────────────────

/// The two flat tables plus the composition index they share a lifetime
/// with.
#[derive(Clone, Debug, Default)]
pub struct NetworkGraph {
    vertices: BTreeMap<VertexId, Vertex>,
    edges: BTreeMap<EdgeId, Edge>,
    next_vertex: u32,
    next_edge: u32,
    pub composition: CompositionIndex,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ── Vertex operations ─────────────────────────────────────────────────

    /// Allocate a vertex at `point` with a fresh sequential id.
    pub fn alloc_vertex(&mut self, point: Point<f64>) -> VertexId {
        let id = VertexId(self.next_vertex);
        self.next_vertex += 1;
        self.vertices
            .insert(id, Vertex { id, point, degree: 0, true_loop_attached: false });
        id
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    /// Ascending-id cursor over vertices.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    pub fn remove_vertex(&mut self, id: VertexId) -> Option<Vertex> {
        self.vertices.remove(&id)
    }

    /// Move a vertex to a new point (used when welding re-pins geometry).
    pub fn set_vertex_point(&mut self, id: VertexId, point: Point<f64>) {
        if let Some(v) = self.vertices.get_mut(&id) {
            v.point = point;
        }
    }

    /// Drop every vertex no edge touches.  Returns how many went.
    pub fn remove_orphan_vertices(&mut self) -> usize {
        let mut incident: FxHashMap<VertexId, u32> = FxHashMap::default();
        for e in self.edges.values() {
            *incident.entry(e.source).or_default() += 1;
            *incident.entry(e.target).or_default() += 1;
        }
        let before = self.vertices.len();
        self.vertices.retain(|id, _| incident.contains_key(id));
        before - self.vertices.len()
    }

    // ── Edge operations ───────────────────────────────────────────────────

    /// Insert an edge with a fresh sequential id.  The caller attaches the
    /// composition separately (builder) or uses [`replace_edges`] (merges).
    ///
    /// [`replace_edges`]: NetworkGraph::replace_edges
    pub fn insert_edge(&mut self, new: NewEdge) -> EdgeId {
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.edges.insert(
            id,
            Edge {
                id,
                source: new.source,
                target: new.target,
                geom: new.geom,
                length_km: new.length_km,
                elevation_gain: new.elevation_gain,
                elevation_loss: new.elevation_loss,
                name: new.name,
                kind: new.kind,
                is_true_loop: new.is_true_loop,
            },
        );
        id
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(&id)
    }

    /// Ascending-id cursor over edges.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().copied().collect()
    }

    /// Remove an edge, cascading its composition entries.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let removed = self.edges.remove(&id);
        if removed.is_some() {
            self.composition.remove(id);
        }
        removed
    }

    /// Atomically replace `constituents` with one merged edge: the new edge
    /// is inserted, its composition is assembled from the constituents' in
    /// the order given, and the constituents (rows and compositions) are
    /// removed.  Nothing observable is left half-done.
    pub fn replace_edges(
        &mut self,
        new: NewEdge,
        constituents: &[EdgeId],
        kind: CompositionType,
    ) -> EdgeId {
        let id = self.insert_edge(new);
        self.composition.merge(id, constituents, kind);
        for &c in constituents {
            self.edges.remove(&c);
        }
        id
    }

    // ── Derived state ─────────────────────────────────────────────────────

    /// Refresh every vertex's cached `degree` (and `true_loop_attached`)
    /// from edge incidence.  A self-loop contributes 2.
    pub fn recompute_degrees(&mut self) {
        let mut degree: FxHashMap<VertexId, u32> = FxHashMap::default();
        let mut looped: FxHashMap<VertexId, bool> = FxHashMap::default();
        for e in self.edges.values() {
            *degree.entry(e.source).or_default() += 1;
            *degree.entry(e.target).or_default() += 1;
            if e.is_true_loop {
                looped.insert(e.source, true);
                looped.insert(e.target, true);
            }
        }
        for v in self.vertices.values_mut() {
            v.degree = degree.get(&v.id).copied().unwrap_or(0);
            v.true_loop_attached = looped.get(&v.id).copied().unwrap_or(false);
        }
    }

    /// Incident edge ids per vertex, each list ascending.
    pub fn incidence(&self) -> FxHashMap<VertexId, Vec<EdgeId>> {
        let mut map: FxHashMap<VertexId, Vec<EdgeId>> = FxHashMap::default();
        for e in self.edges.values() {
            map.entry(e.source).or_default().push(e.id);
            if e.source != e.target {
                map.entry(e.target).or_default().push(e.id);
            }
        }
        // BTreeMap iteration pushed ascending ids already; self-loops appear
        // once per list by construction.
        map
    }

    /// Point index over current vertices plus the id order it was built in.
    pub fn vertex_point_index(&self) -> (Vec<VertexId>, PointIndex) {
        let ids: Vec<VertexId> = self.vertices.keys().copied().collect();
        let index = PointIndex::build(
            ids.iter()
                .enumerate()
                .map(|(i, id)| (i as u32, self.vertices[id].point))
                .collect(),
        );
        (ids, index)
    }

    /// The other endpoint of `edge` as seen from `v`.
    pub fn opposite(&self, edge: EdgeId, v: VertexId) -> Option<VertexId> {
        let e = self.edges.get(&edge)?;
        if e.source == v {
            Some(e.target)
        } else if e.target == v {
            Some(e.source)
        } else {
            None
        }
    }

    /// Total geodesic length of all edges, km.
    pub fn total_length_km(&self) -> f64 {
        self.edges.values().map(|e| e.length_km).sum()
    }

    /// Re-derive an edge's `length_km` from its geometry (after an endpoint
    /// re-pin).
    pub fn refresh_edge_length(&mut self, id: EdgeId) {
        if let Some(e) = self.edges.get_mut(&id) {
            e.length_km = kernel::length_km(&e.geom);
        }
    }
}
