//! NetworkValidator — post-build invariant checks.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use tn_core::{EdgeId, VertexId};

use crate::graph::NetworkGraph;

// ── Violation ─────────────────────────────────────────────────────────────────

/// One failed invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// Edge refers to a vertex id absent from the vertex table.
    DanglingEndpoint { edge: EdgeId },
    /// Stored degree differs from observed incidence.
    DegreeMismatch { vertex: VertexId, stored: u32, observed: u32 },
    /// Edge with zero length or degenerate geometry.
    ZeroLengthEdge { edge: EdgeId },
    /// `source = target` without the true-loop mark.
    UnmarkedSelfLoop { edge: EdgeId },
    /// More than one edge between an unordered vertex pair.
    DuplicatePair { a: VertexId, b: VertexId, count: usize },
    /// An interior degree-2 vertex survived chain merging.
    InteriorDegree2 { vertex: VertexId },
    /// Edge without a composition list.
    MissingComposition { edge: EdgeId },
    /// Composition list without a matching edge.
    OrphanComposition { edge: EdgeId },
    /// Composition percentage outside (0, 100].
    BadPercentage { edge: EdgeId, ordinal: u32 },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::DanglingEndpoint { edge } => {
                write!(f, "edge {edge} has a dangling endpoint")
            }
            Violation::DegreeMismatch { vertex, stored, observed } => {
                write!(f, "vertex {vertex} stores degree {stored}, observed {observed}")
            }
            Violation::ZeroLengthEdge { edge } => write!(f, "edge {edge} has zero length"),
            Violation::UnmarkedSelfLoop { edge } => {
                write!(f, "edge {edge} is a self-loop not marked as a true loop")
            }
            Violation::DuplicatePair { a, b, count } => {
                write!(f, "{count} parallel edges between {a} and {b}")
            }
            Violation::InteriorDegree2 { vertex } => {
                write!(f, "vertex {vertex} still has interior degree 2")
            }
            Violation::MissingComposition { edge } => {
                write!(f, "edge {edge} has no composition")
            }
            Violation::OrphanComposition { edge } => {
                write!(f, "composition for nonexistent edge {edge}")
            }
            Violation::BadPercentage { edge, ordinal } => {
                write!(f, "edge {edge} composition ordinal {ordinal} has percentage outside (0, 100]")
            }
        }
    }
}

// ── ValidationReport ──────────────────────────────────────────────────────────

/// All findings plus the connectivity report.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
    /// Findings downgraded to advisory (all-degree-2 ring components).
    pub warnings: Vec<Violation>,
    /// Weakly connected component sizes (vertex counts), descending.
    pub component_sizes: Vec<usize>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

// ── NetworkValidator ──────────────────────────────────────────────────────────

pub struct NetworkValidator;

impl NetworkValidator {
    /// Run every check.  The caller decides severity policy; the validator
    /// itself only downgrades the one case the merge stage cannot fix
    /// (isolated all-degree-2 rings, which have no merge anchor).
    pub fn run(graph: &NetworkGraph) -> ValidationReport {
        let mut report = ValidationReport::default();

        // 1 & 3 & self-loop marks.
        for e in graph.edges() {
            if graph.vertex(e.source).is_none() || graph.vertex(e.target).is_none() {
                report.violations.push(Violation::DanglingEndpoint { edge: e.id });
            }
            if e.length_km <= 0.0 || e.geom.0.len() < 2 {
                report.violations.push(Violation::ZeroLengthEdge { edge: e.id });
            }
            if e.source == e.target && !e.is_true_loop {
                report.violations.push(Violation::UnmarkedSelfLoop { edge: e.id });
            }
        }

        // 2: stored degree vs observed incidence.
        let mut observed: FxHashMap<VertexId, u32> = FxHashMap::default();
        for e in graph.edges() {
            *observed.entry(e.source).or_default() += 1;
            *observed.entry(e.target).or_default() += 1;
        }
        for v in graph.vertices() {
            let seen = observed.get(&v.id).copied().unwrap_or(0);
            if v.degree != seen {
                report.violations.push(Violation::DegreeMismatch {
                    vertex: v.id,
                    stored: v.degree,
                    observed: seen,
                });
            }
        }

        // 4: duplicate unordered pairs (true loops exempt).
        let mut pairs: BTreeMap<(VertexId, VertexId), usize> = BTreeMap::new();
        for e in graph.edges() {
            if e.source == e.target {
                continue;
            }
            *pairs
                .entry((e.source.min(e.target), e.source.max(e.target)))
                .or_default() += 1;
        }
        for ((a, b), count) in pairs {
            if count > 1 {
                report.violations.push(Violation::DuplicatePair { a, b, count });
            }
        }

        // Connectivity (7) computed before check 5, which needs components.
        let component_of = components(graph);
        let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
        for &c in component_of.values() {
            *sizes.entry(c).or_default() += 1;
        }
        report.component_sizes = sizes.values().copied().collect();
        report.component_sizes.sort_unstable_by(|a, b| b.cmp(a));

        // 5: interior degree-2 vertices.  A component whose every vertex has
        // degree 2 is a floating ring: no anchor exists to merge from, so
        // its vertices are advisory only.
        let mut all_deg2: FxHashMap<usize, bool> = FxHashMap::default();
        for v in graph.vertices() {
            let c = component_of[&v.id];
            let entry = all_deg2.entry(c).or_insert(true);
            *entry &= v.degree == 2;
        }
        for v in graph.vertices() {
            if v.degree == 2 {
                let ring = all_deg2.get(&component_of[&v.id]).copied().unwrap_or(false);
                let finding = Violation::InteriorDegree2 { vertex: v.id };
                if ring {
                    report.warnings.push(finding);
                } else {
                    report.violations.push(finding);
                }
            }
        }

        // 6: composition consistency.
        for e in graph.edges() {
            match graph.composition.lookup(e.id) {
                None => report.violations.push(Violation::MissingComposition { edge: e.id }),
                Some(list) => {
                    if list.is_empty() {
                        report.violations.push(Violation::MissingComposition { edge: e.id });
                    }
                    for c in list {
                        if c.percentage <= 0.0 || c.percentage > 100.0 {
                            report
                                .violations
                                .push(Violation::BadPercentage { edge: e.id, ordinal: c.ordinal });
                        }
                    }
                }
            }
        }
        for id in graph.composition.edge_ids() {
            if graph.edge(id).is_none() {
                report.violations.push(Violation::OrphanComposition { edge: id });
            }
        }

        report
    }
}

// ── Connectivity ──────────────────────────────────────────────────────────────

/// Weakly connected component label per vertex (labels are arbitrary but
/// deterministic: the smallest vertex index in the component).
fn components(graph: &NetworkGraph) -> BTreeMap<VertexId, usize> {
    let ids: Vec<VertexId> = graph.vertices().map(|v| v.id).collect();
    let pos: FxHashMap<VertexId, usize> = ids.iter().enumerate().map(|(i, &v)| (v, i)).collect();

    // Union–find over vertex positions.
    let mut parent: Vec<usize> = (0..ids.len()).collect();
    fn find(parent: &mut Vec<usize>, mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }
    for e in graph.edges() {
        let (Some(&a), Some(&b)) = (pos.get(&e.source), pos.get(&e.target)) else {
            continue;
        };
        let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
        if ra != rb {
            let (lo, hi) = (ra.min(rb), ra.max(rb));
            parent[hi] = lo;
        }
    }

    ids.iter()
        .enumerate()
        .map(|(i, &v)| (v, find(&mut parent, i)))
        .collect()
}
