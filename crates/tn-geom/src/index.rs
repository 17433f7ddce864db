//! Build-once-query-many spatial indexes.
//!
//! Two R-trees (via `rstar`): an envelope index over LineString bounding
//! rectangles and a point index over vertex coordinates.  Both are
//! bulk-loaded for O(n log n) construction and are rebuilt after each
//! mutating stage — callers must not assume incremental updates.
//!
//! IDs are bare `u32`s; callers map them to their own identifier space
//! (trail position, `VertexId`, …).  Query results are sorted (by id, or by
//! distance then id) so downstream iteration is deterministic.

use geo::{Point, Rect};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

use crate::kernel::expand_rect;

type EnvelopeEntry = GeomWithData<Rectangle<[f64; 2]>, u32>;
type PointEntry = GeomWithData<[f64; 2], u32>;

// ── EnvelopeIndex ─────────────────────────────────────────────────────────────

/// R-tree over axis-aligned envelopes.
pub struct EnvelopeIndex {
    tree: RTree<EnvelopeEntry>,
}

impl EnvelopeIndex {
    /// Bulk-load from `(id, envelope)` pairs.
    pub fn build(entries: Vec<(u32, Rect<f64>)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(id, r)| {
                EnvelopeEntry::new(
                    Rectangle::from_corners([r.min().x, r.min().y], [r.max().x, r.max().y]),
                    id,
                )
            })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// IDs whose envelope intersects `rect`, ascending.
    pub fn bbox_intersects(&self, rect: Rect<f64>) -> Vec<u32> {
        let aabb = AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);
        let mut ids: Vec<u32> = self
            .tree
            .locate_in_envelope_intersecting(&aabb)
            .map(|e| e.data)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// IDs whose envelope comes within `tol` degrees of `rect`, ascending.
    pub fn dwithin(&self, rect: Rect<f64>, tol: f64) -> Vec<u32> {
        self.bbox_intersects(expand_rect(rect, tol))
    }
}

// ── PointIndex ────────────────────────────────────────────────────────────────

/// R-tree over 2D points (vertex coordinates).
pub struct PointIndex {
    tree: RTree<PointEntry>,
}

impl PointIndex {
    /// Bulk-load from `(id, point)` pairs.
    pub fn build(entries: Vec<(u32, Point<f64>)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(id, p)| PointEntry::new([p.x(), p.y()], id))
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nearest entry to `p`: `(id, planar distance in degrees)`.
    pub fn nearest_one(&self, p: Point<f64>) -> Option<(u32, f64)> {
        self.tree
            .nearest_neighbor_iter_with_distance_2(&[p.x(), p.y()])
            .next()
            .map(|(e, d2)| (e.data, d2.sqrt()))
    }

    /// Up to `k` nearest IDs, ascending distance (ties by id).
    pub fn nearest(&self, p: Point<f64>, k: usize) -> Vec<u32> {
        let mut hits: Vec<(f64, u32)> = self
            .tree
            .nearest_neighbor_iter_with_distance_2(&[p.x(), p.y()])
            .take(k)
            .map(|(e, d2)| (d2, e.data))
            .collect();
        hits.sort_by(|a, b| a.partial_cmp(b).expect("finite distances"));
        hits.into_iter().map(|(_, id)| id).collect()
    }

    /// IDs within `tol` degrees of `p`, ascending distance (ties by id).
    pub fn dwithin(&self, p: Point<f64>, tol: f64) -> Vec<u32> {
        let q = [p.x(), p.y()];
        let mut hits: Vec<(f64, u32)> = self
            .tree
            .locate_within_distance(q, tol * tol)
            .map(|e| {
                let g = e.geom();
                let (dx, dy) = (g[0] - q[0], g[1] - q[1]);
                (dx * dx + dy * dy, e.data)
            })
            .collect();
        hits.sort_by(|a, b| a.partial_cmp(b).expect("finite distances"));
        hits.into_iter().map(|(_, id)| id).collect()
    }
}
