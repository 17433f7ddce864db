//! `TrailStore` — validating owner of the trail table.

use std::collections::BTreeMap;

use geo::Rect;

use tn_core::units::meters_to_degrees;
use tn_core::{BBox, TrailId};
use tn_geom::{kernel, EnvelopeIndex, LineZ};

use crate::error::{StoreError, StoreResult};
use crate::trail::Trail;

// ── TrailStore ────────────────────────────────────────────────────────────────

/// Owns the source trail rows.
///
/// Backed by a `BTreeMap` keyed by `TrailId` so iteration is always
/// ascending-id and repeated builds see identical orders.
#[derive(Clone, Default, Debug)]
pub struct TrailStore {
    trails: BTreeMap<TrailId, Trail>,
}

impl TrailStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.trails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }

    // ── Mutations ─────────────────────────────────────────────────────────

    /// Insert a trail after validating its geometry.
    ///
    /// Rejections: invalid/degenerate geometry (`InvalidGeometry`), an id
    /// already present (`DuplicateId`).
    pub fn insert(&mut self, trail: Trail) -> StoreResult<()> {
        if let Err(source) = kernel::ensure_valid(&trail.geom.line) {
            return Err(StoreError::InvalidGeometry { id: trail.id.clone(), source });
        }
        if self.trails.contains_key(&trail.id) {
            return Err(StoreError::DuplicateId(trail.id));
        }
        self.trails.insert(trail.id.clone(), trail);
        Ok(())
    }

    /// Remove a trail by id, returning the removed row.
    pub fn remove(&mut self, id: &TrailId) -> StoreResult<Trail> {
        self.trails.remove(id).ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Replace a trail's geometry, re-deriving `length_km`.  The id and the
    /// remaining attributes are preserved.
    pub fn update_geometry(&mut self, id: &TrailId, geom: LineZ) -> StoreResult<()> {
        if let Err(source) = kernel::ensure_valid(&geom.line) {
            return Err(StoreError::InvalidGeometry { id: id.clone(), source });
        }
        let trail = self
            .trails
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        trail.geom = geom;
        trail.recompute_length();
        Ok(())
    }

    /// Drop every trail whose geometry lies outside `bbox` (any vertex
    /// inside keeps the trail).  Returns the number removed.
    pub fn retain_within(&mut self, bbox: &BBox) -> usize {
        let before = self.trails.len();
        self.trails
            .retain(|_, t| t.geom.line.0.iter().any(|c| bbox.contains(c.x, c.y)));
        before - self.trails.len()
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Ascending-id cursor over all trails.
    pub fn iter(&self) -> impl Iterator<Item = &Trail> {
        self.trails.values()
    }

    pub fn by_id(&self, id: &TrailId) -> Option<&Trail> {
        self.trails.get(id)
    }

    pub fn contains(&self, id: &TrailId) -> bool {
        self.trails.contains_key(id)
    }

    /// Trails whose envelope intersects `rect`, ascending id.
    pub fn within_bbox(&self, rect: Rect<f64>) -> Vec<&Trail> {
        self.iter()
            .filter(|t| {
                kernel::envelope(&t.geom.line)
                    .map(|e| kernel::rects_dwithin(e, rect, 0.0))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Build an envelope index over the current rows.
    ///
    /// The snapshot borrows nothing: it captures the id order at build time
    /// and is discarded after the stage that requested it (indexes are
    /// rebuilt, never incrementally maintained).
    pub fn spatial_snapshot(&self) -> SpatialSnapshot {
        let ids: Vec<TrailId> = self.trails.keys().cloned().collect();
        let entries = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let line = &self.trails[id].geom.line;
                (i as u32, kernel::envelope(line).expect("stored trails are valid"))
            })
            .collect();
        SpatialSnapshot { ids, index: EnvelopeIndex::build(entries) }
    }
}

// ── SpatialSnapshot ───────────────────────────────────────────────────────────

/// A build-once envelope index over the store plus the id order it was built
/// from.
pub struct SpatialSnapshot {
    ids: Vec<TrailId>,
    index: EnvelopeIndex,
}

impl SpatialSnapshot {
    /// Trails whose envelope comes within `tol_m` metres of `rect`,
    /// ascending id.
    pub fn dwithin(&self, rect: Rect<f64>, tol_m: f64) -> Vec<&TrailId> {
        self.index
            .dwithin(rect, meters_to_degrees(tol_m))
            .into_iter()
            .map(|i| &self.ids[i as usize])
            .collect()
    }

    /// Trails whose envelope intersects `rect`, ascending id.
    pub fn bbox_intersects(&self, rect: Rect<f64>) -> Vec<&TrailId> {
        self.index
            .bbox_intersects(rect)
            .into_iter()
            .map(|i| &self.ids[i as usize])
            .collect()
    }
}
