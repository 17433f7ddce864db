//! Vertex snapping onto a reference geometry.

use geo::{Coord, LineString};

use crate::kernel::{point_segment_distance, segment_project};

/// Snap each vertex of `geom` to `reference` where it lies within `tol`
/// degrees: to the nearest reference *vertex* if one is in range, otherwise
/// onto the nearest reference *segment*.  Vertices farther than `tol` from
/// the reference are untouched.
pub fn snap_to_reference(
    geom: &LineString<f64>,
    reference: &LineString<f64>,
    tol: f64,
) -> LineString<f64> {
    let coords = geom.0.iter().map(|&c| snap_coord(c, reference, tol)).collect();
    LineString::new(coords)
}

fn snap_coord(c: Coord<f64>, reference: &LineString<f64>, tol: f64) -> Coord<f64> {
    // Vertex snap wins over segment snap so shared endpoints stay exact.
    let mut best_vertex: Option<(f64, Coord<f64>)> = None;
    for &r in &reference.0 {
        let d = {
            let (dx, dy) = (r.x - c.x, r.y - c.y);
            (dx * dx + dy * dy).sqrt()
        };
        if d <= tol && best_vertex.is_none_or(|(bd, _)| d < bd) {
            best_vertex = Some((d, r));
        }
    }
    if let Some((_, r)) = best_vertex {
        return r;
    }

    let mut best_proj: Option<(f64, Coord<f64>)> = None;
    for seg in reference.lines() {
        let d = point_segment_distance(c, seg);
        if d <= tol && best_proj.is_none_or(|(bd, _)| d < bd) {
            best_proj = Some((d, segment_project(c, seg)));
        }
    }
    best_proj.map_or(c, |(_, p)| p)
}
