//! Core LineString operations.
//!
//! # Units
//!
//! Coordinates are EPSG:4326 degrees.  "Planar" lengths and distances are in
//! coordinate degrees; "metre" variants convert through the locked
//! [`tn_core::units::METERS_PER_DEGREE`] constant, except geodesic line
//! length which uses the haversine formula.  Tolerance comparisons always go
//! through the constant so both sides of a comparison agree.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{BoundingRect, Coord, Euclidean, Haversine, Intersects, Length, Line, LineString, Point, Rect};
use geo::{LineInterpolatePoint, LineLocatePoint};

use tn_core::units::{degrees_to_meters, meters_to_km};

use crate::error::{GeomError, GeomResult};

/// Coordinate-equality slop in degrees (~0.1 µm at the equator).  Used only
/// to recognise shared vertices, never as a geometric tolerance.
pub const COORD_EPS: f64 = 1e-12;

// ── Validity & simplicity ─────────────────────────────────────────────────────

/// `true` if `line` has at least 2 coordinates, all finite, and nonzero
/// planar length.
pub fn is_valid(line: &LineString<f64>) -> bool {
    ensure_valid(line).is_ok()
}

/// Like [`is_valid`] but reports the failing condition.
pub fn ensure_valid(line: &LineString<f64>) -> GeomResult<()> {
    if line.0.len() < 2 {
        return Err(GeomError::InvalidGeometry { reason: "fewer than 2 points" });
    }
    if line.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(GeomError::InvalidGeometry { reason: "non-finite coordinate" });
    }
    if length_planar(line) <= 0.0 {
        return Err(GeomError::InvalidGeometry { reason: "zero planar length" });
    }
    Ok(())
}

/// `true` if `line` has no self-intersection except at shared endpoints.
///
/// Adjacent segments may touch only at their shared vertex; the first and
/// last segment of a closed ring may touch at the ring's start point.
pub fn is_simple(line: &LineString<f64>) -> bool {
    let segs: Vec<Line<f64>> = line.lines().collect();
    let n = segs.len();
    let closed = line.is_closed();

    for i in 0..n {
        for j in (i + 1)..n {
            let Some(hit) = line_intersection(segs[i], segs[j]) else {
                continue;
            };
            let allowed_touch: Option<Coord<f64>> = if j == i + 1 {
                Some(segs[i].end)
            } else if closed && i == 0 && j == n - 1 {
                Some(segs[0].start)
            } else {
                None
            };
            match hit {
                LineIntersection::SinglePoint { intersection, is_proper } => {
                    match allowed_touch {
                        Some(shared) if !is_proper && coords_close(intersection, shared) => {}
                        _ => return false,
                    }
                }
                LineIntersection::Collinear { intersection } => {
                    // A degenerate (point-sized) overlap at the shared vertex
                    // is how consecutive collinear segments report.
                    let degenerate = coords_close(intersection.start, intersection.end);
                    match allowed_touch {
                        Some(shared)
                            if degenerate && coords_close(intersection.start, shared) => {}
                        _ => return false,
                    }
                }
            }
        }
    }
    true
}

// ── Lengths & endpoints ───────────────────────────────────────────────────────

/// Planar length in coordinate degrees.
#[inline]
pub fn length_planar(line: &LineString<f64>) -> f64 {
    Euclidean.length(line)
}

/// Geodesic (haversine) length in metres.
#[inline]
pub fn length_meters(line: &LineString<f64>) -> f64 {
    Haversine.length(line)
}

/// Geodesic length in kilometres — the cost unit of the network.
#[inline]
pub fn length_km(line: &LineString<f64>) -> f64 {
    meters_to_km(length_meters(line))
}

/// First coordinate as a `Point`.
#[inline]
pub fn start_point(line: &LineString<f64>) -> Point<f64> {
    line.0[0].into()
}

/// Last coordinate as a `Point`.
#[inline]
pub fn end_point(line: &LineString<f64>) -> Point<f64> {
    (*line.0.last().expect("LineString has at least one coordinate")).into()
}

/// Vertex order reversed; geometry otherwise identical.
pub fn reverse(line: &LineString<f64>) -> LineString<f64> {
    let mut coords = line.0.clone();
    coords.reverse();
    LineString::new(coords)
}

// ── Linear referencing ────────────────────────────────────────────────────────

/// Point at linear-referenced fraction `t ∈ [0, 1]` along `line`.
///
/// `t` is clamped; an invalid line is an error rather than a garbage point.
pub fn interpolate(line: &LineString<f64>, t: f64) -> GeomResult<Point<f64>> {
    ensure_valid(line)?;
    line.line_interpolate_point(t.clamp(0.0, 1.0))
        .ok_or(GeomError::InvalidGeometry { reason: "interpolation failed" })
}

/// Fraction `∈ [0, 1]` of the closest position on `line` to `p`.
pub fn locate(line: &LineString<f64>, p: Point<f64>) -> f64 {
    line.line_locate_point(&p).unwrap_or(0.0)
}

/// Midpoint of `line` by linear reference.
pub fn midpoint(line: &LineString<f64>) -> GeomResult<Point<f64>> {
    interpolate(line, 0.5)
}

// ── Distances ─────────────────────────────────────────────────────────────────

/// Planar distance between two points, in coordinate degrees.
#[inline]
pub fn distance_planar(a: Point<f64>, b: Point<f64>) -> f64 {
    let (dx, dy) = (b.x() - a.x(), b.y() - a.y());
    (dx * dx + dy * dy).sqrt()
}

/// Planar distance between two points converted to metres through the locked
/// constant.  This is the distance every tolerance in the pipeline compares
/// against.
#[inline]
pub fn distance_meters(a: Point<f64>, b: Point<f64>) -> f64 {
    degrees_to_meters(distance_planar(a, b))
}

/// Distance in degrees from `p` to the nearest point of segment `s`.
pub fn point_segment_distance(p: Coord<f64>, s: Line<f64>) -> f64 {
    let (dx, dy) = (s.end.x - s.start.x, s.end.y - s.start.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((p.x - s.start.x) * dx + (p.y - s.start.y) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (s.start.x + t * dx, s.start.y + t * dy);
    let (ex, ey) = (p.x - cx, p.y - cy);
    (ex * ex + ey * ey).sqrt()
}

/// Closest point to `p` on segment `s`.
pub fn segment_project(p: Coord<f64>, s: Line<f64>) -> Coord<f64> {
    let (dx, dy) = (s.end.x - s.start.x, s.end.y - s.start.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((p.x - s.start.x) * dx + (p.y - s.start.y) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Coord { x: s.start.x + t * dx, y: s.start.y + t * dy }
}

/// Distance in degrees from `p` to the nearest point of `line`.
pub fn point_line_distance(p: Point<f64>, line: &LineString<f64>) -> f64 {
    line.lines()
        .map(|s| point_segment_distance(p.into(), s))
        .fold(f64::INFINITY, f64::min)
}

/// Minimum planar distance in degrees between two LineStrings (0 if they
/// intersect).
pub fn lines_min_distance(a: &LineString<f64>, b: &LineString<f64>) -> f64 {
    if a.intersects(b) {
        return 0.0;
    }
    // For disjoint polylines the minimum is attained at a vertex of one side.
    let a_to_b = a.0.iter().map(|&c| point_line_distance(c.into(), b));
    let b_to_a = b.0.iter().map(|&c| point_line_distance(c.into(), a));
    a_to_b.chain(b_to_a).fold(f64::INFINITY, f64::min)
}

/// Discrete Hausdorff distance in degrees: the farthest any vertex of either
/// line is from the other line.  Small values mean the two geometries are
/// near-identical, which plain minimum distance cannot express.
pub fn lines_max_vertex_distance(a: &LineString<f64>, b: &LineString<f64>) -> f64 {
    lines_directed_max_vertex_distance(a, b).max(lines_directed_max_vertex_distance(b, a))
}

/// Directed variant of [`lines_max_vertex_distance`]: the farthest any
/// vertex of `a` is from `b`.  Near zero means `a` lies along `b` — `b` may
/// still extend beyond `a`.
pub fn lines_directed_max_vertex_distance(a: &LineString<f64>, b: &LineString<f64>) -> f64 {
    a.0.iter()
        .map(|&c| point_line_distance(c.into(), b))
        .fold(0.0, f64::max)
}

// ── Envelopes ─────────────────────────────────────────────────────────────────

/// Axis-aligned bounding rectangle.
pub fn envelope(line: &LineString<f64>) -> GeomResult<Rect<f64>> {
    line.bounding_rect()
        .ok_or(GeomError::InvalidGeometry { reason: "empty geometry has no envelope" })
}

/// `rect` grown by `d` degrees on every side.
pub fn expand_rect(rect: Rect<f64>, d: f64) -> Rect<f64> {
    Rect::new(
        Coord { x: rect.min().x - d, y: rect.min().y - d },
        Coord { x: rect.max().x + d, y: rect.max().y + d },
    )
}

/// `true` if the two envelopes come within `tol` degrees of each other.
pub fn rects_dwithin(a: Rect<f64>, b: Rect<f64>, tol: f64) -> bool {
    expand_rect(a, tol).intersects(&b)
}

// ── Coordinate helpers ────────────────────────────────────────────────────────

/// `true` if two coordinates coincide within [`COORD_EPS`].
#[inline]
pub fn coords_close(a: Coord<f64>, b: Coord<f64>) -> bool {
    (a.x - b.x).abs() <= COORD_EPS && (a.y - b.y).abs() <= COORD_EPS
}

/// Append `c` to `coords` unless it repeats the current last coordinate.
pub(crate) fn push_coord(coords: &mut Vec<Coord<f64>>, c: Coord<f64>) {
    if coords.last().is_none_or(|&last| !coords_close(last, c)) {
        coords.push(c);
    }
}
