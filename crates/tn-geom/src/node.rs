//! Noding: split a collection of LineStrings at every pairwise intersection.
//!
//! The output's union equals the input's union and no two output parts cross
//! — they may only touch at endpoints.  Self-intersections are noded too, so
//! every output part is simple.
//!
//! Candidate pruning goes through an envelope R-tree; the segment-pair sweep
//! within a candidate pair is exact (`geo`'s robust line intersection).

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, LineString};

use crate::error::{GeomError, GeomResult};
use crate::index::EnvelopeIndex;
use crate::kernel::{self, push_coord};

/// Measure-deduplication slop in degrees (~0.1 mm).  Cuts closer together
/// than this collapse into one node.
pub const NODE_EPS: f64 = 1e-9;

// ── Public API ────────────────────────────────────────────────────────────────

/// Split every line in `lines` at every intersection with any line in the
/// collection (itself included).  The flat result is the component list of
/// the noded union; parent provenance is intentionally not preserved —
/// callers that need it re-associate spatially.
pub fn node_collection(lines: &[LineString<f64>]) -> GeomResult<Vec<LineString<f64>>> {
    if lines.is_empty() {
        return Err(GeomError::EmptyCollection);
    }
    for line in lines {
        kernel::ensure_valid(line)?;
    }

    let index = EnvelopeIndex::build(
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| (i as u32, kernel::envelope(l).expect("validated line")))
            .collect(),
    );

    let mut out = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let mut measures = self_intersection_measures(line);

        let env = kernel::envelope(line)?;
        for j in index.bbox_intersects(env) {
            let j = j as usize;
            if j == i {
                continue;
            }
            measures.extend(crossing_measures(line, &lines[j]));
        }

        out.extend(split_at_measures(line, &measures, NODE_EPS));
    }
    Ok(out)
}

/// Planar measures along `line` at which it crosses or touches `other`.
pub fn crossing_measures(line: &LineString<f64>, other: &LineString<f64>) -> Vec<f64> {
    let mut measures = Vec::new();
    let mut base = 0.0;
    for seg in line.lines() {
        let seg_len = segment_length(seg.start, seg.end);
        for oseg in other.lines() {
            match line_intersection(seg, oseg) {
                None => {}
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    measures.push(base + segment_length(seg.start, intersection));
                }
                Some(LineIntersection::Collinear { intersection }) => {
                    // Shared-overlap runs node at both overlap ends.
                    measures.push(base + segment_length(seg.start, intersection.start));
                    measures.push(base + segment_length(seg.start, intersection.end));
                }
            }
        }
        base += seg_len;
    }
    measures
}

/// Split `line` into pieces at the given planar measures.
///
/// Measures within `eps` of each other, of 0, or of the total length are
/// ignored.  Pieces inherit exact coordinates; cut points are interpolated
/// on the containing segment.
pub fn split_at_measures(
    line: &LineString<f64>,
    measures: &[f64],
    eps: f64,
) -> Vec<LineString<f64>> {
    let total = kernel::length_planar(line);
    let mut ms: Vec<f64> = measures
        .iter()
        .copied()
        .filter(|m| m.is_finite() && *m > eps && *m < total - eps)
        .collect();
    ms.sort_by(|a, b| a.partial_cmp(b).expect("finite measures"));
    ms.dedup_by(|a, b| (*a - *b).abs() <= eps);

    if ms.is_empty() {
        return vec![line.clone()];
    }

    let mut pieces: Vec<LineString<f64>> = Vec::with_capacity(ms.len() + 1);
    let mut current: Vec<Coord<f64>> = vec![line.0[0]];
    let mut walked = 0.0;
    let mut targets = ms.into_iter().peekable();

    for seg in line.lines() {
        let seg_len = segment_length(seg.start, seg.end);
        while let Some(&t) = targets.peek() {
            if t > walked + seg_len {
                break;
            }
            targets.next();
            let frac = if seg_len > 0.0 { (t - walked) / seg_len } else { 0.0 };
            let cut = Coord {
                x: seg.start.x + frac * (seg.end.x - seg.start.x),
                y: seg.start.y + frac * (seg.end.y - seg.start.y),
            };
            push_coord(&mut current, cut);
            if current.len() >= 2 {
                pieces.push(LineString::new(std::mem::replace(&mut current, vec![cut])));
            } else {
                current = vec![cut];
            }
        }
        push_coord(&mut current, seg.end);
        walked += seg_len;
    }

    if current.len() >= 2 {
        pieces.push(LineString::new(current));
    }
    pieces
}

// ── Internals ─────────────────────────────────────────────────────────────────

/// Measures at which `line` crosses itself (non-adjacent segment pairs).
fn self_intersection_measures(line: &LineString<f64>) -> Vec<f64> {
    let segs: Vec<_> = line.lines().collect();
    let mut seg_start = vec![0.0; segs.len()];
    let mut acc = 0.0;
    for (k, seg) in segs.iter().enumerate() {
        seg_start[k] = acc;
        acc += segment_length(seg.start, seg.end);
    }

    let mut measures = Vec::new();
    for i in 0..segs.len() {
        for j in (i + 2)..segs.len() {
            if let Some(LineIntersection::SinglePoint { intersection, .. }) =
                line_intersection(segs[i], segs[j])
            {
                // Ring closure (last segment ending on the first vertex) is a
                // legitimate endpoint touch, not a node.
                if i == 0
                    && j == segs.len() - 1
                    && kernel::coords_close(intersection, segs[0].start)
                {
                    continue;
                }
                measures.push(seg_start[i] + segment_length(segs[i].start, intersection));
                measures.push(seg_start[j] + segment_length(segs[j].start, intersection));
            }
        }
    }
    measures
}

#[inline]
fn segment_length(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    (dx * dx + dy * dy).sqrt()
}
