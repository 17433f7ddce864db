//! Endpoint-joining line merge.
//!
//! Joins a collection of LineStrings into the maximal line(s) obtainable by
//! welding shared endpoints, reversing parts as needed.  Equivalent to the
//! `LineMerge` of a standard spatial library restricted to endpoint joins:
//! interior touches never fuse.

use geo::{Coord, LineString, MultiLineString};

use crate::error::{GeomError, GeomResult};
use crate::kernel::push_coord;

/// Outcome of [`line_merge`].
#[derive(Clone, Debug, PartialEq)]
pub enum Merged {
    /// Every input part fused into one continuous line.
    Single(LineString<f64>),
    /// The parts form more than one connected run.
    Multiple(MultiLineString<f64>),
}

impl Merged {
    /// The single line, or the longest component of a multi result.
    ///
    /// Planar length is the ranking; ties break on fewer coordinates, which
    /// is deterministic for any fixed input order.
    pub fn largest_component(self) -> LineString<f64> {
        match self {
            Merged::Single(l) => l,
            Merged::Multiple(ml) => ml
                .0
                .into_iter()
                .max_by(|a, b| {
                    let la = crate::kernel::length_planar(a);
                    let lb = crate::kernel::length_planar(b);
                    la.partial_cmp(&lb)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(b.0.len().cmp(&a.0.len()))
                })
                .expect("Merged::Multiple is non-empty"),
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Merged::Single(_))
    }
}

/// Join endpoints of `parts` into maximal LineString(s).
///
/// Endpoints within `join_eps` degrees of each other are considered shared.
/// Joining is deterministic: parts are consumed in input order and each run
/// is grown greedily head and tail.
pub fn line_merge(parts: &[LineString<f64>], join_eps: f64) -> GeomResult<Merged> {
    if parts.is_empty() {
        return Err(GeomError::EmptyCollection);
    }

    let close = |a: Coord<f64>, b: Coord<f64>| {
        (a.x - b.x).abs() <= join_eps && (a.y - b.y).abs() <= join_eps
    };

    let mut remaining: Vec<LineString<f64>> = parts.to_vec();
    let mut runs: Vec<LineString<f64>> = Vec::new();

    while !remaining.is_empty() {
        // Seed a run with the first unconsumed part, then grow both ends
        // until no part attaches.
        let mut run: Vec<Coord<f64>> = remaining.remove(0).0;
        let mut grew = true;
        while grew {
            grew = false;
            let head = run[0];
            let tail = *run.last().expect("run is non-empty");

            let mut attach: Option<(usize, bool, bool)> = None; // (idx, at_tail, needs_reverse)
            for (idx, part) in remaining.iter().enumerate() {
                let s = part.0[0];
                let e = *part.0.last().expect("parts are validated non-empty");
                if close(tail, s) {
                    attach = Some((idx, true, false));
                } else if close(tail, e) {
                    attach = Some((idx, true, true));
                } else if close(head, e) {
                    attach = Some((idx, false, false));
                } else if close(head, s) {
                    attach = Some((idx, false, true));
                }
                if attach.is_some() {
                    break;
                }
            }

            if let Some((idx, at_tail, needs_reverse)) = attach {
                let mut part = remaining.remove(idx).0;
                if needs_reverse {
                    part.reverse();
                }
                if at_tail {
                    for c in part {
                        push_coord(&mut run, c);
                    }
                } else {
                    let mut joined = part;
                    for c in run.drain(..) {
                        push_coord(&mut joined, c);
                    }
                    run = joined;
                }
                grew = true;
            }
        }
        runs.push(LineString::new(run));
    }

    if runs.len() == 1 {
        Ok(Merged::Single(runs.pop().expect("one run")))
    } else {
        Ok(Merged::Multiple(MultiLineString::new(runs)))
    }
}
