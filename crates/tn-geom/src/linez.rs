//! `LineZ` — a 2D LineString with an optional elevation profile.
//!
//! Source trails may arrive with per-vertex elevations.  The Z values ride
//! alongside the planar line (one value per coordinate) so the conditioning
//! layer can re-derive gain/loss, and are dropped the moment geometry enters
//! the topology layer — edges are strictly planar.

use geo::LineString;

use crate::error::{GeomError, GeomResult};
use crate::kernel;

/// A 2D line plus an optional per-vertex elevation profile in metres.
#[derive(Clone, Debug, PartialEq)]
pub struct LineZ {
    pub line: LineString<f64>,
    pub z: Option<Vec<f64>>,
}

impl LineZ {
    /// Wrap a 2D line with no elevation profile.
    pub fn new_2d(line: LineString<f64>) -> Self {
        Self { line, z: None }
    }

    /// Wrap a line with a per-vertex elevation profile.
    ///
    /// The profile must have exactly one value per coordinate.
    pub fn new_3d(line: LineString<f64>, z: Vec<f64>) -> GeomResult<Self> {
        if z.len() != line.0.len() {
            return Err(GeomError::MismatchedProfile { coords: line.0.len(), z: z.len() });
        }
        Ok(Self { line, z: Some(z) })
    }

    #[inline]
    pub fn has_z(&self) -> bool {
        self.z.is_some()
    }

    /// The planar line with any Z profile stripped.  The (x, y) sequence is
    /// identical to the stored line.
    pub fn force_2d(&self) -> LineString<f64> {
        self.line.clone()
    }

    /// Reverse vertex order, keeping the Z profile aligned.
    pub fn reverse(&self) -> Self {
        Self {
            line: kernel::reverse(&self.line),
            z: self.z.as_ref().map(|z| {
                let mut z = z.clone();
                z.reverse();
                z
            }),
        }
    }

    /// Total (gain, loss) in metres from the elevation profile, or `None`
    /// when no profile is attached.
    pub fn elevation_stats(&self) -> Option<(f64, f64)> {
        let z = self.z.as_ref()?;
        let mut gain = 0.0;
        let mut loss = 0.0;
        for pair in z.windows(2) {
            let d = pair[1] - pair[0];
            if d > 0.0 {
                gain += d;
            } else {
                loss -= d;
            }
        }
        Some((gain, loss))
    }
}

impl From<LineString<f64>> for LineZ {
    fn from(line: LineString<f64>) -> Self {
        Self::new_2d(line)
    }
}
