//! CSV trail loader.
//!
//! # CSV format
//!
//! One row per trail.  `wkt` is a 2D `LINESTRING`; `z` is an optional
//! `;`-separated elevation profile with one value per coordinate.
//!
//! ```csv
//! uuid,name,wkt,length_km,elevation_gain,elevation_loss,z
//! a1,Marshall Valley,"LINESTRING(-105.3 40.0, -105.29 40.01)",,120,80,
//! a2,Bear Peak,"LINESTRING(-105.28 40.0, -105.27 40.02)",2.4,300,10,1700;2050
//! ```
//!
//! | Column            | Blank means                                        |
//! |-------------------|----------------------------------------------------|
//! | `length_km`       | derive from geometry                               |
//! | `elevation_gain`  | derive from `z` when present, else 0               |
//! | `elevation_loss`  | derive from `z` when present, else 0               |
//! | `z`               | no elevation profile                               |
//!
//! Rows that fail geometry validation are rejected with their row number;
//! the loader returns trails only, insertion into a [`TrailStore`] is the
//! caller's step (so a caller can filter or augment first).

use std::io::Read;
use std::path::Path;

use geo::LineString;
use serde::Deserialize;
use wkt::TryFromWkt;

use tn_core::TrailId;
use tn_geom::{kernel, LineZ};

use crate::error::{StoreError, StoreResult};
use crate::trail::Trail;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TrailRecord {
    uuid: String,
    name: String,
    wkt: String,
    length_km: Option<f64>,
    elevation_gain: Option<f64>,
    elevation_loss: Option<f64>,
    #[serde(default)]
    z: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load trails from a CSV file.
pub fn load_trails_csv(path: &Path) -> StoreResult<Vec<Trail>> {
    let file = std::fs::File::open(path).map_err(StoreError::Io)?;
    load_trails_reader(file)
}

/// Like [`load_trails_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from network
/// streams.
pub fn load_trails_reader<R: Read>(reader: R) -> StoreResult<Vec<Trail>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut trails = Vec::new();

    for (i, result) in csv_reader.deserialize::<TrailRecord>().enumerate() {
        let row = i + 2; // header is row 1
        let record = result.map_err(|e| StoreError::Parse { row, message: e.to_string() })?;
        trails.push(trail_from_record(record, row)?);
    }
    Ok(trails)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn trail_from_record(record: TrailRecord, row: usize) -> StoreResult<Trail> {
    let line = LineString::<f64>::try_from_wkt_str(&record.wkt)
        .map_err(|e| StoreError::Parse { row, message: format!("bad WKT: {e}") })?;

    let id = TrailId::new(record.uuid);
    kernel::ensure_valid(&line)
        .map_err(|source| StoreError::InvalidGeometry { id: id.clone(), source })?;

    let geom = match record.z.as_deref().filter(|s| !s.trim().is_empty()) {
        None => LineZ::new_2d(line),
        Some(profile) => {
            let z = parse_profile(profile, row)?;
            LineZ::new_3d(line, z)
                .map_err(|source| StoreError::InvalidGeometry { id: id.clone(), source })?
        }
    };

    let mut trail = Trail::new(id, record.name, geom);
    if let Some(km) = record.length_km {
        trail.length_km = km;
    }
    if let Some(gain) = record.elevation_gain {
        trail.elevation_gain = gain;
    }
    if let Some(loss) = record.elevation_loss {
        trail.elevation_loss = loss;
    }
    Ok(trail)
}

fn parse_profile(s: &str, row: usize) -> StoreResult<Vec<f64>> {
    s.split(';')
        .map(|v| {
            v.trim().parse::<f64>().map_err(|_| StoreError::Parse {
                row,
                message: format!("invalid elevation value {v:?} in z profile"),
            })
        })
        .collect()
}
