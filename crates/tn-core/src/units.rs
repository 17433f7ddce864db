//! Degree ↔ metre conversions.
//!
//! All tolerances in [`NetworkConfig`](crate::NetworkConfig) are expressed in
//! metres, while geometry coordinates are EPSG:4326 degrees.  Conversions use
//! a single locked constant so that a tolerance converted to degrees and a
//! planar degree distance converted to metres always agree.  Edge lengths
//! (`length_km`) are the one place the haversine formula is used instead —
//! never for tolerance comparisons.

/// Metres per degree of latitude (and of longitude at the equator).
///
/// The mid-latitude error of treating longitude degrees as this long is
/// acceptable for trail-scale tolerances (≤ a few hundred metres).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Convert a metre tolerance to coordinate degrees.
#[inline]
pub fn meters_to_degrees(m: f64) -> f64 {
    m / METERS_PER_DEGREE
}

/// Convert a planar degree distance to metres.
#[inline]
pub fn degrees_to_meters(deg: f64) -> f64 {
    deg * METERS_PER_DEGREE
}

/// Convert metres to kilometres.
#[inline]
pub fn meters_to_km(m: f64) -> f64 {
    m / 1_000.0
}

/// Convert kilometres to metres.
#[inline]
pub fn km_to_meters(km: f64) -> f64 {
    km * 1_000.0
}
