//! Polyline representation for route geometries.
//!
//! The solver returns route geometry in the compact encoded-polyline format.
//! Decoding happens once at the boundary; the manager only handles decoded
//! [`Polyline`]s.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::location::Location;

/// Coordinate precision used by the solving API (five decimal places).
pub const DEFAULT_PRECISION: u32 = 5;

/// A route geometry as decoded map coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Location>,
}

impl Polyline {
    pub fn new(points: Vec<Location>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline with the default precision.
    pub fn decode(encoded: &str) -> Result<Self, PolylineError> {
        decode(encoded, DEFAULT_PRECISION).map(Self::new)
    }

    pub fn encode(&self) -> String {
        encode(&self.points, DEFAULT_PRECISION)
    }

    pub fn points(&self) -> &[Location] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Location> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolylineError {
    /// A byte outside the encoding alphabet.
    InvalidCharacter { position: usize },
    /// The input ended in the middle of a value or between latitude and longitude.
    Truncated,
    /// A value, or the coordinate it accumulates into, does not fit in 64 bits.
    Overflow { position: usize },
}

impl fmt::Display for PolylineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolylineError::InvalidCharacter { position } => {
                write!(f, "invalid character at byte {}", position)
            }
            PolylineError::Truncated => f.write_str("encoded polyline is truncated"),
            PolylineError::Overflow { position } => {
                write!(f, "value starting at byte {} overflows", position)
            }
        }
    }
}

impl std::error::Error for PolylineError {}

/// Decodes an encoded polyline into locations.
///
/// The wire order is latitude first; the returned points are regular
/// [`Location`]s.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Location>, PolylineError> {
    let factor = 10_f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while index < bytes.len() {
        lat = accumulate(lat, bytes, &mut index)?;
        if index >= bytes.len() {
            return Err(PolylineError::Truncated);
        }
        lon = accumulate(lon, bytes, &mut index)?;
        points.push(Location::new(lon as f64 / factor, lat as f64 / factor));
    }

    Ok(points)
}

/// Encodes locations as a polyline string.
pub fn encode(points: &[Location], precision: u32) -> String {
    let factor = 10_f64.powi(precision as i32);
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;

    for point in points {
        let lat = (point.lat * factor).round() as i64;
        let lon = (point.lon * factor).round() as i64;
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lon - prev_lon);
        prev_lat = lat;
        prev_lon = lon;
    }

    out
}

/// Adds the next delta to a running coordinate.
fn accumulate(current: i64, bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let position = *index;
    let delta = next_value(bytes, index)?;
    current
        .checked_add(delta)
        .ok_or(PolylineError::Overflow { position })
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let start = *index;
    let mut result: u64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Truncated);
        };
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter { position: *index });
        }
        if shift > 60 {
            return Err(PolylineError::Overflow { position: start });
        }
        *index += 1;

        let chunk = u64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    let value = (result >> 1) as i64;
    Ok(if result & 1 == 1 { !value } else { value })
}

fn push_value(out: &mut String, value: i64) {
    let mut v = (if value < 0 { !(value << 1) } else { value << 1 }) as u64;
    while v >= 0x20 {
        out.push(char::from((0x20 | (v & 0x1f)) as u8 + 63));
        v >>= 5;
    }
    out.push(char::from(v as u8 + 63));
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference example from the encoded polyline format documentation.
    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn reference_points() -> Vec<Location> {
        vec![
            Location::new(-120.2, 38.5),
            Location::new(-120.95, 40.7),
            Location::new(-126.453, 43.252),
        ]
    }

    #[test]
    fn test_decode_reference() {
        let polyline = Polyline::decode(REFERENCE).unwrap();
        assert_eq!(polyline.points(), &reference_points()[..]);
    }

    #[test]
    fn test_encode_reference() {
        let polyline = Polyline::new(reference_points());
        assert_eq!(polyline.encode(), REFERENCE);
    }

    #[test]
    fn test_empty_polyline() {
        let polyline = Polyline::decode("").unwrap();
        assert!(polyline.is_empty());
    }

    #[test]
    fn test_truncated_input() {
        // Latitude only.
        assert_eq!(decode("_p~iF", 5), Err(PolylineError::Truncated));
        // Continuation chunk with nothing after it.
        assert_eq!(decode("_p~iF~", 5), Err(PolylineError::Truncated));
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(
            decode("_p~iF ps|U", 5),
            Err(PolylineError::InvalidCharacter { position: 5 })
        );
    }

    #[test]
    fn test_accumulated_overflow() {
        // Two points each moving latitude by 2^62 push the running sum past i64.
        let mut encoded = String::new();
        for _ in 0..2 {
            push_value(&mut encoded, 1 << 62);
            push_value(&mut encoded, 0);
        }

        // 13 bytes for the large delta, 1 byte for the zero.
        assert_eq!(
            decode(&encoded, 5),
            Err(PolylineError::Overflow { position: 14 })
        );
        assert!(Polyline::decode(&encoded).is_err());
    }

    #[test]
    fn test_into_points() {
        let points = vec![Location::new(2.35, 48.85)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.into_points(), points);
    }
}
