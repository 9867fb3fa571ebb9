//! Coordinate parsing for sector boundary points.
//!
//! Boundary points arrive either as decimal degrees or as compact
//! degree-minute-second strings:
//!
//! - latitude: `DDMMSS[.s]` (e.g. `"491400"` = 49°14'00")
//! - longitude: `DDDMMSS[.s]` (e.g. `"0083000"` = 8°30'00")
//!
//! A leading `-` or a trailing `S`/`W` hemisphere letter makes the value negative.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum absolute latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Maximum absolute longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors produced while parsing a boundary coordinate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordParseError {
    /// The DMS string is not made of digits in the expected layout.
    #[error("malformed DMS value '{0}'")]
    Malformed(String),

    /// Minutes or seconds are 60 or above.
    #[error("minutes/seconds out of range in '{0}'")]
    OutOfRange(String),

    /// Latitude outside [-90, 90].
    #[error("latitude {0} outside [-90, 90]")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180].
    #[error("longitude {0} outside [-180, 180]")]
    InvalidLongitude(f64),
}

/// A single boundary point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoint", into = "[f64; 2]")]
pub struct LatLon {
    /// Latitude in degrees, north positive.
    pub lat: f64,
    /// Longitude in degrees, east positive.
    pub lon: f64,
}

impl LatLon {
    /// Create a validated point.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordParseError> {
        if !lat.is_finite() || lat.abs() > MAX_LAT {
            return Err(CoordParseError::InvalidLatitude(lat));
        }
        if !lon.is_finite() || lon.abs() > MAX_LON {
            return Err(CoordParseError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }
}

impl From<LatLon> for [f64; 2] {
    fn from(point: LatLon) -> Self {
        [point.lat, point.lon]
    }
}

/// One component of a raw `[lat, lon]` pair as found in the data files.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawComponent {
    Number(f64),
    Text(String),
}

/// Raw `[lat, lon]` pair before validation.
#[derive(Debug, Clone, Deserialize)]
struct RawPoint(RawComponent, RawComponent);

impl TryFrom<RawPoint> for LatLon {
    type Error = CoordParseError;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        let lat = match raw.0 {
            RawComponent::Number(v) => v,
            RawComponent::Text(s) => parse_dms(&s)?,
        };
        let lon = match raw.1 {
            RawComponent::Number(v) => v,
            RawComponent::Text(s) => parse_dms(&s)?,
        };
        LatLon::new(lat, lon)
    }
}

/// Parse a compact DMS string (`DDMMSS`, `DDDMMSS`, optional fraction) into degrees.
///
/// Plain decimal strings containing a `.` before the seconds field (e.g. `"48.1"`)
/// are not DMS; they are accepted as decimal degrees when the integer part has
/// fewer than five digits.
pub fn parse_dms(value: &str) -> Result<f64, CoordParseError> {
    let trimmed = value.trim();
    let malformed = || CoordParseError::Malformed(value.to_string());

    let (body, negative) = split_sign(trimmed);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };

    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    if let Some(frac) = frac_part {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
    }

    let degrees = if int_part.len() < 5 {
        // Decimal degrees written as a string.
        body.parse::<f64>().map_err(|_| malformed())?
    } else {
        let split = int_part.len() - 4;
        let deg: f64 = int_part[..split].parse().map_err(|_| malformed())?;
        let min: f64 = int_part[split..split + 2].parse().map_err(|_| malformed())?;
        let sec_text = match frac_part {
            Some(frac) => format!("{}.{}", &int_part[split + 2..], frac),
            None => int_part[split + 2..].to_string(),
        };
        let sec: f64 = sec_text.parse().map_err(|_| malformed())?;
        if min >= 60.0 || sec >= 60.0 {
            return Err(CoordParseError::OutOfRange(value.to_string()));
        }
        deg + min / 60.0 + sec / 3600.0
    };

    Ok(if negative { -degrees } else { degrees })
}

/// Strip a sign prefix or hemisphere suffix, returning the body and whether it is negative.
fn split_sign(value: &str) -> (&str, bool) {
    if let Some(rest) = value.strip_prefix('-') {
        return (rest, true);
    }
    if let Some(rest) = value.strip_prefix('+') {
        return (rest, false);
    }
    match value.chars().last() {
        Some('S') | Some('s') | Some('W') | Some('w') => (&value[..value.len() - 1], true),
        Some('N') | Some('n') | Some('E') | Some('e') => (&value[..value.len() - 1], false),
        _ => (value, false),
    }
}
