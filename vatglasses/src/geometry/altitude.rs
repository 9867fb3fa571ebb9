//! Altitude bands attached to sector fragments.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::UNBOUNDED_LEVEL;

/// A vertical band `[min, max]` in flight levels.
///
/// Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct AltitudeRange {
    pub min: u32,
    pub max: u32,
}

impl AltitudeRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Range for a sector's published `min`/`max`.
    ///
    /// A ceiling that is not a multiple of 5 is raised by one so that bands
    /// published as `..314` and `315..` meet. The unbounded ceiling is kept.
    pub fn from_sector(min: u32, max: u32) -> Self {
        let offset = if max % 5 == 0 || max == UNBOUNDED_LEVEL { 0 } else { 1 };
        Self {
            min,
            max: max + offset,
        }
    }

    /// Whether two ranges overlap or touch.
    pub fn meets(&self, other: &AltitudeRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

impl From<[u32; 2]> for AltitudeRange {
    fn from([min, max]: [u32; 2]) -> Self {
        Self { min, max }
    }
}

impl From<AltitudeRange> for [u32; 2] {
    fn from(range: AltitudeRange) -> Self {
        [range.min, range.max]
    }
}

impl fmt::Display for AltitudeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FL{:03}-FL{:03}", self.min, self.max)
    }
}

/// Sort, dedupe and coalesce overlapping or touching ranges.
pub fn merge_ranges(ranges: impl IntoIterator<Item = AltitudeRange>) -> Vec<AltitudeRange> {
    let mut sorted: Vec<AltitudeRange> = ranges.into_iter().collect();
    sorted.sort();

    let mut merged: Vec<AltitudeRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(last) if last.meets(&range) => last.max = last.max.max(range.max),
            _ => merged.push(range),
        }
    }
    merged
}

/// Stable grouping key for a merged range list, e.g. `[[100,250]]`.
pub fn ranges_key(ranges: &[AltitudeRange]) -> String {
    let parts: Vec<String> = ranges.iter().map(|r| format!("[{},{}]", r.min, r.max)).collect();
    format!("[{}]", parts.join(","))
}

/// Lowest floor and highest ceiling across `ranges`.
pub fn envelope(ranges: &[AltitudeRange]) -> Option<(u32, u32)> {
    let min = ranges.iter().map(|r| r.min).min()?;
    let max = ranges.iter().map(|r| r.max).max()?;
    Some((min, max))
}
