//! Static airspace configuration.
//!
//! A [`CountryGroup`] bundles the Positions, Airspaces and airport runway
//! definitions of one region. Each group is loaded from its own JSON document
//! and can be reloaded independently; the [`DataStore`] holds every loaded group
//! in config order together with a data-version token.
//!
//! # Example
//!
//! ```
//! use vatglasses::data::DataStore;
//!
//! let doc = r#"{
//!     "positions": { "CTR": { "pre": ["EDMM"], "type": "CTR" } },
//!     "airspace": [ { "owner": ["CTR"], "sectors": [
//!         { "min": 100, "max": 245, "points": [[48.0, 11.0], [48.0, 12.0], [49.0, 12.0]] }
//!     ] } ]
//! }"#;
//!
//! let store = DataStore::from_documents([("ed", doc)]).unwrap();
//! assert_eq!(store.groups().len(), 1);
//! assert!(store.position("ed", "CTR").is_some());
//! ```

mod coords;
mod loader;

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

pub use coords::{parse_dms, CoordParseError, LatLon, MAX_LAT, MAX_LON};
pub use loader::{DataError, DataStore};

/// Upper flight level meaning "unbounded".
pub const UNBOUNDED_LEVEL: u32 = 999;

/// Identifies a Position inside a CountryGroup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionKey {
    /// CountryGroup identifier.
    pub country_group_id: String,
    /// Position identifier within the group.
    pub position_id: String,
}

impl PositionKey {
    /// Create a key from group and position identifiers.
    pub fn new(group: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            country_group_id: group.into(),
            position_id: position.into(),
        }
    }

    /// Parse an owner / co-position reference.
    ///
    /// `"group/position"` refers to another group; a bare `"position"` refers
    /// to `current_group`.
    pub fn from_reference(current_group: &str, reference: &str) -> Self {
        match reference.split_once('/') {
            Some((group, position)) => Self::new(group, position),
            None => Self::new(current_group, reference),
        }
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.country_group_id, self.position_id)
    }
}

/// Identifies an Airspace by group and index in that group's airspace list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AirspaceRef {
    /// CountryGroup identifier.
    pub group: String,
    /// Index into the group's airspace list.
    pub index: usize,
}

impl AirspaceRef {
    pub fn new(group: impl Into<String>, index: usize) -> Self {
        Self {
            group: group.into(),
            index,
        }
    }
}

impl fmt::Display for AirspaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.index)
    }
}

/// A colour rule attached to a Position.
///
/// A rule with a non-empty `online` list only applies while every listed
/// co-position is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColourRule {
    /// Colour as a `#rrggbb` string.
    pub hex: String,
    /// Co-positions that must be online for this rule to apply.
    #[serde(default)]
    pub online: Vec<String>,
}

/// An abstract controller role with its callsign matching rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Identifier within the CountryGroup (the key in the `positions` object).
    #[serde(skip)]
    pub id: String,
    /// Accepted callsign prefixes, in priority order.
    #[serde(default)]
    pub pre: Vec<String>,
    /// Required callsign suffix (e.g. `CTR`, `APP`).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Required frequency, if the position is frequency-bound.
    #[serde(default)]
    pub frequency: Option<String>,
    /// Radio callsign used for display only.
    #[serde(default)]
    pub callsign: Option<String>,
    /// Colour rules, first applicable wins.
    #[serde(default)]
    pub colours: Vec<ColourRule>,
}

/// Runway identifiers required by a condition: one or any of several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunwaySet {
    One(String),
    Many(Vec<String>),
}

impl RunwaySet {
    /// Whether `runway` satisfies this set.
    pub fn contains(&self, runway: &str) -> bool {
        match self {
            RunwaySet::One(r) => r == runway,
            RunwaySet::Many(rs) => rs.iter().any(|r| r == runway),
        }
    }

    /// Iterate the runway identifiers in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            RunwaySet::One(r) => std::slice::from_ref(r),
            RunwaySet::Many(rs) => rs.as_slice(),
        };
        slice.iter().map(String::as_str)
    }
}

/// A runway condition on a sector: the airport's active runway must be in `runway`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayCondition {
    /// Airport ICAO code.
    pub icao: String,
    /// Accepted active runway(s).
    pub runway: RunwaySet,
}

fn default_max_level() -> u32 {
    UNBOUNDED_LEVEL
}

/// One polygon with an altitude band and optional runway dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Floor as a flight level.
    #[serde(default)]
    pub min: u32,
    /// Ceiling as a flight level, 999 meaning unbounded.
    #[serde(default = "default_max_level")]
    pub max: u32,
    /// Boundary points in order; the ring is closed automatically.
    pub points: Vec<LatLon>,
    /// Every condition must hold for the sector to be active.
    #[serde(default)]
    pub runways: Vec<RunwayCondition>,
}

impl Sector {
    /// Whether the sector carries any runway conditions.
    pub fn is_runway_conditional(&self) -> bool {
        !self.runways.is_empty()
    }
}

/// An ownable collection of sectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airspace {
    /// Optional label carried into logs.
    #[serde(default)]
    pub id: Option<String>,
    /// Optional grouping label.
    #[serde(default)]
    pub group: Option<String>,
    /// Ordered owner references: `positionId` or `countryGroupId/positionId`.
    #[serde(default)]
    pub owner: Vec<String>,
    /// Sectors in declaration order.
    #[serde(default)]
    pub sectors: Vec<Sector>,
}

/// Runway definition for one airport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirportDefinition {
    /// Runway identifiers in preference order; the first is the default.
    #[serde(default)]
    pub runways: Vec<String>,
    /// Radio callsign used for display only.
    #[serde(default)]
    pub callsign: Option<String>,
}

/// A named bundle of Positions, Airspaces and airports.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryGroup {
    /// Group identifier (the document's file stem).
    pub id: String,
    /// Positions in declaration order.
    pub positions: Vec<Position>,
    /// Airspaces; their index is their identity.
    pub airspace: Vec<Airspace>,
    /// Airport runway definitions keyed by ICAO.
    pub airports: BTreeMap<String, AirportDefinition>,
}

impl CountryGroup {
    /// Look up a position by identifier.
    pub fn position(&self, id: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == id)
    }
}

/// Raw on-disk document for one CountryGroup.
#[derive(Debug, Deserialize)]
pub(crate) struct CountryGroupDocument {
    #[serde(default)]
    airspace: Vec<Airspace>,
    #[serde(default, deserialize_with = "ordered_positions")]
    positions: Vec<Position>,
    #[serde(default)]
    airports: BTreeMap<String, AirportDefinition>,
}

impl CountryGroupDocument {
    pub(crate) fn into_group(self, id: &str) -> CountryGroup {
        CountryGroup {
            id: id.to_string(),
            positions: self.positions,
            airspace: self.airspace,
            airports: self.airports,
        }
    }
}

/// Deserialize the `positions` object keeping its key order.
fn ordered_positions<'de, D>(deserializer: D) -> Result<Vec<Position>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PositionsVisitor;

    impl<'de> Visitor<'de> for PositionsVisitor {
        type Value = Vec<Position>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of positions keyed by identifier")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut positions = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((id, mut position)) = map.next_entry::<String, Position>()? {
                position.id = id;
                positions.push(position);
            }
            Ok(positions)
        }
    }

    deserializer.deserialize_map(PositionsVisitor)
}
