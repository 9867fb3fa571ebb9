//! Active sector collection and colour resolution.
//!
//! For a position's owned airspaces, [`collect_sectors`] keeps every sector
//! whose runway conditions all hold and turns it into a validated polygon.
//! Sectors whose geometry cannot be built are logged and skipped.

use std::collections::{BTreeMap, BTreeSet};

use crate::data::{AirspaceRef, DataStore, Position, PositionKey, Sector};
use crate::feature::{SectorFeature, SectorProperties, SECTOR_TYPE};
use crate::geometry::{sector_polygon, AltitudeRange, Polygon};
use crate::roster::Controller;
use crate::runway::RunwayTracker;

/// A sector selected for the current pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedSector {
    pub polygon: Polygon<f64>,
    /// Published floor.
    pub min: u32,
    /// Published ceiling.
    pub max: u32,
    /// Normalized band used by the splitter.
    pub range: AltitudeRange,
    pub airspace: AirspaceRef,
    /// Index of the sector within its airspace.
    pub sector: usize,
}

impl CollectedSector {
    /// Attach position metadata.
    pub fn to_feature(&self, key: &PositionKey, atc: &[Controller], colour: &str) -> SectorFeature {
        SectorFeature {
            geometry: self.polygon.clone(),
            properties: SectorProperties {
                min: self.min,
                max: self.max,
                country_group_id: key.country_group_id.clone(),
                position_id: key.position_id.clone(),
                atc: atc.to_vec(),
                colour: colour.to_string(),
                kind: SECTOR_TYPE.to_string(),
                altitude_ranges: vec![self.range],
            },
        }
    }
}

fn sectors_of<'a>(data: &'a DataStore, airspaces: &'a [AirspaceRef]) -> impl Iterator<Item = (&'a AirspaceRef, usize, &'a Sector)> {
    airspaces.iter().flat_map(move |r| {
        data.group(&r.group)
            .and_then(|g| g.airspace.get(r.index))
            .into_iter()
            .flat_map(move |airspace| airspace.sectors.iter().enumerate().map(move |(i, s)| (r, i, s)))
    })
}

/// Airports referenced by runway conditions in `airspaces`, with their runways
/// in first-seen order.
pub fn referenced_airports(data: &DataStore, airspaces: &[AirspaceRef]) -> BTreeMap<String, Vec<String>> {
    let mut airports: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (_, _, sector) in sectors_of(data, airspaces) {
        for condition in &sector.runways {
            let runways = airports.entry(condition.icao.to_uppercase()).or_default();
            for runway in condition.runway.iter() {
                if !runways.iter().any(|r| r == runway) {
                    runways.push(runway.to_string());
                }
            }
        }
    }
    airports
}

/// Sectors of `airspaces` that are active under the current runway selection.
pub fn collect_sectors(
    data: &DataStore,
    airspaces: &[AirspaceRef],
    runways: &RunwayTracker,
    precision: u32,
) -> Vec<CollectedSector> {
    let mut collected = Vec::new();

    for (airspace, index, sector) in sectors_of(data, airspaces) {
        if !sector.runways.iter().all(|c| runways.condition_holds(c)) {
            continue;
        }

        match sector_polygon(&sector.points, precision) {
            Ok(polygon) => collected.push(CollectedSector {
                polygon,
                min: sector.min,
                max: sector.max,
                range: AltitudeRange::from_sector(sector.min, sector.max),
                airspace: airspace.clone(),
                sector: index,
            }),
            Err(e) => tracing::warn!(
                airspace = %airspace,
                sector = index,
                error = %e,
                "Skipping invalid sector geometry"
            ),
        }
    }

    collected
}

/// Pick a position's colour.
///
/// First rule whose `online` co-positions are all active, else the first rule
/// without an `online` constraint, else the first rule, else `default`.
pub fn resolve_colour(
    group: &str,
    position: Option<&Position>,
    active: &BTreeSet<PositionKey>,
    default: &str,
) -> String {
    let Some(rules) = position.map(|p| &p.colours) else {
        return default.to_string();
    };

    let online = rules.iter().find(|rule| {
        !rule.online.is_empty()
            && rule
                .online
                .iter()
                .all(|r| active.contains(&PositionKey::from_reference(group, r)))
    });

    online
        .or_else(|| rules.iter().find(|rule| rule.online.is_empty()))
        .or_else(|| rules.first())
        .map(|rule| rule.hex.clone())
        .unwrap_or_else(|| default.to_string())
}
