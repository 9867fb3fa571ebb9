//! Per-position cache entries.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::snapshot::PositionSnapshot;
use crate::combiner::CombinedSector;
use crate::data::{AirspaceRef, PositionKey};
use crate::feature::{CombinedFeature, SectorFeature, SectorProperties, SECTOR_TYPE};
use crate::geometry::{envelope, AltitudeRange};
use crate::roster::{Controller, RosterFingerprint};
use crate::splitter::Fragment;

/// Where a position is in its recompute cycle.
///
/// `Stale -> SectorsComputed -> CombinedComputed -> Clean`. Positions skip
/// `CombinedComputed` when combining is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheState {
    #[default]
    Stale,
    SectorsComputed,
    CombinedComputed,
    Clean,
}

/// Cached output of one active position.
#[derive(Debug, Clone)]
pub(crate) struct PositionState {
    pub key: PositionKey,
    pub controllers: Vec<Controller>,
    pub roster: RosterFingerprint,
    pub airspaces: Vec<AirspaceRef>,
    pub airspace_keys: String,
    /// Airports whose runway selection filters this position's sectors.
    pub runway_airports: BTreeSet<String>,
    pub colour: String,
    pub sectors: Option<Arc<Vec<SectorFeature>>>,
    pub combined: Option<Arc<Vec<CombinedFeature>>>,
    pub state: CacheState,
    /// Generation of the last pass that changed this entry.
    pub last_updated: u64,
}

impl PositionState {
    pub fn new(
        key: PositionKey,
        controllers: Vec<Controller>,
        airspaces: Vec<AirspaceRef>,
        airspace_keys: String,
        colour: String,
        generation: u64,
    ) -> Self {
        Self {
            key,
            roster: RosterFingerprint::of(&controllers),
            controllers,
            airspaces,
            airspace_keys,
            runway_airports: BTreeSet::new(),
            colour,
            sectors: None,
            combined: None,
            state: CacheState::Stale,
            last_updated: generation,
        }
    }

    /// Drop cached geometry so the next pass recomputes it.
    pub fn invalidate(&mut self) {
        self.sectors = None;
        self.combined = None;
        self.state = CacheState::Stale;
    }

    /// Refresh roster-derived metadata without touching geometry.
    ///
    /// Returns whether the position's output changed.
    pub fn refresh(&mut self, controllers: Vec<Controller>, colour: String) -> bool {
        let roster = RosterFingerprint::of(&controllers);
        if roster == self.roster && colour == self.colour {
            return false;
        }
        self.roster = roster;
        self.controllers = controllers;
        self.colour = colour;
        self.retag_features();
        true
    }

    /// Rewrite `atc` and `colour` on every cached feature.
    ///
    /// Shared feature lists are copied only when a feature actually changes.
    pub fn retag_features(&mut self) -> bool {
        let mut changed = false;
        if let Some(sectors) = self.sectors.as_mut() {
            if sectors.iter().any(|f| outdated(&f.properties, &self.controllers, &self.colour)) {
                for feature in Arc::make_mut(sectors) {
                    changed |= feature.properties.retag(&self.controllers, &self.colour);
                }
            }
        }
        if let Some(combined) = self.combined.as_mut() {
            if combined.iter().any(|f| outdated(&f.properties, &self.controllers, &self.colour)) {
                for feature in Arc::make_mut(combined) {
                    changed |= feature.properties.retag(&self.controllers, &self.colour);
                }
            }
        }
        changed
    }

    /// Store split output.
    pub fn set_sectors(&mut self, fragments: Vec<Fragment>) {
        let features = fragments
            .into_iter()
            .map(|fragment| SectorFeature {
                properties: self.properties(&fragment.ranges),
                geometry: fragment.polygon,
            })
            .collect();
        self.sectors = Some(Arc::new(features));
        self.combined = None;
        self.state = CacheState::SectorsComputed;
    }

    /// Store combiner output.
    pub fn set_combined(&mut self, combined: Vec<CombinedSector>) {
        let features = combined
            .into_iter()
            .map(|sector| CombinedFeature {
                properties: self.properties(&sector.ranges),
                geometry: sector.geometry,
            })
            .collect();
        self.combined = Some(Arc::new(features));
        self.state = CacheState::CombinedComputed;
    }

    /// Finish the cycle once everything requested is present.
    pub fn settle(&mut self, combine: bool) {
        let done = match self.state {
            CacheState::SectorsComputed => !combine,
            CacheState::CombinedComputed => true,
            CacheState::Stale | CacheState::Clean => false,
        };
        if done {
            self.state = CacheState::Clean;
        }
    }

    /// Cached fragments as splitter fragments, for a combine-only job.
    pub fn fragments(&self) -> Option<Vec<Fragment>> {
        self.sectors.as_ref().map(|sectors| {
            sectors
                .iter()
                .map(|feature| Fragment {
                    polygon: feature.geometry.clone(),
                    ranges: feature.properties.altitude_ranges.clone(),
                })
                .collect()
        })
    }

    pub fn to_snapshot(&self) -> PositionSnapshot {
        PositionSnapshot {
            key: self.key.clone(),
            controllers: self.controllers.clone(),
            airspace_keys: self.airspace_keys.clone(),
            colour: self.colour.clone(),
            state: self.state,
            sectors: self.sectors.clone(),
            sectors_combined: self.combined.clone(),
            last_updated: self.last_updated,
        }
    }

    fn properties(&self, ranges: &[AltitudeRange]) -> SectorProperties {
        let (min, max) = envelope(ranges).unwrap_or_default();
        SectorProperties {
            min,
            max,
            country_group_id: self.key.country_group_id.clone(),
            position_id: self.key.position_id.clone(),
            atc: self.controllers.clone(),
            colour: self.colour.clone(),
            kind: SECTOR_TYPE.to_string(),
            altitude_ranges: ranges.to_vec(),
        }
    }
}

fn outdated(properties: &SectorProperties, atc: &[Controller], colour: &str) -> bool {
    properties.atc.as_slice() != atc || properties.colour != colour
}
