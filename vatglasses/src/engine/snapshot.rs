//! Immutable pass results.
//!
//! Each pass produces a fresh [`EngineSnapshot`]. Geometry is shared with the
//! engine's cache through `Arc`, so publishing a snapshot never copies
//! polygons; the engine copies on write when it later retags them.
//!
//! Renderers diff [`PositionSnapshot::last_updated`] against the previous
//! snapshot to decide what to redraw.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::CacheState;
use crate::data::PositionKey;
use crate::feature::{combined_to_geojson, sector_to_geojson, CombinedFeature, SectorFeature};
use crate::roster::Controller;
use crate::runway::RunwayState;

/// Output for one active position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSnapshot {
    #[serde(flatten)]
    pub key: PositionKey,
    pub controllers: Vec<Controller>,
    pub airspace_keys: String,
    pub colour: String,
    pub state: CacheState,
    /// `None` while the position is being recomputed.
    pub sectors: Option<Arc<Vec<SectorFeature>>>,
    pub sectors_combined: Option<Arc<Vec<CombinedFeature>>>,
    /// Generation that last changed this position.
    pub last_updated: u64,
}

/// A controller rendered without sectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackEntry {
    pub controller: Controller,
    /// The position the controller matched, when that position owns no airspace.
    pub matched: Option<PositionKey>,
}

/// Everything one pass produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub generation: u64,
    pub data_version: String,
    pub computed_at: DateTime<Utc>,
    /// Active positions ordered by key.
    pub positions: Vec<PositionSnapshot>,
    pub fallback: Vec<FallbackEntry>,
    pub runways: Vec<RunwayState>,
    /// Positions whose geometry was recomputed by this pass.
    #[serde(default)]
    pub recomputed: Vec<PositionKey>,
}

impl EngineSnapshot {
    /// Snapshot before any pass has run.
    pub fn empty(data_version: impl Into<String>) -> Self {
        Self {
            generation: 0,
            data_version: data_version.into(),
            computed_at: Utc::now(),
            positions: Vec::new(),
            fallback: Vec::new(),
            runways: Vec::new(),
            recomputed: Vec::new(),
        }
    }

    pub fn position(&self, key: &PositionKey) -> Option<&PositionSnapshot> {
        self.positions
            .binary_search_by(|p| p.key.cmp(key))
            .ok()
            .map(|i| &self.positions[i])
    }

    /// Number of controllers across positions and fallback.
    pub fn controller_count(&self) -> usize {
        self.positions.iter().map(|p| p.controllers.len()).sum::<usize>() + self.fallback.len()
    }

    /// Active runway of `icao` when this snapshot was taken.
    pub fn active_runway(&self, icao: &str) -> Option<&str> {
        self.runways
            .iter()
            .find(|r| r.icao.eq_ignore_ascii_case(icao))
            .map(|r| r.active.as_str())
    }

    /// GeoJSON `FeatureCollection` of every position's sectors.
    ///
    /// With `combined`, positions that have combined output contribute it
    /// instead of their raw fragments.
    pub fn to_feature_collection(&self, combined: bool) -> serde_json::Value {
        let mut features = Vec::new();
        for position in &self.positions {
            match (&position.sectors_combined, &position.sectors) {
                (Some(merged), _) if combined => features.extend(merged.iter().map(combined_to_geojson)),
                (_, Some(sectors)) => features.extend(sectors.iter().map(sector_to_geojson)),
                _ => {}
            }
        }
        serde_json::json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}
