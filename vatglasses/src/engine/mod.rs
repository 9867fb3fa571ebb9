//! Sector engine: incremental update passes over the live roster.
//!
//! [`SectorEngine`] owns every cache the pipeline needs between passes: the
//! per-position geometry, the runway selections and the latest snapshot. A
//! pass runs in two halves so the geometry can be offloaded:
//!
//! ```text
//! prepare(input) ──► PassPlan ──► take_batch() ──► worker ──► apply(plan, result) ──► EngineSnapshot
//!   match, own,                    GeometryBatch                   store, publish
//!   runways, plan
//! ```
//!
//! [`SectorEngine::update`] runs both halves with inline geometry.
//!
//! # Cache rules
//!
//! - A position whose airspace fingerprint is unchanged keeps its geometry.
//!   A roster or colour change only retags the cached features.
//! - A changed fingerprint, a runway change on a referenced airport or a data
//!   reload marks the position stale.
//! - `last_updated` moves only when a position's output actually changes.

mod gate;
mod plan;
mod snapshot;
mod state;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;

pub use gate::{PassGuard, UpdateGate};
pub use plan::{PassInput, PassPlan};
pub use snapshot::{EngineSnapshot, FallbackEntry, PositionSnapshot};
pub use state::CacheState;

use crate::collector::{collect_sectors, referenced_airports, resolve_colour};
use crate::data::{DataStore, PositionKey};
use crate::geometry::DEFAULT_PRECISION;
use crate::matcher::{IgnoredPosition, PositionMatcher};
use crate::ownership::{airspace_keys, resolve_ownership};
use crate::roster::Controller;
use crate::runway::{RunwayError, RunwayState, RunwayTracker};
use crate::splitter::{SplitInput, SplitParams};
use crate::worker::{process_batch, GeometryBatch, GeometryBatchResult, GeometryJob, GeometryTask};
use state::PositionState;

/// Colour used when a position has no colour rules.
pub const DEFAULT_COLOUR: &str = "#808080";

/// Fragments smaller than this (square degrees) are dropped.
pub const DEFAULT_MIN_FRAGMENT_AREA: f64 = 1e-10;

/// Engine tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Also produce combined same-band sectors.
    pub combine_sectors: bool,
    pub default_colour: String,
    /// Decimal places kept when rounding coordinates.
    pub coordinate_precision: u32,
    pub min_fragment_area: f64,
    pub ignored_positions: Vec<IgnoredPosition>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            combine_sectors: true,
            default_colour: DEFAULT_COLOUR.to_string(),
            coordinate_precision: DEFAULT_PRECISION,
            min_fragment_area: DEFAULT_MIN_FRAGMENT_AREA,
            ignored_positions: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn split_params(&self) -> SplitParams {
        SplitParams {
            precision: self.coordinate_precision,
            min_fragment_area: self.min_fragment_area,
        }
    }
}

impl From<&crate::config::EngineSettings> for EngineConfig {
    fn from(settings: &crate::config::EngineSettings) -> Self {
        Self {
            combine_sectors: settings.combine_sectors,
            default_colour: settings.default_colour.clone(),
            coordinate_precision: settings.coordinate_precision,
            min_fragment_area: settings.min_fragment_area,
            ignored_positions: settings.ignored_positions.clone(),
        }
    }
}

/// Incremental sector resolution over one [`DataStore`].
pub struct SectorEngine {
    data: Arc<DataStore>,
    config: EngineConfig,
    matcher: PositionMatcher,
    runways: RunwayTracker,
    positions: BTreeMap<PositionKey, PositionState>,
    generation: u64,
    seed: Option<Arc<EngineSnapshot>>,
    latest: Arc<EngineSnapshot>,
}

impl SectorEngine {
    pub fn new(data: Arc<DataStore>, config: EngineConfig) -> Self {
        let latest = Arc::new(EngineSnapshot::empty(data.version()));
        Self {
            matcher: PositionMatcher::new(config.ignored_positions.clone()),
            data,
            config,
            runways: RunwayTracker::new(),
            positions: BTreeMap::new(),
            generation: 0,
            seed: None,
            latest,
        }
    }

    pub fn data(&self) -> &Arc<DataStore> {
        &self.data
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<EngineSnapshot> {
        Arc::clone(&self.latest)
    }

    pub fn runway_states(&self) -> Vec<RunwayState> {
        self.runways.states()
    }

    /// Run a complete pass with inline geometry.
    pub fn update(&mut self, input: &PassInput) -> Arc<EngineSnapshot> {
        let mut plan = self.prepare(input);
        let result = process_batch(plan.take_batch());
        self.apply(plan, result)
    }

    /// First half of a pass: match, resolve ownership, track runways and
    /// plan the geometry work.
    pub fn prepare(&mut self, input: &PassInput) -> PassPlan {
        self.generation += 1;
        let generation = self.generation;
        let seed = self.seed.take();

        // Controllers by matched position; unmatched go to fallback.
        let mut matched: BTreeMap<PositionKey, Vec<Controller>> = BTreeMap::new();
        let mut fallback = Vec::new();
        for controller in &input.roster {
            match self.matcher.match_controller(&self.data, controller) {
                Some(key) => matched.entry(key).or_default().push(controller.clone()),
                None => fallback.push(FallbackEntry {
                    controller: controller.clone(),
                    matched: None,
                }),
            }
        }

        let active: BTreeSet<PositionKey> = matched.keys().cloned().collect();
        let owned = resolve_ownership(&self.data, &active, &input.overrides);

        // Matched positions that own nothing are rendered without sectors.
        matched.retain(|key, controllers| {
            if owned.contains_key(key) {
                return true;
            }
            fallback.extend(controllers.drain(..).map(|controller| FallbackEntry {
                controller,
                matched: Some(key.clone()),
            }));
            false
        });

        let mut previous = std::mem::take(&mut self.positions);
        let mut batch = GeometryBatch::new(self.config.split_params());
        let mut completed = Vec::new();

        for (key, airspaces) in owned {
            let controllers = matched.remove(&key).unwrap_or_default();
            let colour = resolve_colour(
                &key.country_group_id,
                self.data.position(&key.country_group_id, &key.position_id),
                &active,
                &self.config.default_colour,
            );
            let keys = airspace_keys(&airspaces);

            let airports = referenced_airports(&self.data, &airspaces);
            for (icao, seen) in &airports {
                let preferred = self
                    .data
                    .airport(icao)
                    .map(|a| a.runways.as_slice())
                    .unwrap_or_default();
                self.runways.observe(icao, seen.iter().map(String::as_str), preferred);
            }

            let mut state = match previous.remove(&key) {
                Some(mut state) if state.airspace_keys == keys => {
                    if state.refresh(controllers, colour) {
                        state.last_updated = generation;
                    }
                    state
                }
                previous_state => {
                    if previous_state.is_some() {
                        tracing::debug!(position = %key, airspaces = %keys, "Airspace set changed");
                    }
                    PositionState::new(key.clone(), controllers, airspaces, keys, colour, generation)
                }
            };
            state.runway_airports = airports.into_keys().collect();

            if state.state == CacheState::Stale {
                if let Some(seed) = &seed {
                    self.adopt_seeded(seed, &mut state, generation);
                }
            }

            match state.state {
                CacheState::Stale => {
                    let collected = collect_sectors(
                        &self.data,
                        &state.airspaces,
                        &self.runways,
                        self.config.coordinate_precision,
                    );
                    if collected.is_empty() {
                        state.set_sectors(Vec::new());
                        if self.config.combine_sectors {
                            state.set_combined(Vec::new());
                        }
                        state.settle(self.config.combine_sectors);
                        state.last_updated = generation;
                        completed.push(key.clone());
                    } else {
                        batch.jobs.push(GeometryJob {
                            key: key.clone(),
                            airspace_keys: state.airspace_keys.clone(),
                            task: GeometryTask::Split {
                                inputs: collected
                                    .into_iter()
                                    .map(|sector| SplitInput {
                                        polygon: sector.polygon,
                                        range: sector.range,
                                    })
                                    .collect(),
                                combine: self.config.combine_sectors,
                            },
                        });
                    }
                }
                CacheState::SectorsComputed if self.config.combine_sectors => {
                    if let Some(fragments) = state.fragments() {
                        batch.jobs.push(GeometryJob {
                            key: key.clone(),
                            airspace_keys: state.airspace_keys.clone(),
                            task: GeometryTask::Combine { fragments },
                        });
                    }
                }
                _ => {}
            }

            self.positions.insert(key, state);
        }

        if !previous.is_empty() {
            tracing::debug!(pruned = previous.len(), "Dropped inactive positions");
        }

        tracing::info!(
            generation,
            controllers = input.roster.len(),
            positions = self.positions.len(),
            fallback = fallback.len(),
            jobs = batch.len(),
            "Update pass planned"
        );

        PassPlan {
            generation,
            fallback,
            completed,
            batch,
        }
    }

    /// Second half of a pass: store the geometry and publish a snapshot.
    ///
    /// Outputs for positions that vanished or whose airspace set changed since
    /// the plan was made are discarded.
    pub fn apply(&mut self, plan: PassPlan, result: GeometryBatchResult) -> Arc<EngineSnapshot> {
        let PassPlan {
            generation,
            fallback,
            completed,
            ..
        } = plan;
        let mut recomputed = completed;

        for output in result.outputs {
            let Some(state) = self.positions.get_mut(&output.key) else {
                tracing::debug!(position = %output.key, "Discarding geometry for inactive position");
                continue;
            };
            if state.airspace_keys != output.airspace_keys {
                tracing::debug!(position = %output.key, "Discarding geometry for outdated airspace set");
                continue;
            }

            if let Some(fragments) = output.fragments {
                state.set_sectors(fragments);
            }
            if let Some(combined) = output.combined {
                state.set_combined(combined);
            }
            state.settle(self.config.combine_sectors);
            state.last_updated = generation;
            recomputed.push(output.key);
        }

        let snapshot = Arc::new(EngineSnapshot {
            generation,
            data_version: self.data.version().to_string(),
            computed_at: Utc::now(),
            positions: self.positions.values().map(|s| s.to_snapshot()).collect(),
            fallback,
            runways: self.runways.states(),
            recomputed,
        });

        tracing::debug!(
            generation,
            recomputed = snapshot.recomputed.len(),
            "Snapshot published"
        );
        self.latest = Arc::clone(&snapshot);
        snapshot
    }

    /// Select the active runway of `icao` and invalidate the positions whose
    /// sectors depend on it.
    ///
    /// Airports not yet referenced by an owned sector are tracked from their
    /// airport definition. Returns the invalidated positions; empty when the
    /// selection did not change.
    pub fn set_active_runway(&mut self, icao: &str, runway: &str) -> Result<Vec<PositionKey>, RunwayError> {
        if !self.runways.contains(icao) {
            let definition = self
                .data
                .airport(icao)
                .filter(|a| !a.runways.is_empty())
                .ok_or_else(|| RunwayError::UnknownAirport(icao.to_uppercase()))?;
            self.runways
                .observe(icao, definition.runways.iter().map(String::as_str), &definition.runways);
        }

        if !self.runways.set_active(icao, runway)? {
            return Ok(Vec::new());
        }

        let icao = icao.to_uppercase();
        let mut invalidated = Vec::new();
        for (key, state) in self.positions.iter_mut() {
            if state.runway_airports.contains(&icao) {
                state.invalidate();
                invalidated.push(key.clone());
            }
        }

        tracing::info!(icao = %icao, runway, invalidated = invalidated.len(), "Runway change invalidated positions");
        Ok(invalidated)
    }

    /// Check a runway selection without applying it.
    pub fn validate_runway(&self, icao: &str, runway: &str) -> Result<(), RunwayError> {
        let known = match self.runways.potential(icao) {
            Some(potential) => potential,
            None => self
                .data
                .airport(icao)
                .filter(|a| !a.runways.is_empty())
                .map(|a| a.runways.as_slice())
                .ok_or_else(|| RunwayError::UnknownAirport(icao.to_uppercase()))?,
        };
        if known.iter().any(|r| r == runway) {
            Ok(())
        } else {
            Err(RunwayError::UnknownRunway {
                icao: icao.to_uppercase(),
                runway: runway.to_string(),
            })
        }
    }

    /// Swap in reloaded static data; every cached position becomes stale.
    pub fn reload_data(&mut self, data: Arc<DataStore>) {
        tracing::info!(
            from = %self.data.version(),
            to = %data.version(),
            positions = self.positions.len(),
            "Static data reloaded"
        );
        self.data = data;
        self.seed = None;
        for state in self.positions.values_mut() {
            state.invalidate();
        }
    }

    /// Offer a snapshot computed elsewhere for the next pass.
    ///
    /// Stale positions adopt the seeded geometry when the data version, their
    /// airspace fingerprint and the active runway of every referenced airport
    /// all match; anything else is computed locally.
    pub fn seed_from_snapshot(&mut self, snapshot: Arc<EngineSnapshot>) {
        if snapshot.data_version != self.data.version() {
            tracing::warn!(
                theirs = %snapshot.data_version,
                ours = %self.data.version(),
                "Ignoring snapshot for different data version"
            );
            return;
        }
        tracing::debug!(positions = snapshot.positions.len(), "Snapshot seeded");
        self.seed = Some(snapshot);
    }

    fn adopt_seeded(&self, seed: &EngineSnapshot, state: &mut PositionState, generation: u64) {
        let Some(seeded) = seed.position(&state.key) else {
            return;
        };
        if seeded.airspace_keys != state.airspace_keys || seeded.sectors.is_none() {
            return;
        }
        let runways_match = state
            .runway_airports
            .iter()
            .all(|icao| seed.active_runway(icao) == self.runways.active(icao));
        if !runways_match {
            tracing::debug!(position = %state.key, "Seeded runway selection differs");
            return;
        }

        state.sectors = seeded.sectors.clone();
        state.combined = seeded.sectors_combined.clone();
        state.retag_features();
        state.state = if state.combined.is_some() {
            CacheState::CombinedComputed
        } else {
            CacheState::SectorsComputed
        };
        state.settle(self.config.combine_sectors);
        state.last_updated = generation;
        tracing::debug!(position = %state.key, "Adopted seeded geometry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Facility, OwnershipOverrides};

    const ED: &str = r##"{
        "positions": {
            "ALB": { "pre": ["EDMM"], "type": "CTR", "frequency": "132.555",
                     "colours": [ { "hex": "#111111", "online": ["WLD"] }, { "hex": "#222222" } ] },
            "WLD": { "pre": ["EDMM"], "type": "CTR", "frequency": "133.680" },
            "TWR": { "pre": ["EDDM"], "type": "TWR", "frequency": "118.705" }
        },
        "airspace": [
            { "id": "ALB", "owner": ["ALB", "WLD"], "sectors": [
                { "min": 100, "max": 245, "points": [[48.0, 11.0], [48.0, 12.0], [49.0, 12.0], [49.0, 11.0]] }
            ] },
            { "id": "WLD", "owner": ["WLD", "ALB"], "sectors": [
                { "min": 100, "max": 245, "points": [[48.0, 12.0], [48.0, 13.0], [49.0, 13.0], [49.0, 12.0]] }
            ] },
            { "id": "APP", "owner": ["WLD", "ALB"], "sectors": [
                { "min": 0, "max": 95, "points": [[48.2, 11.5], [48.2, 11.9], [48.5, 11.9], [48.5, 11.5]],
                  "runways": [ { "icao": "EDDM", "runway": "26R" } ] },
                { "min": 0, "max": 95, "points": [[48.2, 11.5], [48.2, 11.7], [48.5, 11.7], [48.5, 11.5]],
                  "runways": [ { "icao": "EDDM", "runway": ["08L", "08R"] } ] }
            ] }
        ],
        "airports": { "EDDM": { "runways": ["26R", "08L"] } }
    }"##;

    fn data() -> Arc<DataStore> {
        DataStore::from_documents([("ed", ED)]).unwrap().into_shared()
    }

    fn alb() -> Controller {
        Controller::new(1, "EDMM_ALB_CTR", "132.555", Facility::Ctr)
    }

    fn wld() -> Controller {
        Controller::new(2, "EDMM_WLD_CTR", "133.680", Facility::Ctr)
    }

    fn key(id: &str) -> PositionKey {
        PositionKey::new("ed", id)
    }

    // =========================================================================
    // Passes
    // =========================================================================

    #[test]
    fn test_single_controller_owns_everything() {
        let mut engine = SectorEngine::new(data(), EngineConfig::default());
        let snapshot = engine.update(&PassInput::new(vec![alb()]));

        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.positions.len(), 1);
        let position = snapshot.position(&key("ALB")).unwrap();
        assert_eq!(position.airspace_keys, "ed:0,ed:1,ed:2");
        assert_eq!(position.state, CacheState::Clean);
        assert_eq!(position.colour, "#222222");
        assert!(!position.sectors.as_ref().unwrap().is_empty());
        assert!(position.sectors_combined.is_some());
        assert_eq!(snapshot.active_runway("EDDM"), Some("26R"));
    }

    #[test]
    fn test_second_controller_splits_ownership() {
        let mut engine = SectorEngine::new(data(), EngineConfig::default());
        engine.update(&PassInput::new(vec![alb()]));
        let snapshot = engine.update(&PassInput::new(vec![alb(), wld()]));

        assert_eq!(snapshot.position(&key("ALB")).unwrap().airspace_keys, "ed:0");
        assert_eq!(snapshot.position(&key("WLD")).unwrap().airspace_keys, "ed:1,ed:2");
        // ALB's colour rule keyed on WLD being online now applies.
        assert_eq!(snapshot.position(&key("ALB")).unwrap().colour, "#111111");
        assert_eq!(snapshot.recomputed.len(), 2);
    }

    #[test]
    fn test_repeat_pass_does_no_work() {
        let mut engine = SectorEngine::new(data(), EngineConfig::default());
        let input = PassInput::new(vec![alb(), wld()]);
        let first = engine.update(&input);

        let plan = engine.prepare(&input);
        assert_eq!(plan.pending_jobs(), 0);
        let second = engine.apply(plan, GeometryBatchResult::default());

        assert!(second.recomputed.is_empty());
        for (a, b) in first.positions.iter().zip(&second.positions) {
            assert_eq!(a.last_updated, b.last_updated);
            assert_eq!(a.sectors, b.sectors);
        }
    }

    #[test]
    fn test_roster_change_only_retags() {
        let mut engine = SectorEngine::new(data(), EngineConfig::default());
        engine.update(&PassInput::new(vec![alb(), wld()]));

        let relief = Controller::new(3, "EDMM_ALB_CTR", "132.555", Facility::Ctr);
        let mut plan = engine.prepare(&PassInput::new(vec![alb(), relief, wld()]));
        assert_eq!(plan.pending_jobs(), 0);
        let batch = plan.take_batch();
        let snapshot = engine.apply(plan, process_batch(batch));

        let alb = snapshot.position(&key("ALB")).unwrap();
        assert_eq!(alb.last_updated, 2);
        assert_eq!(alb.sectors.as_ref().unwrap()[0].properties.atc.len(), 2);
        assert_eq!(snapshot.position(&key("WLD")).unwrap().last_updated, 1);
    }

    #[test]
    fn test_unmatched_and_sectorless_go_to_fallback() {
        let mut engine = SectorEngine::new(data(), EngineConfig::default());
        let tower = Controller::new(4, "EDDM_TWR", "118.705", Facility::Twr);
        let stranger = Controller::new(5, "XXXX_CTR", "199.998", Facility::Ctr);
        let snapshot = engine.update(&PassInput::new(vec![alb(), tower.clone(), stranger.clone()]));

        assert_eq!(snapshot.fallback.len(), 2);
        assert!(snapshot
            .fallback
            .contains(&FallbackEntry { controller: stranger, matched: None }));
        assert!(snapshot.fallback.contains(&FallbackEntry {
            controller: tower,
            matched: Some(key("TWR")),
        }));
        assert_eq!(snapshot.controller_count(), 3);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut engine = SectorEngine::new(data(), EngineConfig::default());
        let mut overrides = OwnershipOverrides::new();
        overrides.insert("ed", 1, vec!["ALB".into()]);
        let snapshot = engine.update(&PassInput::new(vec![alb(), wld()]).with_overrides(overrides));

        assert_eq!(snapshot.position(&key("ALB")).unwrap().airspace_keys, "ed:0,ed:1");
    }

    #[test]
    fn test_empty_roster() {
        let mut engine = SectorEngine::new(data(), EngineConfig::default());
        let snapshot = engine.update(&PassInput::default());
        assert!(snapshot.positions.is_empty());
        assert!(snapshot.fallback.is_empty());
    }

    #[test]
    fn test_without_combine() {
        let config = EngineConfig {
            combine_sectors: false,
            ..EngineConfig::default()
        };
        let mut engine = SectorEngine::new(data(), config);
        let snapshot = engine.update(&PassInput::new(vec![alb()]));
        let position = snapshot.position(&key("ALB")).unwrap();
        assert_eq!(position.state, CacheState::Clean);
        assert!(position.sectors_combined.is_none());
    }

    // =========================================================================
    // Runways, reload, seeding
    // =========================================================================

    #[test]
    fn test_runway_change_invalidates_dependents_only() {
        let mut engine = SectorEngine::new(data(), EngineConfig::default());
        engine.update(&PassInput::new(vec![alb(), wld()]));

        let invalidated = engine.set_active_runway("eddm", "08L").unwrap();
        assert_eq!(invalidated, vec![key("WLD")]);

        let snapshot = engine.update(&PassInput::new(vec![alb(), wld()]));
        assert_eq!(snapshot.recomputed, vec![key("WLD")]);
        assert_eq!(snapshot.position(&key("ALB")).unwrap().last_updated, 1);
        assert_eq!(snapshot.position(&key("WLD")).unwrap().last_updated, 2);
        assert_eq!(snapshot.active_runway("EDDM"), Some("08L"));
    }

    #[test]
    fn test_runway_errors() {
        let mut engine = SectorEngine::new(data(), EngineConfig::default());
        assert_eq!(
            engine.set_active_runway("EGLL", "27L"),
            Err(RunwayError::UnknownAirport("EGLL".into()))
        );
        assert!(matches!(
            engine.validate_runway("EDDM", "99"),
            Err(RunwayError::UnknownRunway { .. })
        ));
        // Untracked but defined airports can be selected before any pass.
        assert!(engine.validate_runway("EDDM", "08L").is_ok());
        assert_eq!(engine.set_active_runway("EDDM", "08L").unwrap(), Vec::<PositionKey>::new());
        assert!(engine.set_active_runway("EDDM", "08L").unwrap().is_empty());
    }

    #[test]
    fn test_reload_invalidates_everything() {
        let mut engine = SectorEngine::new(data(), EngineConfig::default());
        engine.update(&PassInput::new(vec![alb(), wld()]));

        engine.reload_data(data());
        let plan = engine.prepare(&PassInput::new(vec![alb(), wld()]));
        assert_eq!(plan.pending_jobs(), 2);
    }

    #[test]
    fn test_seeded_snapshot_is_adopted() {
        let input = PassInput::new(vec![alb(), wld()]);
        let mut server = SectorEngine::new(data(), EngineConfig::default());
        let published = server.update(&input);

        let mut client = SectorEngine::new(data(), EngineConfig::default());
        client.seed_from_snapshot(published.clone());
        let plan = client.prepare(&input);
        assert_eq!(plan.pending_jobs(), 0);
        let snapshot = client.apply(plan, GeometryBatchResult::default());

        for key in [key("ALB"), key("WLD")] {
            assert_eq!(
                snapshot.position(&key).unwrap().sectors,
                published.position(&key).unwrap().sectors
            );
        }
    }

    #[test]
    fn test_seed_rejected_on_runway_mismatch() {
        let input = PassInput::new(vec![alb(), wld()]);
        let mut server = SectorEngine::new(data(), EngineConfig::default());
        server.update(&input);
        server.set_active_runway("EDDM", "08L").unwrap();
        let published = server.update(&input);

        let mut client = SectorEngine::new(data(), EngineConfig::default());
        client.seed_from_snapshot(published);
        let plan = client.prepare(&input);
        // ALB adopts; WLD depends on EDDM where the client still has 26R.
        assert_eq!(plan.pending_jobs(), 1);
    }

    #[test]
    fn test_seed_rejected_on_data_version() {
        let mut client = SectorEngine::new(data(), EngineConfig::default());
        let mut foreign = EngineSnapshot::empty("something-else");
        foreign.generation = 7;
        client.seed_from_snapshot(Arc::new(foreign));
        assert!(client.seed.is_none());
    }
}
