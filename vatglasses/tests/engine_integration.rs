//! End-to-end tests for the synchronous sector engine.
//!
//! Two country groups are loaded: `ed` with one centre owning two partially
//! overlapping airspaces, and `eh` with an approach position whose sectors
//! depend on the EHAM runway direction.

use std::collections::BTreeSet;
use std::sync::Arc;

use geo::{Area, Centroid, MultiPolygon};
use vatglasses::data::{DataStore, PositionKey};
use vatglasses::engine::{CacheState, EngineConfig, EngineSnapshot, PassInput, SectorEngine};
use vatglasses::geometry::ops;
use vatglasses::roster::{Controller, Facility};
use vatglasses::runway::RunwayError;

const ED: &str = r#"{
    "positions": {
        "CTR": { "pre": ["EDMM"], "type": "CTR" },
        "TWR": { "pre": ["EDDM"], "type": "TWR" }
    },
    "airspace": [
        { "id": "A", "owner": ["CTR"], "sectors": [
            { "min": 100, "max": 200, "points": [[48.0, 11.0], [48.0, 13.0], [49.0, 13.0], [49.0, 11.0]] }
        ] },
        { "id": "B", "owner": ["CTR"], "sectors": [
            { "min": 150, "max": 250, "points": [[48.0, 12.0], [48.0, 14.0], [49.0, 14.0], [49.0, 12.0]] }
        ] }
    ]
}"#;

const EH: &str = r#"{
    "positions": {
        "ARR": { "pre": ["EHAM"], "type": "APP" },
        "CTR": { "pre": ["EHAA"], "type": "CTR" },
        "GND": { "pre": ["EHAM"], "type": "GND" }
    },
    "airspace": [
        { "id": "SCHIPHOL", "owner": ["ARR", "CTR"], "sectors": [
            { "min": 0, "max": 60, "points": [[52.0, 4.0], [52.0, 5.0], [53.0, 5.0], [53.0, 4.0]],
              "runways": [ { "icao": "EHAM", "runway": "09" } ] },
            { "min": 0, "max": 60, "points": [[52.0, 5.0], [52.0, 6.0], [53.0, 6.0], [53.0, 5.0]],
              "runways": [ { "icao": "EHAM", "runway": "27" } ] }
        ] },
        { "id": "AMSTERDAM", "owner": ["CTR"], "sectors": [
            { "min": 60, "max": 245, "points": [[51.0, 3.0], [51.0, 7.0], [54.0, 7.0], [54.0, 3.0]] }
        ] }
    ],
    "airports": { "EHAM": { "runways": ["27", "09"] } }
}"#;

fn data() -> Arc<DataStore> {
    DataStore::from_documents([("ed", ED), ("eh", EH)])
        .unwrap()
        .into_shared()
}

fn roster() -> Vec<Controller> {
    vec![
        Controller::new(1, "EDMM_CTR", "127.950", Facility::Ctr),
        Controller::new(2, "EHAM_APP", "121.200", Facility::App),
        Controller::new(3, "EHAA_CTR", "124.880", Facility::Ctr),
        Controller::new(4, "EHAM_GND", "121.800", Facility::Gnd),
        Controller::new(5, "ZZZZ_CTR", "199.998", Facility::Ctr),
        Controller::new(6, "EDDM_TWR", "118.700", Facility::Twr),
    ]
}

fn key(group: &str, id: &str) -> PositionKey {
    PositionKey::new(group, id)
}

fn engine() -> SectorEngine {
    SectorEngine::new(data(), EngineConfig::default())
}

fn centroid_x(snapshot: &EngineSnapshot, position: &PositionKey) -> Vec<f64> {
    snapshot
        .position(position)
        .and_then(|p| p.sectors.as_ref())
        .map(|sectors| {
            sectors
                .iter()
                .filter_map(|s| s.geometry.centroid())
                .map(|c| c.x())
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Splitting
// =============================================================================

#[test]
fn test_overlapping_airspaces_split_into_three_fragments() {
    let mut engine = engine();
    let snapshot = engine.update(&PassInput::new(roster()));

    let ctr = snapshot.position(&key("ed", "CTR")).unwrap();
    assert_eq!(ctr.state, CacheState::Clean);
    let sectors = ctr.sectors.as_ref().unwrap();
    assert_eq!(sectors.len(), 3);

    let bands: BTreeSet<(u32, u32)> = sectors
        .iter()
        .map(|s| (s.properties.min, s.properties.max))
        .collect();
    let expected: BTreeSet<(u32, u32)> = [(100, 200), (100, 250), (150, 250)].into_iter().collect();
    assert_eq!(bands, expected);

    let combined = ctr.sectors_combined.as_ref().unwrap();
    assert_eq!(combined.len(), 3);
}

#[test]
fn test_fragments_partition_and_cover_inputs() {
    let mut engine = engine();
    let snapshot = engine.update(&PassInput::new(roster()));
    let sectors = snapshot
        .position(&key("ed", "CTR"))
        .and_then(|p| p.sectors.clone())
        .unwrap();

    for (i, a) in sectors.iter().enumerate() {
        for b in &sectors[i + 1..] {
            let overlap = ops::intersection(
                &MultiPolygon::new(vec![a.geometry.clone()]),
                &MultiPolygon::new(vec![b.geometry.clone()]),
            )
            .unwrap();
            assert!(overlap.unsigned_area() < 1e-9, "fragments overlap");
        }
    }

    // Two 2x1 degree rectangles sharing a 1x1 square.
    let total: f64 = sectors.iter().map(|s| s.geometry.unsigned_area()).sum();
    assert!((total - 3.0).abs() < 1e-9);
}

// =============================================================================
// Attribution
// =============================================================================

#[test]
fn test_every_controller_attributed_exactly_once() {
    let mut engine = engine();
    let roster = roster();
    let snapshot = engine.update(&PassInput::new(roster.clone()));

    let mut seen: Vec<u64> = snapshot
        .positions
        .iter()
        .flat_map(|p| p.controllers.iter().map(|c| c.cid))
        .chain(snapshot.fallback.iter().map(|f| f.controller.cid))
        .collect();
    seen.sort_unstable();
    let mut expected: Vec<u64> = roster.iter().map(|c| c.cid).collect();
    expected.sort_unstable();
    assert_eq!(seen, expected);
    assert_eq!(snapshot.controller_count(), roster.len());
}

#[test]
fn test_unmatched_controller_falls_back_without_sectors() {
    let mut engine = engine();
    let snapshot = engine.update(&PassInput::new(roster()));

    let stranger = snapshot
        .fallback
        .iter()
        .find(|f| f.controller.callsign == "ZZZZ_CTR")
        .unwrap();
    assert_eq!(stranger.matched, None);
    assert!(snapshot
        .positions
        .iter()
        .all(|p| p.controllers.iter().all(|c| c.callsign != "ZZZZ_CTR")));

    // Matched but owning nothing.
    let ground = snapshot
        .fallback
        .iter()
        .find(|f| f.controller.callsign == "EHAM_GND")
        .unwrap();
    assert_eq!(ground.matched, Some(key("eh", "GND")));
    assert!(snapshot.position(&key("eh", "GND")).is_none());
}

// =============================================================================
// Caching
// =============================================================================

#[test]
fn test_repeat_pass_is_idempotent() {
    let mut engine = engine();
    let input = PassInput::new(roster());
    let first = engine.update(&input);
    assert_eq!(first.recomputed.len(), 3);

    let plan = engine.prepare(&input);
    assert_eq!(plan.pending_jobs(), 0);

    let second = engine.update(&input);
    assert!(second.recomputed.is_empty());
    assert_eq!(first.positions.len(), second.positions.len());
    for (a, b) in first.positions.iter().zip(&second.positions) {
        assert_eq!(a.last_updated, b.last_updated);
        assert!(Arc::ptr_eq(
            a.sectors.as_ref().unwrap(),
            b.sectors.as_ref().unwrap()
        ));
    }
}

#[test]
fn test_relief_controller_retags_without_geometry() {
    let mut engine = engine();
    engine.update(&PassInput::new(roster()));

    let mut relieved = roster();
    relieved.push(Controller::new(7, "EDMM_CTR", "127.950", Facility::Ctr));
    let snapshot = engine.update(&PassInput::new(relieved));

    assert!(snapshot.recomputed.is_empty());
    let ctr = snapshot.position(&key("ed", "CTR")).unwrap();
    assert!(ctr
        .sectors
        .as_ref()
        .unwrap()
        .iter()
        .all(|s| s.properties.atc.len() == 2));
    assert_eq!(ctr.last_updated, 2);
    assert_eq!(snapshot.position(&key("eh", "ARR")).unwrap().last_updated, 1);
}

#[test]
fn test_handover_recomputes_both_sides() {
    let mut engine = engine();
    engine.update(&PassInput::new(roster()));

    // Without the approach controller its airspace falls to the centre.
    let without_app: Vec<Controller> = roster()
        .into_iter()
        .filter(|c| c.callsign != "EHAM_APP")
        .collect();
    let snapshot = engine.update(&PassInput::new(without_app));

    assert!(snapshot.position(&key("eh", "ARR")).is_none());
    let eh_ctr = snapshot.position(&key("eh", "CTR")).unwrap();
    assert_eq!(eh_ctr.airspace_keys, "eh:0,eh:1");
    assert_eq!(snapshot.recomputed, vec![key("eh", "CTR")]);
    assert_eq!(snapshot.position(&key("ed", "CTR")).unwrap().last_updated, 1);
}

// =============================================================================
// Runways
// =============================================================================

#[test]
fn test_runway_flip_swaps_sector_and_touches_nothing_else() {
    let mut engine = engine();
    let input = PassInput::new(roster());
    let first = engine.update(&input);

    assert_eq!(first.active_runway("EHAM"), Some("27"));
    let before = centroid_x(&first, &key("eh", "ARR"));
    assert_eq!(before.len(), 1);
    assert!((before[0] - 5.5).abs() < 1e-9);

    let invalidated = engine.set_active_runway("EHAM", "09").unwrap();
    assert_eq!(invalidated, vec![key("eh", "ARR")]);

    let second = engine.update(&input);
    assert_eq!(second.active_runway("EHAM"), Some("09"));
    let after = centroid_x(&second, &key("eh", "ARR"));
    assert_eq!(after.len(), 1);
    assert!((after[0] - 4.5).abs() < 1e-9);

    assert_eq!(second.recomputed, vec![key("eh", "ARR")]);
    assert_eq!(second.position(&key("eh", "ARR")).unwrap().last_updated, 2);
    assert_eq!(second.position(&key("eh", "CTR")).unwrap().last_updated, 1);
    assert_eq!(second.position(&key("ed", "CTR")).unwrap().last_updated, 1);
}

#[test]
fn test_reselecting_active_runway_is_a_no_op() {
    let mut engine = engine();
    engine.update(&PassInput::new(roster()));
    assert!(engine.set_active_runway("EHAM", "27").unwrap().is_empty());
}

#[test]
fn test_unknown_runway_rejected() {
    let mut engine = engine();
    engine.update(&PassInput::new(roster()));
    assert!(matches!(
        engine.set_active_runway("EHAM", "18R"),
        Err(RunwayError::UnknownRunway { .. })
    ));
}

// =============================================================================
// Reload and seeding
// =============================================================================

#[test]
fn test_reload_recomputes_everything() {
    let mut engine = engine();
    let input = PassInput::new(roster());
    engine.update(&input);

    engine.reload_data(data());
    let snapshot = engine.update(&input);
    assert_eq!(snapshot.recomputed.len(), 3);
    assert_eq!(snapshot.active_runway("EHAM"), Some("27"));
}

#[test]
fn test_cold_start_adopts_matching_snapshot() {
    let input = PassInput::new(roster());
    let mut server = engine();
    let published = server.update(&input);

    let mut client = engine();
    client.seed_from_snapshot(Arc::clone(&published));
    let snapshot = client.update(&input);

    assert!(snapshot.recomputed.is_empty());
    for (a, b) in published.positions.iter().zip(&snapshot.positions) {
        assert_eq!(a.sectors, b.sectors);
        assert_eq!(b.state, CacheState::Clean);
    }
}

#[test]
fn test_cold_start_ignores_snapshot_from_other_data() {
    let input = PassInput::new(roster());
    let other = DataStore::from_documents([("ed", ED)]).unwrap().into_shared();
    let mut server = SectorEngine::new(other, EngineConfig::default());
    let published = server.update(&input);

    let mut client = engine();
    client.seed_from_snapshot(published);
    let snapshot = client.update(&input);
    assert_eq!(snapshot.recomputed.len(), 3);
}
