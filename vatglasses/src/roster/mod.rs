//! Live controller roster.
//!
//! The roster is the set of controllers currently connected to the network.
//! It arrives from the VATSIM data feed ([`feed`]) or any other collaborator
//! able to produce [`Controller`] records. Two rosters compare equal for
//! caching purposes when their [`RosterFingerprint`]s match.

pub mod feed;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

pub use feed::{
    parse_vatsim_feed, FeedError, RosterClient, RosterPoller, RosterPollerConfig, VatsimFeedClient,
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_VATSIM_DATA_URL,
};

/// Controller facility type.
///
/// Numeric codes follow the VATSIM data feed; ATIS connections are tracked
/// separately because the feed lists them in their own array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facility {
    Obs,
    Fss,
    Del,
    Gnd,
    Twr,
    App,
    Ctr,
    Atis,
}

impl Facility {
    /// Map a VATSIM facility code. Unknown codes are treated as observers.
    pub fn from_vatsim_code(code: i64) -> Self {
        match code {
            1 => Facility::Fss,
            2 => Facility::Del,
            3 => Facility::Gnd,
            4 => Facility::Twr,
            5 => Facility::App,
            6 => Facility::Ctr,
            _ => Facility::Obs,
        }
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Facility::Obs => "OBS",
            Facility::Fss => "FSS",
            Facility::Del => "DEL",
            Facility::Gnd => "GND",
            Facility::Twr => "TWR",
            Facility::App => "APP",
            Facility::Ctr => "CTR",
            Facility::Atis => "ATIS",
        };
        f.write_str(name)
    }
}

/// One live controller connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Controller {
    /// Network member id.
    pub cid: u64,
    /// Logon callsign, e.g. `EDMM_ALB_CTR`.
    pub callsign: String,
    /// Primary frequency as published, e.g. `132.555`.
    pub frequency: String,
    pub facility: Facility,
}

impl Controller {
    pub fn new(cid: u64, callsign: impl Into<String>, frequency: impl Into<String>, facility: Facility) -> Self {
        Self {
            cid,
            callsign: callsign.into(),
            frequency: frequency.into(),
            facility,
        }
    }
}

/// Order-independent identity of a controller list: the set of `(callsign, cid)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RosterFingerprint(BTreeSet<(String, u64)>);

impl RosterFingerprint {
    pub fn of(controllers: &[Controller]) -> Self {
        Self(
            controllers
                .iter()
                .map(|c| (c.callsign.clone(), c.cid))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Live ownership overrides: `{countryGroupId: {airspaceIndex: ownerList}}`.
///
/// When present for an airspace, the override owner list replaces the
/// airspace's static `owner` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnershipOverrides(BTreeMap<String, BTreeMap<usize, Vec<String>>>);

impl OwnershipOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override owner list for one airspace, if any.
    pub fn owners(&self, group: &str, index: usize) -> Option<&[String]> {
        self.0
            .get(group)
            .and_then(|airspaces| airspaces.get(&index))
            .map(Vec::as_slice)
    }

    /// Set the owner list for one airspace.
    pub fn insert(&mut self, group: impl Into<String>, index: usize, owners: Vec<String>) {
        self.0.entry(group.into()).or_default().insert(index, owners);
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }
}
