//! Events that start an update pass.

use std::sync::Arc;

use crate::data::DataStore;
use crate::roster::{Controller, OwnershipOverrides};

/// Something changed; run a pass.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// A new controller roster.
    Roster(Vec<Controller>),
    /// A new ownership-override document.
    Overrides(OwnershipOverrides),
    /// An operator selected a runway.
    Runway { icao: String, runway: String },
    /// The static data was reloaded.
    Reload(Arc<DataStore>),
    /// Re-run with the current inputs.
    Refresh,
}

impl Trigger {
    pub fn runway(icao: impl Into<String>, runway: impl Into<String>) -> Self {
        Self::Runway {
            icao: icao.into(),
            runway: runway.into(),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Roster(_) => "roster",
            Self::Overrides(_) => "overrides",
            Self::Runway { .. } => "runway",
            Self::Reload(_) => "reload",
            Self::Refresh => "refresh",
        }
    }
}

impl From<Vec<Controller>> for Trigger {
    fn from(roster: Vec<Controller>) -> Self {
        Self::Roster(roster)
    }
}

impl From<OwnershipOverrides> for Trigger {
    fn from(overrides: OwnershipOverrides) -> Self {
        Self::Overrides(overrides)
    }
}
