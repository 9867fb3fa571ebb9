//! Runway state per airport.
//!
//! Each airport referenced by a runway-conditional sector gets a
//! [`RunwayState`]. `potential` accumulates every runway seen for the airport;
//! `active` defaults to the first potential runway and then sticks until it is
//! explicitly changed.
//!
//! ICAO codes are normalized to upper case.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::RunwayCondition;

/// Errors raised when selecting a runway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunwayError {
    /// No sector references this airport.
    #[error("airport '{0}' has no runway-conditional sectors")]
    UnknownAirport(String),

    /// The runway is not among the airport's potential runways.
    #[error("runway '{runway}' is not known for airport '{icao}'")]
    UnknownRunway { icao: String, runway: String },
}

/// Active and potential runways of one airport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunwayState {
    pub icao: String,
    pub active: String,
    pub potential: Vec<String>,
}

/// Tracks [`RunwayState`] across passes.
#[derive(Debug, Clone, Default)]
pub struct RunwayTracker {
    airports: BTreeMap<String, RunwayState>,
}

impl RunwayTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record runways referenced for `icao`.
    ///
    /// New runways are added to `potential`, ordered by `preferred` (the
    /// airport definition) first and then by first appearance. The first
    /// observation of an airport sets `active` to the first potential runway.
    pub fn observe<'a>(&mut self, icao: &str, seen: impl IntoIterator<Item = &'a str>, preferred: &[String]) {
        let seen: Vec<&str> = seen.into_iter().collect();
        if seen.is_empty() {
            return;
        }
        let icao = icao.to_uppercase();

        let mut ordered: Vec<&str> = preferred
            .iter()
            .map(String::as_str)
            .filter(|r| seen.contains(r))
            .collect();
        for &runway in &seen {
            if !ordered.contains(&runway) {
                ordered.push(runway);
            }
        }

        match self.airports.get_mut(&icao) {
            Some(state) => {
                for runway in ordered {
                    if !state.potential.iter().any(|p| p == runway) {
                        state.potential.push(runway.to_string());
                    }
                }
            }
            None => {
                let potential: Vec<String> = ordered.iter().map(|r| r.to_string()).collect();
                let active = potential[0].clone();
                tracing::debug!(icao = %icao, active = %active, "Tracking airport runways");
                self.airports.insert(
                    icao.clone(),
                    RunwayState {
                        icao,
                        active,
                        potential,
                    },
                );
            }
        }
    }

    /// Select the active runway.
    ///
    /// Returns whether the selection changed.
    pub fn set_active(&mut self, icao: &str, runway: &str) -> Result<bool, RunwayError> {
        let icao = icao.to_uppercase();
        let state = self
            .airports
            .get_mut(&icao)
            .ok_or_else(|| RunwayError::UnknownAirport(icao.clone()))?;

        if !state.potential.iter().any(|p| p == runway) {
            return Err(RunwayError::UnknownRunway {
                icao,
                runway: runway.to_string(),
            });
        }
        if state.active == runway {
            return Ok(false);
        }

        tracing::info!(icao = %icao, from = %state.active, to = %runway, "Active runway changed");
        state.active = runway.to_string();
        Ok(true)
    }

    /// Active runway of `icao`, if tracked.
    pub fn active(&self, icao: &str) -> Option<&str> {
        self.airports
            .get(&icao.to_uppercase())
            .map(|s| s.active.as_str())
    }

    /// Whether a sector's runway condition currently holds.
    pub fn condition_holds(&self, condition: &RunwayCondition) -> bool {
        self.active(&condition.icao)
            .is_some_and(|active| condition.runway.contains(active))
    }

    /// Potential runways of `icao`, if tracked.
    pub fn potential(&self, icao: &str) -> Option<&[String]> {
        self.airports
            .get(&icao.to_uppercase())
            .map(|s| s.potential.as_slice())
    }

    pub fn contains(&self, icao: &str) -> bool {
        self.airports.contains_key(&icao.to_uppercase())
    }

    /// All tracked airports, ordered by ICAO.
    pub fn states(&self) -> Vec<RunwayState> {
        self.airports.values().cloned().collect()
    }
}
