//! Common types and utilities shared across CLI commands.

use std::path::Path;
use std::str::FromStr;

use vatglasses::roster::{parse_vatsim_feed, Controller, OwnershipOverrides};

use crate::error::CliError;

/// A `--runway ICAO=RUNWAY` selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunwaySelection {
    pub icao: String,
    pub runway: String,
}

impl FromStr for RunwaySelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (icao, runway) = s
            .split_once('=')
            .ok_or_else(|| format!("expected ICAO=RUNWAY, got '{}'", s))?;
        let (icao, runway) = (icao.trim(), runway.trim());
        if icao.is_empty() || runway.is_empty() {
            return Err(format!("expected ICAO=RUNWAY, got '{}'", s));
        }
        Ok(Self {
            icao: icao.to_uppercase(),
            runway: runway.to_uppercase(),
        })
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|e| CliError::Input {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Read a roster file.
///
/// Accepts a VATSIM V3 data feed document or a plain JSON array of
/// controller records.
pub fn read_roster(path: &Path) -> Result<Vec<Controller>, CliError> {
    let bytes = read_file(path)?;
    if let Ok(roster) = serde_json::from_slice::<Vec<Controller>>(&bytes) {
        return Ok(roster);
    }
    parse_vatsim_feed(&bytes).map_err(|e| CliError::Input {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Read an ownership-override document.
pub fn read_overrides(path: &Path) -> Result<OwnershipOverrides, CliError> {
    let bytes = read_file(path)?;
    serde_json::from_slice(&bytes).map_err(|e| CliError::Input {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
