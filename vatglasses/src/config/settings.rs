//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::matcher::IgnoredPosition;
use crate::service::BusyPolicy;
use crate::worker::WorkerKind;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub data: DataSettings,
    pub engine: EngineSettings,
    pub service: ServiceSettings,
    pub feed: FeedSettings,
    pub logging: LoggingSettings,
}

/// Static airspace data location.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    /// Directory holding one JSON document per CountryGroup
    pub directory: PathBuf,
}

/// Engine tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Produce combined same-band sectors
    pub combine_sectors: bool,
    /// Colour for positions without colour rules
    pub default_colour: String,
    /// Decimal places kept when rounding coordinates
    pub coordinate_precision: u32,
    /// Fragments below this area (square degrees) are dropped
    pub min_fragment_area: f64,
    /// Positions excluded from matching
    pub ignored_positions: Vec<IgnoredPosition>,
}

/// Update pass scheduling.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    /// What a trigger does while a pass runs
    pub busy_policy: BusyPolicy,
    /// Poll interval of the wait loop in milliseconds
    pub wait_poll_ms: u64,
    /// Geometry worker implementation
    pub worker: WorkerKind,
    /// Request channel capacity of the daemon worker
    pub worker_channel_capacity: usize,
}

/// Live roster feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSettings {
    /// VATSIM V3 data feed URL
    pub url: String,
    /// Seconds between polls
    pub poll_interval_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
