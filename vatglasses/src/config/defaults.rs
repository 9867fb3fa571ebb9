//! Default values for every configuration key.

use super::file::config_directory;
use super::settings::*;
use crate::engine::{DEFAULT_COLOUR, DEFAULT_MIN_FRAGMENT_AREA};
use crate::geometry::DEFAULT_PRECISION;
use crate::roster::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_VATSIM_DATA_URL};
use crate::service::{BusyPolicy, DEFAULT_WAIT_POLL_MS};
use crate::worker::{WorkerKind, DEFAULT_WORKER_CHANNEL_CAPACITY};

/// Name of the data directory under the config directory.
pub const DEFAULT_DATA_DIR_NAME: &str = "data";

/// Name of the log file under the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "vatglasses.log";

/// Highest accepted `coordinate_precision`.
pub const MAX_COORDINATE_PRECISION: u32 = 12;

// =============================================================================
// ConfigFile::default()
// =============================================================================

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = config_directory();

        Self {
            data: DataSettings {
                directory: config_dir.join(DEFAULT_DATA_DIR_NAME),
            },
            engine: EngineSettings {
                combine_sectors: true,
                default_colour: DEFAULT_COLOUR.to_string(),
                coordinate_precision: DEFAULT_PRECISION,
                min_fragment_area: DEFAULT_MIN_FRAGMENT_AREA,
                ignored_positions: Vec::new(),
            },
            service: ServiceSettings {
                busy_policy: BusyPolicy::default(),
                wait_poll_ms: DEFAULT_WAIT_POLL_MS,
                worker: WorkerKind::default(),
                worker_channel_capacity: DEFAULT_WORKER_CHANNEL_CAPACITY,
            },
            feed: FeedSettings {
                url: DEFAULT_VATSIM_DATA_URL.to_string(),
                poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            },
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
