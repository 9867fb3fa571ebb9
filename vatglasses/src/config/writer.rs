//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! Produces the commented representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let ignored_positions = config
        .engine
        .ignored_positions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"[data]
; Directory holding one JSON document per CountryGroup (file stem = group id)
directory = {}

[engine]
; Also build combined sectors: fragments with identical altitude bands merged for display
combine_sectors = {}
; Colour for positions without colour rules
default_colour = {}
; Decimal places kept when rounding coordinates (0-12, default: 8)
coordinate_precision = {}
; Fragments smaller than this many square degrees are dropped
min_fragment_area = {}
; Comma-separated positions never matched to controllers.
;   ID        - ignore the position entirely
;   ID:PREFIX - ignore it only for callsigns starting with PREFIX
ignored_positions = {}

[service]
; Trigger behaviour while an update pass is running:
;   wait - wait for the running pass, then run another
;   skip - return the latest snapshot and fold the change into a follow-up pass
busy_policy = {}
; Poll interval in milliseconds while waiting for a running pass
wait_poll_ms = {}
; Where sector splitting runs:
;   inline   - on the calling task
;   blocking - on the tokio blocking thread pool
;   daemon   - on a dedicated background task fed by a bounded channel
worker = {}
; Request channel capacity of the daemon worker
worker_channel_capacity = {}

[feed]
; VATSIM V3 data feed
url = {}
; Seconds between roster polls
poll_interval_secs = {}

[logging]
; Log file, truncated at the start of each session
file = {}
"#,
        path_to_string(&config.data.directory),
        config.engine.combine_sectors,
        config.engine.default_colour,
        config.engine.coordinate_precision,
        config.engine.min_fragment_area,
        ignored_positions,
        config.service.busy_policy,
        config.service.wait_poll_ms,
        config.service.worker,
        config.service.worker_channel_capacity,
        config.feed.url,
        config.feed.poll_interval_secs,
        path_to_string(&config.logging.file),
    )
}

/// Render a path, abbreviating the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
