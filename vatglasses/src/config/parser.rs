//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module is the single place where INI key names are mapped to struct
//! fields. Parsing starts from `ConfigFile::default()` and overlays any values
//! found in the INI.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::defaults::MAX_COORDINATE_PRECISION;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::matcher::IgnoredPosition;

/// Parse an `Ini` object into a `ConfigFile`.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [data] section
    if let Some(section) = ini.section(Some("data")) {
        if let Some(v) = non_empty(section, "directory") {
            config.data.directory = expand_tilde(v);
        }
    }

    // [engine] section
    if let Some(section) = ini.section(Some("engine")) {
        if let Some(v) = section.get("combine_sectors") {
            config.engine.combine_sectors = parse_bool(v).ok_or_else(|| {
                invalid("engine", "combine_sectors", v, "must be true or false")
            })?;
        }
        if let Some(v) = non_empty(section, "default_colour") {
            if !is_hex_colour(v) {
                return Err(invalid(
                    "engine",
                    "default_colour",
                    v,
                    "must be a hex colour like #808080",
                ));
            }
            config.engine.default_colour = v.to_string();
        }
        if let Some(v) = section.get("coordinate_precision") {
            config.engine.coordinate_precision = v
                .trim()
                .parse()
                .ok()
                .filter(|p| *p <= MAX_COORDINATE_PRECISION)
                .ok_or_else(|| {
                    invalid(
                        "engine",
                        "coordinate_precision",
                        v,
                        &format!("must be an integer between 0 and {}", MAX_COORDINATE_PRECISION),
                    )
                })?;
        }
        if let Some(v) = section.get("min_fragment_area") {
            config.engine.min_fragment_area = v
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|a| a.is_finite() && *a >= 0.0)
                .ok_or_else(|| {
                    invalid("engine", "min_fragment_area", v, "must be a non-negative number")
                })?;
        }
        if let Some(v) = section.get("ignored_positions") {
            config.engine.ignored_positions = parse_ignored_positions(v)
                .map_err(|reason| invalid("engine", "ignored_positions", v, &reason))?;
        }
    }

    // [service] section
    if let Some(section) = ini.section(Some("service")) {
        if let Some(v) = section.get("busy_policy") {
            config.service.busy_policy =
                parse_with(v).map_err(|reason| invalid("service", "busy_policy", v, &reason))?;
        }
        if let Some(v) = section.get("wait_poll_ms") {
            config.service.wait_poll_ms = parse_positive(v)
                .ok_or_else(|| invalid("service", "wait_poll_ms", v, "must be a positive integer"))?;
        }
        if let Some(v) = section.get("worker") {
            config.service.worker =
                parse_with(v).map_err(|reason| invalid("service", "worker", v, &reason))?;
        }
        if let Some(v) = section.get("worker_channel_capacity") {
            config.service.worker_channel_capacity = parse_positive(v).ok_or_else(|| {
                invalid(
                    "service",
                    "worker_channel_capacity",
                    v,
                    "must be a positive integer",
                )
            })?;
        }
    }

    // [feed] section
    if let Some(section) = ini.section(Some("feed")) {
        if let Some(v) = non_empty(section, "url") {
            if !v.starts_with("http://") && !v.starts_with("https://") {
                return Err(invalid("feed", "url", v, "must be an http(s) URL"));
            }
            config.feed.url = v.to_string();
        }
        if let Some(v) = section.get("poll_interval_secs") {
            config.feed.poll_interval_secs = parse_positive(v).ok_or_else(|| {
                invalid(
                    "feed",
                    "poll_interval_secs",
                    v,
                    "must be a positive integer (seconds)",
                )
            })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

fn parse_positive<T>(value: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    value.trim().parse::<T>().ok().filter(|v| *v > T::default())
}

fn parse_with<T: FromStr<Err = String>>(value: &str) -> Result<T, String> {
    value.parse()
}

fn is_hex_colour(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Parse a comma-separated list of `ID` / `ID:PREFIX` entries.
pub(super) fn parse_ignored_positions(value: &str) -> Result<Vec<IgnoredPosition>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::parse)
        .collect()
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::BusyPolicy;
    use crate::worker::WorkerKind;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(content).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_engine_section() {
        let config = parse(
            r#"
[engine]
combine_sectors = no
default_colour = #ff00ff
coordinate_precision = 6
min_fragment_area = 1e-8
ignored_positions = EDMM_ALB, EDGG_DKB:EDGG_D
"#,
        )
        .unwrap();

        assert!(!config.engine.combine_sectors);
        assert_eq!(config.engine.default_colour, "#ff00ff");
        assert_eq!(config.engine.coordinate_precision, 6);
        assert_eq!(config.engine.min_fragment_area, 1e-8);
        assert_eq!(
            config.engine.ignored_positions,
            vec![
                IgnoredPosition::Id("EDMM_ALB".into()),
                IgnoredPosition::WithPrefix {
                    id: "EDGG_DKB".into(),
                    prefix: "EDGG_D".into()
                },
            ]
        );
    }

    #[test]
    fn test_service_and_feed_sections() {
        let config = parse(
            r#"
[service]
busy_policy = skip
wait_poll_ms = 50
worker = inline
worker_channel_capacity = 2

[feed]
url = https://example.org/vatsim-data.json
poll_interval_secs = 60
"#,
        )
        .unwrap();

        assert_eq!(config.service.busy_policy, BusyPolicy::Skip);
        assert_eq!(config.service.wait_poll_ms, 50);
        assert_eq!(config.service.worker, WorkerKind::Inline);
        assert_eq!(config.service.worker_channel_capacity, 2);
        assert_eq!(config.feed.url, "https://example.org/vatsim-data.json");
        assert_eq!(config.feed.poll_interval_secs, 60);
    }

    #[test]
    fn test_invalid_values() {
        let cases = [
            ("[engine]\ncombine_sectors = maybe", "combine_sectors"),
            ("[engine]\ndefault_colour = grey", "default_colour"),
            ("[engine]\ncoordinate_precision = 20", "coordinate_precision"),
            ("[engine]\nmin_fragment_area = -1", "min_fragment_area"),
            ("[engine]\nignored_positions = :EDGG", "ignored_positions"),
            ("[service]\nbusy_policy = queue", "busy_policy"),
            ("[service]\nwait_poll_ms = 0", "wait_poll_ms"),
            ("[service]\nworker = threads", "worker"),
            ("[feed]\nurl = ftp://example.org", "url"),
            ("[feed]\npoll_interval_secs = soon", "poll_interval_secs"),
        ];

        for (content, expected_key) in cases {
            match parse(content) {
                Err(ConfigFileError::InvalidValue { key, .. }) => assert_eq!(key, expected_key),
                other => panic!("{}: expected InvalidValue, got {:?}", expected_key, other),
            }
        }
    }

    #[test]
    fn test_paths_expand_tilde() {
        let config = parse("[data]\ndirectory = /srv/airspace\n\n[logging]\nfile = ~/logs/vg.log").unwrap();
        assert_eq!(config.data.directory, PathBuf::from("/srv/airspace"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.logging.file, home.join("logs/vg.log"));
        }
    }

    #[test]
    fn test_empty_ignored_positions() {
        assert_eq!(parse_ignored_positions(" , ").unwrap(), vec![]);
    }
}
