//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, and data loading
//! to reduce duplication across command handlers.

use std::path::{Path, PathBuf};

use tracing::info;
use vatglasses::config::{ConfigFile, DEFAULT_LOG_FILE_NAME};
use vatglasses::data::DataStore;
use vatglasses::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load config (from `config_path`, or the default location) and start logging.
    ///
    /// Commands that print machine-readable output to stdout must pass
    /// `stdout_logging = false` so log lines never mix with it.
    pub fn new(
        config_path: Option<&Path>,
        stdout_logging: bool,
        debug_mode: bool,
    ) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string());

        let logging_guard = init_logging(&log_dir, &log_file, stdout_logging, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("vatglasses v{}", vatglasses::VERSION);
        info!("vatglasses CLI: {} command", command);
    }

    /// Data directory: the CLI argument when given, otherwise the config value.
    pub fn data_directory(&self, cli_dir: Option<&Path>) -> PathBuf {
        cli_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.data.directory.clone())
    }

    /// Load the static airspace data.
    pub fn load_data(&self, cli_dir: Option<&Path>) -> Result<DataStore, CliError> {
        let dir = self.data_directory(cli_dir);
        let store = DataStore::from_directory(&dir)?;
        info!(
            directory = %dir.display(),
            groups = store.groups().len(),
            version = store.version(),
            "Airspace data loaded"
        );
        Ok(store)
    }

    /// Write `contents` to `path`, or to stdout when no path is given.
    pub fn write_output(&self, path: Option<&Path>, contents: &str) -> Result<(), CliError> {
        match path {
            Some(path) => {
                std::fs::write(path, contents).map_err(|e| CliError::FileWrite {
                    path: path.display().to_string(),
                    error: e,
                })?;
                info!(path = %path.display(), bytes = contents.len(), "Output written");
                Ok(())
            }
            None => {
                println!("{}", contents);
                Ok(())
            }
        }
    }
}
