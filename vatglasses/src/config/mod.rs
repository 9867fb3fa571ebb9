//! Configuration file for vatglasses.
//!
//! The user configuration lives in `~/.vatglasses/config.ini`. Each INI
//! section maps to one settings struct:
//!
//! | Section | Struct | Consumed by |
//! |---|---|---|
//! | `[data]` | [`DataSettings`] | [`DataStore::from_directory`](crate::data::DataStore::from_directory) |
//! | `[engine]` | [`EngineSettings`] | [`EngineConfig`](crate::engine::EngineConfig) |
//! | `[service]` | [`ServiceSettings`] | [`ServiceConfig`](crate::service::ServiceConfig) |
//! | `[feed]` | [`FeedSettings`] | [`RosterPollerConfig`](crate::roster::RosterPollerConfig) |
//! | `[logging]` | [`LoggingSettings`] | [`init_logging`](crate::logging::init_logging) |
//!
//! Missing keys fall back to the defaults in [`defaults`]; bad values are
//! reported as [`ConfigFileError::InvalidValue`].
//!
//! # Example
//!
//! ```no_run
//! use vatglasses::config::ConfigFile;
//! use vatglasses::engine::EngineConfig;
//!
//! let config = ConfigFile::load()?;
//! let engine = EngineConfig::from(&config.engine);
//! # Ok::<(), vatglasses::config::ConfigFileError>(())
//! ```

pub mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, DataSettings, EngineSettings, FeedSettings, LoggingSettings, ServiceSettings};
