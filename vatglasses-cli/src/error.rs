//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and a non-zero exit code.

use std::fmt;
use std::path::PathBuf;
use std::process;

use vatglasses::config::ConfigFileError;
use vatglasses::data::DataError;
use vatglasses::roster::FeedError;
use vatglasses::runway::RunwayError;
use vatglasses::service::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Static airspace data could not be loaded
    Data(DataError),
    /// A roster or override input file could not be read
    Input { path: PathBuf, reason: String },
    /// A `--runway` selection was rejected
    Runway(RunwayError),
    /// The sector service failed
    Service(ServiceError),
    /// The live data feed client could not be created
    Feed(FeedError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
    /// Validation found problems in the static data
    ValidationFailed(usize),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Data(DataError::NotFound(_)) => {
                eprintln!();
                eprintln!("Set the data directory with --data or in the [data] section of");
                eprintln!("the configuration file ('vatglasses config path' shows where it is).");
            }
            CliError::Runway(_) => {
                eprintln!();
                eprintln!("Runway selections use the form ICAO=RUNWAY, e.g. --runway EDDM=26R.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Data(e) => write!(f, "Failed to load airspace data: {}", e),
            CliError::Input { path, reason } => {
                write!(f, "Failed to read '{}': {}", path.display(), reason)
            }
            CliError::Runway(e) => write!(f, "Invalid runway selection: {}", e),
            CliError::Service(e) => write!(f, "Sector service error: {}", e),
            CliError::Feed(e) => write!(f, "Data feed error: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
            CliError::ValidationFailed(count) => {
                write!(f, "Validation found {} problem(s)", count)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Data(e) => Some(e),
            CliError::Runway(e) => Some(e),
            CliError::Service(e) => Some(e),
            CliError::Feed(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<DataError> for CliError {
    fn from(e: DataError) -> Self {
        CliError::Data(e)
    }
}

impl From<RunwayError> for CliError {
    fn from(e: RunwayError) -> Self {
        CliError::Runway(e)
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Service(e)
    }
}

impl From<FeedError> for CliError {
    fn from(e: FeedError) -> Self {
        CliError::Feed(e)
    }
}
