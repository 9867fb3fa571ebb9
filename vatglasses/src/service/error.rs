//! Service error types.

use std::fmt;

use crate::runway::RunwayError;
use crate::worker::WorkerError;

/// Errors returned by [`SectorService`](super::SectorService) triggers.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The geometry worker rejected or lost the pass's batch
    Worker(WorkerError),
    /// A runway trigger named an unknown airport or runway
    Runway(RunwayError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Worker(e) => write!(f, "Geometry worker error: {}", e),
            Self::Runway(e) => write!(f, "Runway error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Worker(e) => Some(e),
            Self::Runway(e) => Some(e),
        }
    }
}

impl From<WorkerError> for ServiceError {
    fn from(e: WorkerError) -> Self {
        Self::Worker(e)
    }
}

impl From<RunwayError> for ServiceError {
    fn from(e: RunwayError) -> Self {
        Self::Runway(e)
    }
}
