//! Error types for geometry operations.

use thiserror::Error;

/// Errors raised while building or combining sector polygons.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Fewer than three distinct points remain after cleanup.
    #[error("polygon needs at least 3 distinct points, got {0}")]
    TooFewPoints(usize),

    /// The ring encloses no area.
    #[error("polygon encloses no area")]
    Degenerate,

    /// The ring crosses itself.
    #[error("polygon boundary is self-intersecting")]
    Kinked,

    /// The boolean-operation backend failed on this input.
    #[error("{op} failed: {reason}")]
    OperationFailed { op: &'static str, reason: String },
}
