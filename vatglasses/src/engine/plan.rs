//! Pass inputs and the plan handed between `prepare` and `apply`.

use crate::data::PositionKey;
use crate::roster::{Controller, OwnershipOverrides};
use crate::worker::GeometryBatch;

use super::snapshot::FallbackEntry;

/// Everything a pass reads from outside the static data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassInput {
    pub roster: Vec<Controller>,
    pub overrides: OwnershipOverrides,
}

impl PassInput {
    pub fn new(roster: Vec<Controller>) -> Self {
        Self {
            roster,
            overrides: OwnershipOverrides::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: OwnershipOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// The cheap half of a pass, waiting for its geometry.
#[derive(Debug)]
pub struct PassPlan {
    pub(crate) generation: u64,
    pub(crate) fallback: Vec<FallbackEntry>,
    /// Positions completed without geometry work.
    pub(crate) completed: Vec<PositionKey>,
    pub(crate) batch: GeometryBatch,
}

impl PassPlan {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of positions waiting on geometry.
    pub fn pending_jobs(&self) -> usize {
        self.batch.len()
    }

    /// Take the geometry batch for submission, leaving an empty one behind.
    pub fn take_batch(&mut self) -> GeometryBatch {
        let empty = GeometryBatch::new(self.batch.params);
        std::mem::replace(&mut self.batch, empty)
    }
}
