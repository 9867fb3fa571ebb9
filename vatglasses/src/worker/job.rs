//! Geometry batches exchanged with a worker.
//!
//! A batch owns every polygon it carries. The submitting side keeps nothing
//! that the worker mutates; results come back as new values.

use crate::combiner::{combine_fragments, CombinedSector};
use crate::data::PositionKey;
use crate::splitter::{split_sectors, Fragment, SplitInput, SplitParams};

/// What to compute for one position.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryTask {
    /// Split the collected sectors, then optionally combine the fragments.
    Split { inputs: Vec<SplitInput>, combine: bool },
    /// Combine already split fragments.
    Combine { fragments: Vec<Fragment> },
}

/// Geometry work for one position.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryJob {
    pub key: PositionKey,
    /// Fingerprint the job was planned for; stale results are discarded on apply.
    pub airspace_keys: String,
    pub task: GeometryTask,
}

/// A set of jobs submitted together.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBatch {
    pub params: SplitParams,
    pub jobs: Vec<GeometryJob>,
}

impl GeometryBatch {
    pub fn new(params: SplitParams) -> Self {
        Self {
            params,
            jobs: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}

/// Result for one job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutput {
    pub key: PositionKey,
    pub airspace_keys: String,
    /// New fragments; `None` for combine-only jobs.
    pub fragments: Option<Vec<Fragment>>,
    /// Combined sectors, when requested.
    pub combined: Option<Vec<CombinedSector>>,
}

/// Results for a whole batch, in job order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBatchResult {
    pub outputs: Vec<JobOutput>,
}

/// Run every job in `batch` on the current thread.
pub fn process_batch(batch: GeometryBatch) -> GeometryBatchResult {
    let params = batch.params;
    let outputs = batch
        .jobs
        .into_iter()
        .map(|job| {
            let (fragments, combined) = match job.task {
                GeometryTask::Split { inputs, combine } => {
                    let fragments = split_sectors(inputs, params).fragments;
                    let combined = combine.then(|| combine_fragments(&fragments));
                    (Some(fragments), combined)
                }
                GeometryTask::Combine { fragments } => (None, Some(combine_fragments(&fragments))),
            };
            JobOutput {
                key: job.key,
                airspace_keys: job.airspace_keys,
                fragments,
                combined,
            }
        })
        .collect();

    GeometryBatchResult { outputs }
}
