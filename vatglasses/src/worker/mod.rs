//! Geometry offload.
//!
//! The splitter and combiner are the only expensive steps of a pass. The
//! [`GeometryWorker`] trait lets the caller hand a [`GeometryBatch`] to some
//! executor and await the result on a oneshot channel, without knowing whether
//! the work runs inline, on tokio's blocking pool or on a long-lived daemon.
//!
//! # Implementations
//!
//! - [`InlineWorker`] - computes synchronously inside `submit`
//! - [`BlockingWorker`] - one `spawn_blocking` task per batch
//! - [`ChannelWorker`] + [`WorkerDaemon`] - bounded request channel served by one background task
//!
//! There is no cancellation and no timeout. A caller that no longer needs a
//! result drops the receiver; the worker still runs the batch to completion.
//!
//! # Example
//!
//! ```ignore
//! let worker: Arc<dyn GeometryWorker> = Arc::new(BlockingWorker::new());
//! let rx = worker.submit(batch);
//! let result = rx.await.map_err(|_| WorkerError::Dropped)??;
//! ```

mod blocking;
mod daemon;
mod inline;
mod job;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

pub use blocking::BlockingWorker;
pub use daemon::{ChannelWorker, WorkerDaemon, WorkerRequest, DEFAULT_WORKER_CHANNEL_CAPACITY};
pub use inline::InlineWorker;
pub use job::{process_batch, GeometryBatch, GeometryBatchResult, GeometryJob, GeometryTask, JobOutput};

/// Receiver for one batch result.
pub type WorkerResponse = oneshot::Receiver<Result<GeometryBatchResult, WorkerError>>;

/// Errors surfaced to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    /// The worker has shut down.
    #[error("geometry worker has shut down")]
    ChannelClosed,

    /// The worker dropped the request without answering.
    #[error("geometry worker dropped the request")]
    Dropped,

    /// The computation itself failed.
    #[error("geometry task failed: {0}")]
    TaskFailed(String),

    /// No tokio runtime is available to run the task.
    #[error("no async runtime available: {0}")]
    NoRuntime(String),
}

/// Executor for geometry batches.
pub trait GeometryWorker: Send + Sync + 'static {
    /// Submit a batch; the result arrives on the returned receiver.
    fn submit(&self, batch: GeometryBatch) -> WorkerResponse;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Await a worker response, folding a dropped sender into [`WorkerError::Dropped`].
pub async fn await_response(rx: WorkerResponse) -> Result<GeometryBatchResult, WorkerError> {
    rx.await.map_err(|_| WorkerError::Dropped)?
}

/// Which worker implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerKind {
    Inline,
    #[default]
    Blocking,
    Daemon,
}

impl FromStr for WorkerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inline" => Ok(WorkerKind::Inline),
            "blocking" => Ok(WorkerKind::Blocking),
            "daemon" => Ok(WorkerKind::Daemon),
            other => Err(format!("expected inline, blocking or daemon, got '{}'", other)),
        }
    }
}

impl fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WorkerKind::Inline => "inline",
            WorkerKind::Blocking => "blocking",
            WorkerKind::Daemon => "daemon",
        })
    }
}

/// Build a worker of `kind`.
///
/// For [`WorkerKind::Daemon`] the daemon task is spawned on the current tokio
/// runtime and stops when `shutdown` is cancelled.
pub fn spawn_worker(
    kind: WorkerKind,
    channel_capacity: usize,
    shutdown: CancellationToken,
) -> Result<Arc<dyn GeometryWorker>, WorkerError> {
    let worker: Arc<dyn GeometryWorker> = match kind {
        WorkerKind::Inline => Arc::new(InlineWorker::new()),
        WorkerKind::Blocking => Arc::new(BlockingWorker::new()),
        WorkerKind::Daemon => {
            let handle = tokio::runtime::Handle::try_current()
                .map_err(|e| WorkerError::NoRuntime(e.to_string()))?;
            let (daemon, client) = WorkerDaemon::new(channel_capacity);
            handle.spawn(daemon.run(shutdown));
            Arc::new(client)
        }
    };
    tracing::info!(worker = worker.name(), "Geometry worker ready");
    Ok(worker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_kind_parse() {
        assert_eq!("inline".parse::<WorkerKind>(), Ok(WorkerKind::Inline));
        assert_eq!(" Daemon ".parse::<WorkerKind>(), Ok(WorkerKind::Daemon));
        assert!("threads".parse::<WorkerKind>().is_err());
        assert_eq!(WorkerKind::Blocking.to_string(), "blocking");
    }

    #[test]
    fn test_spawn_daemon_requires_runtime() {
        let result = spawn_worker(WorkerKind::Daemon, 4, CancellationToken::new());
        assert!(matches!(result, Err(WorkerError::NoRuntime(_))));
    }

    #[tokio::test]
    async fn test_spawn_each_kind() {
        let shutdown = CancellationToken::new();
        for kind in [WorkerKind::Inline, WorkerKind::Blocking, WorkerKind::Daemon] {
            let worker = spawn_worker(kind, 2, shutdown.clone()).unwrap();
            assert_eq!(worker.name(), kind.to_string());
        }
        shutdown.cancel();
    }
}
