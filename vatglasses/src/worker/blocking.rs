//! Worker backed by tokio's blocking thread pool.

use tokio::sync::oneshot;

use super::{process_batch, GeometryBatch, GeometryWorker, WorkerError, WorkerResponse};

/// Runs each batch with `tokio::task::spawn_blocking`.
///
/// Must be used from inside a tokio runtime; otherwise the receiver yields
/// [`WorkerError::NoRuntime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingWorker;

impl BlockingWorker {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryWorker for BlockingWorker {
    fn submit(&self, batch: GeometryBatch) -> WorkerResponse {
        let (tx, rx) = oneshot::channel();

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                let _ = tx.send(Err(WorkerError::NoRuntime(e.to_string())));
                return rx;
            }
        };

        let jobs = batch.len();
        let task = handle.spawn_blocking(move || process_batch(batch));
        handle.spawn(async move {
            let result = task.await.map_err(|e| {
                tracing::warn!(jobs, error = %e, "Geometry task failed");
                WorkerError::TaskFailed(e.to_string())
            });
            // Receiver may have been dropped by a caller that lost interest.
            let _ = tx.send(result);
        });

        rx
    }

    fn name(&self) -> &'static str {
        "blocking"
    }
}
