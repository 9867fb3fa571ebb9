//! Synchronous worker.

use tokio::sync::oneshot;

use super::{process_batch, GeometryBatch, GeometryWorker, WorkerResponse};

/// Computes each batch inside `submit`; the receiver is ready on return.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineWorker;

impl InlineWorker {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryWorker for InlineWorker {
    fn submit(&self, batch: GeometryBatch) -> WorkerResponse {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Ok(process_batch(batch)));
        rx
    }

    fn name(&self) -> &'static str {
        "inline"
    }
}
