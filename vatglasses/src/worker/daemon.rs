//! Channel-fed geometry daemon.
//!
//! The [`WorkerDaemon`] is a long-running task that receives
//! [`WorkerRequest`]s over a bounded mpsc channel and answers each on its
//! oneshot. Requests are served one at a time on the blocking pool.
//!
//! ```ignore
//! let (daemon, worker) = WorkerDaemon::new(DEFAULT_WORKER_CHANNEL_CAPACITY);
//! let shutdown = CancellationToken::new();
//! tokio::spawn(daemon.run(shutdown.clone()));
//!
//! let result = await_response(worker.submit(batch)).await?;
//! ```

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::{process_batch, GeometryBatch, GeometryBatchResult, GeometryWorker, WorkerError, WorkerResponse};

/// Default request channel capacity.
pub const DEFAULT_WORKER_CHANNEL_CAPACITY: usize = 4;

/// One queued batch and where to send its result.
pub struct WorkerRequest {
    pub batch: GeometryBatch,
    pub response_tx: oneshot::Sender<Result<GeometryBatchResult, WorkerError>>,
}

/// Background task serving [`ChannelWorker`] requests.
pub struct WorkerDaemon {
    request_rx: mpsc::Receiver<WorkerRequest>,
}

impl WorkerDaemon {
    /// Create the daemon and its client.
    pub fn new(channel_capacity: usize) -> (Self, ChannelWorker) {
        let (tx, rx) = mpsc::channel(channel_capacity.max(1));
        (Self { request_rx: rx }, ChannelWorker::new(tx))
    }

    /// Serve requests until `shutdown` is cancelled or every client is dropped.
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!("Geometry worker daemon starting");
        let mut request_rx = self.request_rx;
        let mut served: u64 = 0;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    tracing::info!("Geometry worker daemon shutting down");
                    break;
                }

                request = request_rx.recv() => {
                    let Some(WorkerRequest { batch, response_tx }) = request else {
                        tracing::debug!("All geometry worker clients dropped");
                        break;
                    };

                    let jobs = batch.len();
                    let result = tokio::task::spawn_blocking(move || process_batch(batch))
                        .await
                        .map_err(|e| WorkerError::TaskFailed(e.to_string()));
                    if let Err(e) = &result {
                        tracing::warn!(jobs, error = %e, "Geometry task failed");
                    }
                    served += 1;
                    let _ = response_tx.send(result);
                }
            }
        }

        tracing::info!(served, "Geometry worker daemon stopped");
    }
}

/// Client side of a [`WorkerDaemon`].
#[derive(Clone)]
pub struct ChannelWorker {
    tx: mpsc::Sender<WorkerRequest>,
}

impl ChannelWorker {
    pub fn new(tx: mpsc::Sender<WorkerRequest>) -> Self {
        Self { tx }
    }

    pub fn is_connected(&self) -> bool {
        !self.tx.is_closed()
    }
}

impl GeometryWorker for ChannelWorker {
    fn submit(&self, batch: GeometryBatch) -> WorkerResponse {
        let (tx, rx) = oneshot::channel();
        let request = WorkerRequest {
            batch,
            response_tx: tx,
        };

        // Fast path: room in the channel.
        if let Err(e) = self.tx.try_send(request) {
            match e {
                mpsc::error::TrySendError::Closed(req) => {
                    let _ = req.response_tx.send(Err(WorkerError::ChannelClosed));
                }
                mpsc::error::TrySendError::Full(req) => {
                    // Wait for capacity in the background; the caller is already
                    // waiting on `rx`.
                    let sender = self.tx.clone();
                    match tokio::runtime::Handle::try_current() {
                        Ok(handle) => {
                            handle.spawn(async move {
                                if let Err(send_err) = sender.send(req).await {
                                    let _ = send_err.0.response_tx.send(Err(WorkerError::ChannelClosed));
                                }
                            });
                        }
                        Err(err) => {
                            let _ = req.response_tx.send(Err(WorkerError::NoRuntime(err.to_string())));
                        }
                    }
                }
            }
        }

        rx
    }

    fn name(&self) -> &'static str {
        "daemon"
    }
}
