//! Async front end of the sector engine.

use std::sync::atomic::{fence, AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{BusyPolicy, ServiceConfig, ServiceError, Trigger};
use crate::data::DataStore;
use crate::engine::{EngineSnapshot, PassGuard, PassInput, SectorEngine, UpdateGate};
use crate::worker::{await_response, spawn_worker, GeometryBatchResult, GeometryWorker};

/// Engine changes that must happen inside a pass.
#[derive(Debug)]
enum PendingOp {
    Runway { icao: String, runway: String },
    Reload(Arc<DataStore>),
}

/// Serialized update passes with offloaded geometry.
///
/// Every trigger records its input and then runs a pass. Passes never
/// overlap: the [`UpdateGate`] admits one at a time and the
/// [`BusyPolicy`] decides what a trigger does while another pass runs.
/// Snapshots are published on a `watch` channel.
pub struct SectorService {
    engine: Mutex<SectorEngine>,
    gate: UpdateGate,
    worker: Arc<dyn GeometryWorker>,
    input: Mutex<PassInput>,
    pending: Mutex<Vec<PendingOp>>,
    /// Set when a trigger was skipped during a pass.
    rerun: AtomicBool,
    snapshots: watch::Sender<Arc<EngineSnapshot>>,
    config: ServiceConfig,
}

impl SectorService {
    pub fn new(engine: SectorEngine, worker: Arc<dyn GeometryWorker>, config: ServiceConfig) -> Self {
        let (snapshots, _) = watch::channel(engine.snapshot());
        Self {
            engine: Mutex::new(engine),
            gate: UpdateGate::new(),
            worker,
            input: Mutex::new(PassInput::default()),
            pending: Mutex::new(Vec::new()),
            rerun: AtomicBool::new(false),
            snapshots,
            config,
        }
    }

    /// Create the service with the worker named in `config`.
    ///
    /// A daemon worker stops when `shutdown` is cancelled.
    pub fn start(
        engine: SectorEngine,
        config: ServiceConfig,
        shutdown: CancellationToken,
    ) -> Result<Self, ServiceError> {
        let worker = spawn_worker(config.worker(), config.worker_channel_capacity(), shutdown)?;
        tracing::info!(
            worker = worker.name(),
            busy_policy = %config.busy_policy(),
            "Sector service started"
        );
        Ok(Self::new(engine, worker, config))
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<EngineSnapshot>> {
        self.snapshots.subscribe()
    }

    pub fn latest(&self) -> Arc<EngineSnapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// Whether a pass is running.
    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Offer a snapshot computed elsewhere to the next pass.
    pub fn seed(&self, snapshot: Arc<EngineSnapshot>) {
        self.engine.lock().seed_from_snapshot(snapshot);
    }

    /// Record a change and run a pass.
    ///
    /// Runway selections are validated before anything is queued. Under
    /// [`BusyPolicy::Skip`] a trigger arriving mid-pass returns the latest
    /// snapshot and its change is picked up by a follow-up pass.
    pub async fn trigger(&self, trigger: Trigger) -> Result<Arc<EngineSnapshot>, ServiceError> {
        tracing::debug!(trigger = trigger.kind(), "Update triggered");
        match trigger {
            Trigger::Roster(roster) => self.input.lock().roster = roster,
            Trigger::Overrides(overrides) => self.input.lock().overrides = overrides,
            Trigger::Runway { icao, runway } => {
                self.engine.lock().validate_runway(&icao, &runway)?;
                self.pending.lock().push(PendingOp::Runway { icao, runway });
            }
            Trigger::Reload(data) => self.pending.lock().push(PendingOp::Reload(data)),
            Trigger::Refresh => {}
        }
        self.run_pass().await
    }

    /// Feed triggers from `rx` until `shutdown` is cancelled or every sender is dropped.
    pub fn spawn_trigger_listener(
        self: Arc<Self>,
        mut rx: mpsc::Receiver<Trigger>,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    _ = shutdown.cancelled() => {
                        tracing::debug!("Trigger listener shutting down");
                        break;
                    }

                    trigger = rx.recv() => {
                        let Some(trigger) = trigger else {
                            tracing::debug!("Trigger channel closed");
                            break;
                        };
                        if let Err(e) = self.trigger(trigger).await {
                            tracing::warn!(error = %e, "Update pass failed");
                        }
                    }
                }
            }
        })
    }

    async fn run_pass(&self) -> Result<Arc<EngineSnapshot>, ServiceError> {
        let guard = match self.gate.try_begin() {
            Some(guard) => guard,
            None => match self.config.busy_policy() {
                BusyPolicy::Skip => {
                    self.rerun.store(true, Ordering::SeqCst);
                    fence(Ordering::SeqCst);
                    // The running pass may have released the gate before seeing the flag.
                    match self.gate.try_begin() {
                        Some(guard) => guard,
                        None => {
                            tracing::debug!("Pass in progress, trigger deferred");
                            return Ok(self.latest());
                        }
                    }
                }
                BusyPolicy::Wait => self.gate.begin(self.config.wait_poll()).await,
            },
        };
        self.run_claimed(guard).await
    }

    /// Run passes while holding the gate until no deferred trigger remains.
    async fn run_claimed<'a>(&'a self, mut guard: PassGuard<'a>) -> Result<Arc<EngineSnapshot>, ServiceError> {
        loop {
            self.rerun.store(false, Ordering::SeqCst);
            let snapshot = self.pass_once().await?;
            if self.rerun.load(Ordering::SeqCst) {
                tracing::debug!("Running follow-up pass for deferred triggers");
                continue;
            }
            match self.hand_off(guard) {
                Some(next) => {
                    tracing::debug!("Reclaimed gate for a trigger deferred during release");
                    guard = next;
                }
                None => return Ok(snapshot),
            }
        }
    }

    /// Release the gate, reclaiming it when a trigger was deferred meanwhile.
    ///
    /// Returns `None` when nothing is pending or another trigger already holds
    /// the gate and will run the pass itself.
    fn hand_off<'a>(&'a self, guard: PassGuard<'a>) -> Option<PassGuard<'a>> {
        drop(guard);
        fence(Ordering::SeqCst);
        if self.rerun.load(Ordering::SeqCst) {
            self.gate.try_begin()
        } else {
            None
        }
    }

    async fn pass_once(&self) -> Result<Arc<EngineSnapshot>, ServiceError> {
        let input = self.input.lock().clone();

        let mut plan = {
            let mut engine = self.engine.lock();
            let pending: Vec<PendingOp> = std::mem::take(&mut *self.pending.lock());
            for op in pending {
                match op {
                    PendingOp::Runway { icao, runway } => {
                        if let Err(e) = engine.set_active_runway(&icao, &runway) {
                            tracing::warn!(icao = %icao, runway = %runway, error = %e, "Runway selection dropped");
                        }
                    }
                    PendingOp::Reload(data) => engine.reload_data(data),
                }
            }
            engine.prepare(&input)
        };

        let batch = plan.take_batch();
        let result = if batch.is_empty() {
            GeometryBatchResult::default()
        } else {
            await_response(self.worker.submit(batch)).await?
        };

        let snapshot = self.engine.lock().apply(plan, result);
        self.snapshots.send_replace(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}
