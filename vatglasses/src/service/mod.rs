//! Async sector service.
//!
//! [`SectorService`] wraps a [`SectorEngine`](crate::engine::SectorEngine)
//! for use from async code. Roster updates, ownership overrides, runway
//! selections and data reloads arrive as [`Trigger`]s, either by direct call
//! or through a channel fed by a
//! [`RosterPoller`](crate::roster::RosterPoller).
//!
//! # Pass flow
//!
//! ```text
//! trigger ──► record input ──► gate ──► prepare (engine lock)
//!                                         │
//!                                         ▼
//!                                   GeometryWorker::submit ──► await
//!                                         │
//!                                         ▼
//!                                   apply (engine lock) ──► watch::Sender
//! ```
//!
//! The engine lock is never held across an await; the gate keeps passes
//! from overlapping.
//!
//! # Example
//!
//! ```ignore
//! let shutdown = CancellationToken::new();
//! let service = Arc::new(SectorService::start(engine, ServiceConfig::default(), shutdown.clone())?);
//!
//! let (tx, rx) = mpsc::channel(8);
//! service.clone().spawn_trigger_listener(rx, shutdown.clone());
//! RosterPoller::new(VatsimFeedClient::new(DEFAULT_VATSIM_DATA_URL)?, tx, Default::default()).start();
//!
//! let mut snapshots = service.subscribe();
//! while snapshots.changed().await.is_ok() {
//!     render(&snapshots.borrow());
//! }
//! ```

mod config;
mod error;
mod facade;
mod trigger;

pub use config::{BusyPolicy, ServiceConfig, ServiceConfigBuilder, DEFAULT_WAIT_POLL_MS};
pub use error::ServiceError;
pub use facade::SectorService;
pub use trigger::Trigger;
