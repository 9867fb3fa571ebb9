//! VatGlasses - airspace sector resolution for live ATC rosters
//!
//! This library turns static airspace data (positions, airspaces, altitude
//! banded sector polygons) and a live controller roster into per-position
//! sector features: which controller owns which piece of sky, and at which
//! levels.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a facade that runs
//! update passes on triggers and publishes snapshots:
//!
//! ```ignore
//! use vatglasses::data::DataStore;
//! use vatglasses::engine::{EngineConfig, SectorEngine};
//! use vatglasses::service::{SectorService, ServiceConfig, Trigger};
//!
//! let engine = SectorEngine::new(Arc::new(store), EngineConfig::default());
//! let service = SectorService::start(engine, ServiceConfig::default(), shutdown)?;
//!
//! let snapshot = service.trigger(Trigger::Roster(controllers)).await?;
//! ```
//!
//! The synchronous [`engine::SectorEngine`] can be driven directly when no
//! runtime is available.

pub mod collector;
pub mod combiner;
pub mod config;
pub mod data;
pub mod engine;
pub mod feature;
pub mod geometry;
pub mod logging;
pub mod matcher;
pub mod ownership;
pub mod roster;
pub mod runway;
pub mod service;
pub mod splitter;
pub mod worker;

/// Version of the library and CLI.
///
/// Synchronized across the workspace; injected from `Cargo.toml` at compile
/// time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
