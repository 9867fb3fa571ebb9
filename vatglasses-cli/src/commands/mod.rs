//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`resolve`] - One pass over a roster file
//! - [`validate`] - Static data checks
//! - [`watch`] - Live mode against the VATSIM data feed

pub mod common;
pub mod config;
pub mod resolve;
pub mod validate;
pub mod watch;
