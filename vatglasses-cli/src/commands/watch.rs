//! Live mode: poll the VATSIM data feed and keep the sector picture current.
//!
//! The roster poller feeds the service's trigger channel; every published
//! snapshot is summarized on stdout until Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use vatglasses::engine::{EngineConfig, EngineSnapshot, SectorEngine};
use vatglasses::roster::{RosterPoller, RosterPollerConfig, VatsimFeedClient};
use vatglasses::service::{SectorService, ServiceConfig, Trigger};

use super::common::RunwaySelection;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Trigger channel depth between the poller and the service.
const TRIGGER_CHANNEL_CAPACITY: usize = 4;

/// Arguments for `vatglasses watch`.
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Directory of CountryGroup JSON documents (defaults to the config value)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Data feed URL (defaults to the config value)
    #[arg(long)]
    pub url: Option<String>,

    /// Active runway selection applied after the first roster, repeatable
    #[arg(long = "runway", value_name = "ICAO=RWY")]
    pub runways: Vec<RunwaySelection>,
}

/// Run `watch`.
pub fn run(args: WatchArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("watch");

    let config = runner.config();
    let store = runner.load_data(args.data.as_deref())?;
    let engine = SectorEngine::new(store.into_shared(), EngineConfig::from(&config.engine));
    let service_config = ServiceConfig::from(&config.service);
    let poller_config = RosterPollerConfig::from(&config.feed);
    let url = args.url.clone().unwrap_or_else(|| config.feed.url.clone());

    let shutdown = CancellationToken::new();
    let handler_token = shutdown.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Config(format!("Failed to start runtime: {}", e)))?;

    runtime.block_on(async move {
        let service = Arc::new(SectorService::start(engine, service_config, shutdown.clone())?);
        let client = VatsimFeedClient::new(url)?;
        info!(url = client.data_url(), "Watching data feed");
        println!("Watching {} (Ctrl-C to stop)", client.data_url());

        let (tx, rx) = mpsc::channel::<Trigger>(TRIGGER_CHANNEL_CAPACITY);
        let poller = RosterPoller::new(client, tx, poller_config).start();
        let listener = Arc::clone(&service).spawn_trigger_listener(rx, shutdown.clone());

        let mut snapshots = service.subscribe();
        let mut runways_pending = !args.runways.is_empty();

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,

                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = Arc::clone(&snapshots.borrow_and_update());
                    print_summary(&snapshot);

                    // Runway selections need the airports tracked by a first pass.
                    if runways_pending && snapshot.generation > 0 {
                        runways_pending = false;
                        let service = Arc::clone(&service);
                        let selections = args.runways.clone();
                        tokio::spawn(async move {
                            for selection in selections {
                                let trigger = Trigger::runway(selection.icao, selection.runway);
                                if let Err(e) = service.trigger(trigger).await {
                                    tracing::warn!(error = %e, "Runway selection rejected");
                                }
                            }
                        });
                    }
                }
            }
        }

        poller.abort();
        let _ = listener.await;
        info!("Watch stopped");
        Ok::<(), CliError>(())
    })
}

fn print_summary(snapshot: &EngineSnapshot) {
    let sectors: usize = snapshot
        .positions
        .iter()
        .filter_map(|p| p.sectors.as_ref())
        .map(|s| s.len())
        .sum();
    println!(
        "[{}] generation {}: {} controllers, {} positions, {} sectors, {} fallback, {} recomputed",
        snapshot.computed_at.format("%H:%M:%S"),
        snapshot.generation,
        snapshot.controller_count(),
        snapshot.positions.len(),
        sectors,
        snapshot.fallback.len(),
        snapshot.recomputed.len(),
    );
}
