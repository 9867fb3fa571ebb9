//! One-shot sector resolution.
//!
//! Loads the static data and a roster, runs a pass, applies any runway
//! selections (which invalidate only the affected positions) and prints the
//! resulting snapshot as JSON or GeoJSON.

use std::path::PathBuf;

use clap::Args;
use tracing::info;
use vatglasses::engine::{EngineConfig, PassInput, SectorEngine};

use super::common::{read_overrides, read_roster, RunwaySelection};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `vatglasses resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Directory of CountryGroup JSON documents (defaults to the config value)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Roster file: a VATSIM V3 data feed document or a JSON controller array
    #[arg(long)]
    pub roster: PathBuf,

    /// Ownership-override document
    #[arg(long)]
    pub overrides: Option<PathBuf>,

    /// Active runway selection, repeatable
    #[arg(long = "runway", value_name = "ICAO=RWY")]
    pub runways: Vec<RunwaySelection>,

    /// Print a GeoJSON FeatureCollection instead of the full snapshot
    #[arg(long)]
    pub geojson: bool,

    /// Skip the combined same-band output
    #[arg(long)]
    pub no_combine: bool,

    /// Write the output to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Run `resolve`.
pub fn run(args: ResolveArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("resolve");

    let store = runner.load_data(args.data.as_deref())?;
    let roster = read_roster(&args.roster)?;
    let overrides = args
        .overrides
        .as_deref()
        .map(read_overrides)
        .transpose()?
        .unwrap_or_default();

    let mut engine_config = EngineConfig::from(&runner.config().engine);
    if args.no_combine {
        engine_config.combine_sectors = false;
    }
    let combine = engine_config.combine_sectors;

    let mut engine = SectorEngine::new(store.into_shared(), engine_config);
    let input = PassInput::new(roster).with_overrides(overrides);
    let mut snapshot = engine.update(&input);

    if !args.runways.is_empty() {
        let mut invalidated = 0;
        for selection in &args.runways {
            invalidated += engine
                .set_active_runway(&selection.icao, &selection.runway)?
                .len();
        }
        info!(
            selections = args.runways.len(),
            invalidated, "Runway selections applied"
        );
        snapshot = engine.update(&input);
    }

    let rendered = if args.geojson {
        serde_json::to_string_pretty(&snapshot.to_feature_collection(combine))
    } else {
        serde_json::to_string_pretty(snapshot.as_ref())
    }
    .map_err(|e| CliError::Config(format!("Failed to serialize snapshot: {}", e)))?;

    runner.write_output(args.output.as_deref(), &rendered)
}
