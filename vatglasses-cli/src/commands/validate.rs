//! Static data validation.
//!
//! Builds every sector polygon the way the engine would and reports the ones
//! it would drop: degenerate or too-short rings, self-intersecting
//! boundaries, owner references to unknown positions and runway conditions
//! on airports the data never defines.

use std::path::PathBuf;

use clap::Args;
use vatglasses::data::{DataStore, PositionKey};
use vatglasses::geometry::{is_kinked, sector_polygon};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `vatglasses validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Directory of CountryGroup JSON documents (defaults to the config value)
    #[arg(long)]
    pub data: Option<PathBuf>,
}

/// One finding, located by group, airspace index and sector index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub location: String,
    pub message: String,
}

/// Run `validate`.
pub fn run(args: ValidateArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("validate");

    let store = runner.load_data(args.data.as_deref())?;
    let precision = runner.config().engine.coordinate_precision;
    let problems = check(&store, precision);

    let airspaces: usize = store.groups().iter().map(|g| g.airspace.len()).sum();
    let sectors: usize = store
        .groups()
        .iter()
        .flat_map(|g| &g.airspace)
        .map(|a| a.sectors.len())
        .sum();

    println!("Airspace Data");
    println!("=============");
    println!("  Groups:    {}", store.groups().len());
    println!("  Airspaces: {}", airspaces);
    println!("  Sectors:   {}", sectors);
    println!("  Version:   {}", store.version());
    println!();

    if problems.is_empty() {
        println!("No problems found.");
        return Ok(());
    }

    for problem in &problems {
        println!("  {}: {}", problem.location, problem.message);
    }
    println!();

    Err(CliError::ValidationFailed(problems.len()))
}

/// Collect every problem in `store`.
pub fn check(store: &DataStore, precision: u32) -> Vec<Problem> {
    let mut problems = Vec::new();

    for group in store.groups() {
        for (index, airspace) in group.airspace.iter().enumerate() {
            let label = airspace.id.as_deref().unwrap_or("-");

            for owner in &airspace.owner {
                let key = PositionKey::from_reference(&group.id, owner);
                if store
                    .position(&key.country_group_id, &key.position_id)
                    .is_none()
                {
                    problems.push(Problem {
                        location: format!("{}/{} ({})", group.id, index, label),
                        message: format!("owner '{}' names no known position", owner),
                    });
                }
            }

            for (sector_index, sector) in airspace.sectors.iter().enumerate() {
                let location = format!("{}/{}#{} ({})", group.id, index, sector_index, label);

                if sector.min >= sector.max {
                    problems.push(Problem {
                        location: location.clone(),
                        message: format!("empty level band {}-{}", sector.min, sector.max),
                    });
                }

                match sector_polygon(&sector.points, precision) {
                    Ok(polygon) if is_kinked(&polygon) => problems.push(Problem {
                        location: location.clone(),
                        message: "boundary is self-intersecting".to_string(),
                    }),
                    Ok(_) => {}
                    Err(e) => problems.push(Problem {
                        location: location.clone(),
                        message: e.to_string(),
                    }),
                }

                for condition in &sector.runways {
                    if store.airport(&condition.icao).is_none() {
                        problems.push(Problem {
                            location: location.clone(),
                            message: format!(
                                "runway condition on '{}' which has no airport definition",
                                condition.icao
                            ),
                        });
                    }
                }
            }
        }
    }

    problems
}
