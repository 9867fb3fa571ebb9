//! vatglasses CLI - Command-line interface
//!
//! Drives the vatglasses sector engine: one-shot resolution of a roster file,
//! static data validation, live feed watching and config management.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::resolve::ResolveArgs;
use commands::validate::ValidateArgs;
use commands::watch::WatchArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "vatglasses")]
#[command(version, about = "Resolve live ATC rosters into airspace sectors", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.vatglasses/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug-level logging regardless of RUST_LOG
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one pass over a roster file and print the result
    Resolve(ResolveArgs),

    /// Check static airspace data for sectors the engine would drop
    Validate(ValidateArgs),

    /// Poll the live data feed and print a summary of each pass
    Watch(WatchArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Resolve(args) => {
            let runner = CliRunner::new(config_path, false, cli.debug)?;
            commands::resolve::run(args, &runner)
        }
        Commands::Validate(args) => {
            let runner = CliRunner::new(config_path, false, cli.debug)?;
            commands::validate::run(args, &runner)
        }
        Commands::Watch(args) => {
            let runner = CliRunner::new(config_path, true, cli.debug)?;
            commands::watch::run(args, &runner)
        }
        Commands::Config { command } => commands::config::run(command),
    }
}
