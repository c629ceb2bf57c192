//! Tilecache CLI - Command-line interface
//!
//! Selects a cache backend from a config file (and command-line overrides)
//! and reads, writes or purges individual tiles.

mod commands;
mod error;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tilecache::logging::init_logging;
use tilecache::BackendRegistry;

use commands::common::{open_cache, BackendArgs};
use commands::tile::{Outcome, TileAction};
use error::CliError;

/// Exit code for a cache miss on `get`.
const EXIT_MISS: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "tilecache", version, about = "Read and manage cached map tiles")]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(flatten)]
    Tile(TileAction),

    /// List available cache backends
    Backends,
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    // Every backend this build knows about is registered before any lookup.
    let registry = BackendRegistry::with_builtin_backends();

    match cli.command {
        Commands::Backends => {
            commands::backends::run(&registry);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Tile(action) => {
            let cache = open_cache(&registry, &cli.backend)?;
            match commands::tile::run(&*cache, action)? {
                Outcome::Done => Ok(ExitCode::SUCCESS),
                Outcome::Miss => Ok(ExitCode::from(EXIT_MISS)),
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(if cli.verbose { "debug" } else { "warn" });

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
