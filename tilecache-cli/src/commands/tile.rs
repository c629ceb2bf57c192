//! Tile get/set/purge commands.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;
use tilecache::{TileCache, TileKey};
use tracing::info;

use crate::error::CliError;

/// Tile subcommands.
#[derive(Debug, Subcommand)]
pub enum TileAction {
    /// Read a tile and write its bytes to a file or stdout
    Get {
        /// Tile key as z/x/y
        key: TileKey,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Store a tile read from a file or stdin
    Set {
        /// Tile key as z/x/y
        key: TileKey,
        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Remove a tile from the cache
    Purge {
        /// Tile key as z/x/y
        key: TileKey,
    },
}

/// Outcome of a tile command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Miss,
}

/// Run a tile subcommand against `cache`.
pub fn run(cache: &dyn TileCache, action: TileAction) -> Result<Outcome, CliError> {
    match action {
        TileAction::Get { key, output } => match cache.get(&key)? {
            Some(data) => {
                write_output(output.as_deref(), &data)?;
                info!(key = %key, bytes = data.len(), "Cache hit");
                Ok(Outcome::Done)
            }
            None => {
                eprintln!("Tile {} is not cached", key);
                Ok(Outcome::Miss)
            }
        },
        TileAction::Set { key, input } => {
            let data = read_input(input.as_deref())?;
            cache.set(&key, &data)?;
            Ok(Outcome::Done)
        }
        TileAction::Purge { key } => {
            cache.purge(&key)?;
            println!("Purged {}", key);
            Ok(Outcome::Done)
        }
    }
}

fn io_error(path: &str, source: io::Error) -> CliError {
    CliError::Io {
        path: path.to_string(),
        source,
    }
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>, CliError> {
    match path {
        Some(path) => fs::read(path).map_err(|e| io_error(&path.display().to_string(), e)),
        None => {
            let mut data = Vec::new();
            io::stdin()
                .read_to_end(&mut data)
                .map_err(|e| io_error("<stdin>", e))?;
            Ok(data)
        }
    }
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<(), CliError> {
    match path {
        Some(path) => fs::write(path, data).map_err(|e| io_error(&path.display().to_string(), e)),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(data)
                .and_then(|_| stdout.flush())
                .map_err(|e| io_error("<stdout>", e))
        }
    }
}
