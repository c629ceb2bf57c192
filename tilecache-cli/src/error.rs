//! CLI error type.

use thiserror::Error;
use tilecache::{CacheError, ConfigError};

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The config file could not be loaded.
    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    /// The cache backend failed.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Reading or writing a local tile file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
