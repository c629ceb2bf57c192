//! Backend selection shared across CLI commands.

use std::path::{Path, PathBuf};

use clap::Args;
use tilecache::config::KEY_TYPE;
use tilecache::{BackendRegistry, CacheOptions, TileCache};
use tracing::debug;

use crate::error::CliError;

/// Section of the config file holding cache options.
pub const DEFAULT_SECTION: &str = "cache";

/// Backend selection arguments.
///
/// Values given on the command line take precedence over the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct BackendArgs {
    /// Config file (default: ~/.tilecache/config.ini)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Config file section holding the cache options
    #[arg(long, global = true, default_value = DEFAULT_SECTION)]
    pub section: String,

    /// Cache backend type: http, or memory (lives for this one command only)
    #[arg(long = "type", global = true)]
    pub cache_type: Option<String>,

    /// Base URL of the remote store
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Highest zoom level written to the cache
    #[arg(long, global = true)]
    pub max_zoom: Option<u32>,

    /// Report rejected writes and deletes as errors
    #[arg(long, global = true)]
    pub strict_writes: bool,
}

/// Default config file location.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tilecache").join("config.ini"))
}

/// Merge config file options with command-line overrides.
///
/// An explicitly named config file must exist; the default one is optional.
pub fn resolve_options(args: &BackendArgs) -> Result<(String, CacheOptions), CliError> {
    let section = if args.section.is_empty() {
        DEFAULT_SECTION
    } else {
        args.section.as_str()
    };

    let mut options = match &args.config {
        Some(path) => CacheOptions::load_section(path, section)?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => load_default(&path, section)?,
            None => CacheOptions::new(),
        },
    };

    if let Some(url) = &args.url {
        options.insert("url", url);
    }
    if let Some(max_zoom) = args.max_zoom {
        options.insert("max_zoom", max_zoom);
    }
    if args.strict_writes {
        options.insert("strict_writes", true);
    }

    let cache_type = args
        .cache_type
        .clone()
        .or_else(|| options.string(KEY_TYPE).map(str::to_string))
        .ok_or_else(|| {
            CliError::Config(
                "No cache type given. Set 'type' in the config file or use --type".to_string(),
            )
        })?;

    Ok((cache_type, options))
}

fn load_default(path: &Path, section: &str) -> Result<CacheOptions, CliError> {
    debug!(path = %path.display(), "Loading default config file");
    Ok(CacheOptions::load_section(path, section)?)
}

/// Build the selected backend.
pub fn open_cache(
    registry: &BackendRegistry,
    args: &BackendArgs,
) -> Result<Box<dyn TileCache>, CliError> {
    let (cache_type, options) = resolve_options(args)?;
    Ok(registry.lookup(&cache_type, &options)?)
}
