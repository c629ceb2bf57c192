//! Logging setup.
//!
//! Library code only emits `tracing` events. Binaries call [`init_logging`]
//! once at startup to install a formatting subscriber.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable that overrides the default filter.
pub const LOG_ENV: &str = "TILECACHE_LOG";

/// Installs a stderr subscriber filtered by `TILECACHE_LOG`, falling back to
/// `default_level` (e.g. `"info"` or `"tilecache=debug"`).
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
