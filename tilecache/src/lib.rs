//! Tilecache - pluggable storage for map tiles
//!
//! Tiles are opaque byte payloads addressed by zoom/column/row
//! ([`TileKey`]). Storage backends implement the [`TileCache`] contract and
//! are selected by name through a [`BackendRegistry`]:
//!
//! - `memory`: in-process map ([`memory::MemoryCache`])
//! - `http`: remote HTTP store ([`http::HttpCache`], `http-cache` feature)
//!
//! ```ignore
//! use tilecache::{BackendRegistry, CacheOptions, TileKey};
//!
//! let registry = BackendRegistry::with_builtin_backends();
//! let options = CacheOptions::new()
//!     .with("url", "http://store.local")
//!     .with("max_zoom", 10);
//! let cache = registry.lookup("http", &options)?;
//!
//! cache.set(&TileKey::new(5, 1, 1), &[0xAA])?;
//! assert_eq!(cache.get(&TileKey::new(5, 1, 1))?, Some(vec![0xAA]));
//! ```

pub mod cache;
pub mod config;
pub mod coord;
#[cfg(feature = "http-cache")]
pub mod http;
pub mod logging;
pub mod memory;
pub mod registry;

pub use cache::{CacheError, TileCache};
pub use config::{CacheOptions, ConfigError};
pub use coord::{KeyParseError, TileKey, MAX_ZOOM};
pub use registry::{BackendRegistry, Constructor};
