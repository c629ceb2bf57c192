//! The tile cache contract.
//!
//! Every backend implements [`TileCache`], so callers can hold any backend as
//! `Box<dyn TileCache>` and never depend on where tiles are stored.
//!
//! # Hit and miss
//!
//! [`TileCache::get`] reports a miss as `Ok(None)`. Callers never need to
//! inspect errors to tell "not cached yet" apart from a failure.
//!
//! # Zoom-gated writes
//!
//! Backends carry a `max_zoom` option. [`TileCache::set`] for a key above it
//! is a silent no-op that returns `Ok(())`.

use thiserror::Error;

use crate::coord::TileKey;

/// Errors that can occur while building or using a cache backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The required `url` option is absent or empty.
    #[error("missing required option 'url'")]
    MissingUrl,

    /// An option is present but cannot be read as the expected type.
    #[error("invalid value '{value}' for option '{key}': {reason}")]
    InvalidOption {
        key: String,
        value: String,
        reason: String,
    },

    /// No backend is registered under this type name.
    #[error("unknown cache type '{0}'")]
    UnknownType(String),

    /// A backend is already registered under this type name.
    #[error("cache type '{0}' is already registered")]
    DuplicateType(String),

    /// The HTTP client could not be created.
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    /// The request did not complete (connection refused, timeout, ...).
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The response body could not be read.
    #[error("failed to read response from {url}: {reason}")]
    BodyRead { url: String, reason: String },

    /// The store answered with a status the operation does not accept.
    #[error("{method} {url} returned HTTP {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },
}

/// Tile cache interface.
///
/// Implementations must be `Send + Sync`: a constructed backend holds no
/// mutable state that needs coordination, so one instance can serve many
/// threads at once. Each call is a single blocking round trip to the store
/// and is never retried internally.
pub trait TileCache: Send + Sync {
    /// Reads a tile.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(data))` on a hit
    /// - `Ok(None)` on a miss
    /// - `Err(_)` if the store could not be reached or answered unexpectedly
    fn get(&self, key: &TileKey) -> Result<Option<Vec<u8>>, CacheError>;

    /// Stores a tile.
    ///
    /// Keys above the backend's `max_zoom` are ignored and return `Ok(())`.
    fn set(&self, key: &TileKey, value: &[u8]) -> Result<(), CacheError>;

    /// Removes a tile. Removing a tile that is not cached succeeds.
    fn purge(&self, key: &TileKey) -> Result<(), CacheError>;

    /// Highest zoom level this backend persists.
    fn max_zoom(&self) -> u32;
}

impl<T: TileCache + ?Sized> TileCache for Box<T> {
    fn get(&self, key: &TileKey) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).get(key)
    }

    fn set(&self, key: &TileKey, value: &[u8]) -> Result<(), CacheError> {
        (**self).set(key, value)
    }

    fn purge(&self, key: &TileKey) -> Result<(), CacheError> {
        (**self).purge(key)
    }

    fn max_zoom(&self) -> u32 {
        (**self).max_zoom()
    }
}
