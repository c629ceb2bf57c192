//! In-process tile cache backend.
//!
//! Keeps tiles in a `HashMap` behind a `parking_lot::RwLock`. Useful for
//! tests and for running the tile pipeline without a remote store. Contents
//! are lost when the process exits.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::cache::{CacheError, TileCache};
use crate::config::CacheOptions;
use crate::coord::{TileKey, MAX_ZOOM};

/// Registry name for this backend.
pub const CACHE_TYPE: &str = "memory";

/// Option: highest zoom level written to the cache.
pub const KEY_MAX_ZOOM: &str = "max_zoom";

/// In-memory tile cache.
#[derive(Debug)]
pub struct MemoryCache {
    tiles: RwLock<HashMap<TileKey, Vec<u8>>>,
    max_zoom: u32,
}

impl MemoryCache {
    /// Creates an empty cache that persists tiles up to `max_zoom`.
    pub fn new(max_zoom: u32) -> Self {
        Self {
            tiles: RwLock::new(HashMap::new()),
            max_zoom,
        }
    }

    /// Registry constructor.
    pub fn from_options(options: &CacheOptions) -> Result<Box<dyn TileCache>, CacheError> {
        let max_zoom = options.uint(KEY_MAX_ZOOM, u32::from(MAX_ZOOM))?;
        Ok(Box::new(Self::new(max_zoom)))
    }

    /// Number of cached tiles.
    pub fn len(&self) -> usize {
        self.tiles.read().len()
    }

    /// Returns true if no tiles are cached.
    pub fn is_empty(&self) -> bool {
        self.tiles.read().is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(u32::from(MAX_ZOOM))
    }
}

impl TileCache for MemoryCache {
    fn get(&self, key: &TileKey) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.tiles.read().get(key).cloned())
    }

    fn set(&self, key: &TileKey, value: &[u8]) -> Result<(), CacheError> {
        if u32::from(key.z) > self.max_zoom {
            debug!(key = %key, max_zoom = self.max_zoom, "Skipping write above max zoom");
            return Ok(());
        }
        self.tiles.write().insert(*key, value.to_vec());
        Ok(())
    }

    fn purge(&self, key: &TileKey) -> Result<(), CacheError> {
        self.tiles.write().remove(key);
        Ok(())
    }

    fn max_zoom(&self) -> u32 {
        self.max_zoom
    }
}
