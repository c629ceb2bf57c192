//! Backend registry.
//!
//! Maps a backend type name (as written in configuration) to the function
//! that builds it. The registry is an ordinary value: the process builds it
//! during startup, registers every backend it knows about, and then only
//! performs lookups.
//!
//! ```ignore
//! use tilecache::{BackendRegistry, CacheOptions, TileKey};
//!
//! let registry = BackendRegistry::with_builtin_backends();
//! let options = CacheOptions::new().with("url", "http://store.local");
//! let cache = registry.lookup("http", &options)?;
//! cache.set(&TileKey::new(5, 1, 1), &[0xAA])?;
//! ```

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::cache::{CacheError, TileCache};
use crate::config::CacheOptions;

/// Builds a backend from its options, validating them.
pub type Constructor = fn(&CacheOptions) -> Result<Box<dyn TileCache>, CacheError>;

/// Lookup table from backend type name to constructor.
#[derive(Default)]
pub struct BackendRegistry {
    constructors: HashMap<String, Constructor>,
}

impl BackendRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every backend compiled into this build.
    pub fn with_builtin_backends() -> Self {
        Self::with_backends(builtin_backends())
    }

    /// Creates a registry from a list of backends.
    ///
    /// A repeated name keeps its first constructor; the duplicate is logged
    /// and dropped.
    pub fn with_backends<I, S>(backends: I) -> Self
    where
        I: IntoIterator<Item = (S, Constructor)>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for (name, constructor) in backends {
            if let Err(e) = registry.register(name, constructor) {
                warn!(error = %e, "Ignoring cache backend");
            }
        }
        registry
    }

    /// Registers a backend under `type_name`.
    ///
    /// Registering a name twice fails with [`CacheError::DuplicateType`] and
    /// leaves the existing entry in place.
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        constructor: Constructor,
    ) -> Result<(), CacheError> {
        let type_name = type_name.into();
        if self.constructors.contains_key(&type_name) {
            return Err(CacheError::DuplicateType(type_name));
        }
        debug!(cache_type = %type_name, "Registered cache backend");
        self.constructors.insert(type_name, constructor);
        Ok(())
    }

    /// Builds the backend registered under `type_name`.
    ///
    /// Construction errors from the backend are returned unchanged.
    pub fn lookup(
        &self,
        type_name: &str,
        options: &CacheOptions,
    ) -> Result<Box<dyn TileCache>, CacheError> {
        let constructor = self
            .constructors
            .get(type_name)
            .ok_or_else(|| CacheError::UnknownType(type_name.to_string()))?;

        let cache = constructor(options)?;
        info!(cache_type = type_name, max_zoom = cache.max_zoom(), "Cache backend ready");
        Ok(cache)
    }

    /// Returns true if a backend is registered under `type_name`.
    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Every backend compiled into this build.
fn builtin_backends() -> Vec<(&'static str, Constructor)> {
    #[allow(unused_mut)]
    let mut backends: Vec<(&'static str, Constructor)> = vec![(
        crate::memory::CACHE_TYPE,
        crate::memory::MemoryCache::from_options as Constructor,
    )];

    #[cfg(feature = "http-cache")]
    backends.push((crate::http::CACHE_TYPE, crate::http::new_backend as Constructor));

    backends
}
