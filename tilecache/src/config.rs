//! Backend configuration options.
//!
//! [`CacheOptions`] is a flat string map with typed accessors. Backends read
//! their options once during construction and keep the validated values.
//!
//! Options usually come from an INI file section:
//!
//! ```ini
//! [cache]
//! type = http
//! url = http://tiles.internal:8080/cache
//! max_zoom = 14
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use ini::{Ini, Properties};
use thiserror::Error;

use crate::cache::CacheError;

/// Option naming the backend type in a config section.
pub const KEY_TYPE: &str = "type";

/// Errors loading options from a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or parsed.
    #[error("failed to load config file {path}: {reason}")]
    Load { path: String, reason: String },

    /// The requested section is not in the file.
    #[error("config file {path} has no [{section}] section")]
    MissingSection { path: String, section: String },
}

/// Key/value options for one cache backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheOptions {
    values: BTreeMap<String, String>,
}

impl CacheOptions {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option, replacing any previous value for `key`.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets an option in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.values.insert(key.into(), value.to_string());
    }

    /// Builds options from an INI section.
    pub fn from_properties(props: &Properties) -> Self {
        let values = props
            .iter()
            .map(|(k, v)| (k.to_string(), v.trim().to_string()))
            .collect();
        Self { values }
    }

    /// Loads one section of an INI file.
    pub fn load_section(path: &Path, section: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let props = ini
            .section(Some(section))
            .ok_or_else(|| ConfigError::MissingSection {
                path: path.display().to_string(),
                section: section.to_string(),
            })?;

        Ok(Self::from_properties(props))
    }

    /// Returns the raw value for `key`, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the value for `key` if it is set and non-empty.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Reads a non-negative integer, falling back to `default` when absent.
    ///
    /// A value that is present but not a non-negative integer is an error.
    pub fn uint(&self, key: &str, default: u32) -> Result<u32, CacheError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| CacheError::InvalidOption {
                key: key.to_string(),
                value: raw.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Reads a boolean, falling back to `default` when absent.
    pub fn bool(&self, key: &str, default: bool) -> Result<bool, CacheError> {
        let Some(raw) = self.get(key) else {
            return Ok(default);
        };

        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(CacheError::InvalidOption {
                key: key.to_string(),
                value: raw.to_string(),
                reason: "expected true or false".to_string(),
            }),
        }
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for CacheOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (k, v) in iter {
            options.insert(k, v);
        }
        options
    }
}
