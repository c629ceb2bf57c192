//! Remote HTTP store backend.
//!
//! Persists tiles to any HTTP server that accepts the following requests:
//!
//! | Operation | Request                         | Outcome                          |
//! |-----------|---------------------------------|----------------------------------|
//! | get       | `GET {url}/{z}/{x}/{y}`         | 200 = hit, any other status = miss |
//! | set       | `POST {url}/{z}/{x}/{y}` + body | any response = stored            |
//! | purge     | `DELETE {url}/{z}/{x}/{y}`      | any response = removed           |
//!
//! With `strict_writes = true`, a non-2xx answer to `set` or `purge` (other
//! than 404 on delete) is reported as [`CacheError::Status`].
//!
//! # Options
//!
//! - `url` (required): base address of the store
//! - `max_zoom` (default [`MAX_ZOOM`]): tiles above this zoom are never written
//! - `timeout_secs` (default 30, 0 = none): per-request timeout
//! - `strict_writes` (default false)

mod client;

pub use client::{is_success, HttpClient, HttpResponse, ReqwestClient, DEFAULT_TIMEOUT_SECS};

#[cfg(test)]
pub use client::tests::{MockHttpClient, RecordedRequest};

use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{CacheError, TileCache};
use crate::config::CacheOptions;
use crate::coord::{TileKey, MAX_ZOOM};

/// Registry name for this backend.
pub const CACHE_TYPE: &str = "http";

/// Option: base address of the remote store.
pub const KEY_URL: &str = "url";
/// Option: highest zoom level written to the store.
pub const KEY_MAX_ZOOM: &str = "max_zoom";
/// Option: request timeout in seconds.
pub const KEY_TIMEOUT_SECS: &str = "timeout_secs";
/// Option: report rejected writes and deletes as errors.
pub const KEY_STRICT_WRITES: &str = "strict_writes";

/// Content type sent with tile payloads.
pub const CONTENT_TYPE: &str = "binary/octet-stream";

/// Validated settings for [`HttpCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCacheConfig {
    /// Base address, without a trailing slash.
    pub url: String,
    /// Writes above this zoom are skipped.
    pub max_zoom: u32,
    /// Request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Treat non-2xx answers to writes and deletes as errors.
    pub strict_writes: bool,
}

impl HttpCacheConfig {
    /// Creates a config with defaults for everything but the base URL.
    pub fn new(url: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            max_zoom: u32::from(MAX_ZOOM),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            strict_writes: false,
        }
    }

    /// Set the maximum zoom that is written.
    pub fn with_max_zoom(mut self, max_zoom: u32) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    /// Enable or disable strict write acknowledgement.
    pub fn with_strict_writes(mut self, strict: bool) -> Self {
        self.strict_writes = strict;
        self
    }

    /// Reads and validates backend options.
    ///
    /// Performs no network I/O.
    pub fn from_options(options: &CacheOptions) -> Result<Self, CacheError> {
        let url = options
            .string(KEY_URL)
            .map(|u| u.trim_end_matches('/'))
            .filter(|u| !u.is_empty())
            .ok_or(CacheError::MissingUrl)?;

        let invalid_url = |reason: String| CacheError::InvalidOption {
            key: KEY_URL.to_string(),
            value: url.to_string(),
            reason,
        };

        // Tile paths are appended to the base, so it must end in a path.
        let parsed = reqwest::Url::parse(url).map_err(|e| invalid_url(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid_url(format!("unsupported scheme '{}'", parsed.scheme())));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid_url("query and fragment are not allowed".to_string()));
        }

        let max_zoom = options.uint(KEY_MAX_ZOOM, u32::from(MAX_ZOOM))?;
        let timeout_secs = options.uint(KEY_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS as u32)?;
        let strict_writes = options.bool(KEY_STRICT_WRITES, false)?;

        Ok(Self {
            url: url.to_string(),
            max_zoom,
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(u64::from(timeout_secs))),
            strict_writes,
        })
    }
}

/// Registry constructor for the HTTP backend.
pub fn new_backend(options: &CacheOptions) -> Result<Box<dyn TileCache>, CacheError> {
    let config = HttpCacheConfig::from_options(options)?;
    let client = ReqwestClient::with_timeout(config.timeout)?;
    Ok(Box::new(HttpCache::new(config, client)))
}

/// Tile cache backed by a remote HTTP store.
///
/// Holds no tile data: every call is one request to the store.
pub struct HttpCache<C: HttpClient = ReqwestClient> {
    config: HttpCacheConfig,
    client: C,
}

impl<C: HttpClient> HttpCache<C> {
    /// Creates a backend from validated settings and a transport.
    pub fn new(config: HttpCacheConfig, client: C) -> Self {
        Self { config, client }
    }

    /// Full URL of the object holding `key`.
    pub fn tile_url(&self, key: &TileKey) -> String {
        key.path_under(&self.config.url)
    }

    /// Applies the acknowledgement policy to a write or delete status.
    fn acknowledge(&self, method: &'static str, url: String, status: u16) -> Result<(), CacheError> {
        if is_success(status) {
            return Ok(());
        }
        if self.config.strict_writes {
            return Err(CacheError::Status {
                method,
                url,
                status,
            });
        }
        warn!(method, url = %url, status, "Store rejected request; ignoring");
        Ok(())
    }
}

impl<C: HttpClient> TileCache for HttpCache<C> {
    fn get(&self, key: &TileKey) -> Result<Option<Vec<u8>>, CacheError> {
        let url = self.tile_url(key);
        let response = self.client.get(&url)?;

        match response.status {
            200 => {
                debug!(url = %url, bytes = response.body.len(), "Cache hit");
                Ok(Some(response.body))
            }
            status if status >= 500 => {
                warn!(url = %url, status, "Store error on read; treating as miss");
                Ok(None)
            }
            status => {
                debug!(url = %url, status, "Cache miss");
                Ok(None)
            }
        }
    }

    fn set(&self, key: &TileKey, value: &[u8]) -> Result<(), CacheError> {
        if u32::from(key.z) > self.config.max_zoom {
            debug!(key = %key, max_zoom = self.config.max_zoom, "Skipping write above max zoom");
            return Ok(());
        }

        let url = self.tile_url(key);
        let status = self.client.post(&url, CONTENT_TYPE, value)?;
        debug!(url = %url, bytes = value.len(), status, "Stored tile");
        self.acknowledge("POST", url, status)
    }

    fn purge(&self, key: &TileKey) -> Result<(), CacheError> {
        let url = self.tile_url(key);
        let status = self.client.delete(&url)?;
        debug!(url = %url, status, "Purged tile");

        // Deleting an absent tile is not a failure.
        if status == 404 || status == 410 {
            return Ok(());
        }
        self.acknowledge("DELETE", url, status)
    }

    fn max_zoom(&self) -> u32 {
        self.config.max_zoom
    }
}
