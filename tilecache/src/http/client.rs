//! HTTP client abstraction for testability

use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Status line and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body. Only populated for `200 OK`.
    pub body: Vec<u8>,
}

/// Returns true for 2xx statuses.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests. Every method performs exactly
/// one request. `Err` is returned only when no response was received or
/// the body could not be read; any status code is a completed request.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    fn get(&self, url: &str) -> Result<HttpResponse, CacheError>;

    /// Performs an HTTP POST request carrying `body`, returning the status.
    fn post(&self, url: &str, content_type: &str, body: &[u8]) -> Result<u16, CacheError>;

    /// Performs an HTTP DELETE request, returning the status.
    fn delete(&self, url: &str) -> Result<u16, CacheError>;
}

impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    fn get(&self, url: &str) -> Result<HttpResponse, CacheError> {
        (**self).get(url)
    }

    fn post(&self, url: &str, content_type: &str, body: &[u8]) -> Result<u16, CacheError> {
        (**self).post(url, content_type, body)
    }

    fn delete(&self, url: &str) -> Result<u16, CacheError> {
        (**self).delete(url)
    }
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, CacheError> {
        Self::with_timeout(Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)))
    }

    /// Creates a new ReqwestClient with a custom timeout.
    ///
    /// `None` disables the timeout entirely.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, CacheError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> CacheError {
    CacheError::Transport {
        url: url.to_string(),
        reason: e.to_string(),
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse, CacheError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| transport_error(url, e))?;

        let status = response.status().as_u16();
        if status != reqwest::StatusCode::OK.as_u16() {
            return Ok(HttpResponse {
                status,
                body: Vec::new(),
            });
        }

        let body = response.bytes().map_err(|e| CacheError::BodyRead {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }

    fn post(&self, url: &str, content_type: &str, body: &[u8]) -> Result<u16, CacheError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body.to_vec())
            .send()
            .map_err(|e| transport_error(url, e))?;

        Ok(response.status().as_u16())
    }

    fn delete(&self, url: &str) -> Result<u16, CacheError> {
        let response = self
            .client
            .delete(url)
            .send()
            .map_err(|e| transport_error(url, e))?;

        Ok(response.status().as_u16())
    }
}
