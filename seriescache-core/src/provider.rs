//! Series providers — the blocking network-fetch primitive.
//!
//! The `SeriesProvider` trait abstracts over the remote source so the cache
//! can be exercised in tests with stub providers that count or script their
//! responses. The production implementation is a plain blocking HTTP GET:
//! a 2xx response body is raw CSV text, anything else is a hard failure.
//! There are no retries — a miss that fails surfaces immediately to the
//! caller of `get`.

use crate::error::DataError;
use std::time::Duration;

/// Trait for dataset sources.
///
/// Implementations return the raw CSV text for a symbol's source URL, or
/// fail. The cache layer sits above this trait — providers don't know about
/// the backing store.
pub trait SeriesProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the raw dataset text for a symbol from its source URL.
    fn fetch(&self, symbol: &str, url: &str) -> Result<String, DataError>;
}

/// Blocking HTTP provider.
pub struct HttpProvider {
    client: reqwest::blocking::Client,
}

impl HttpProvider {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("seriescache/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }
}

impl Default for HttpProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesProvider for HttpProvider {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, symbol: &str, url: &str) -> Result<String, DataError> {
        let resp = self.client.get(url).send().map_err(|e| DataError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {status} for {symbol}"),
            });
        }

        resp.text().map_err(|e| DataError::Fetch {
            url: url.to_string(),
            reason: format!("reading body for {symbol}: {e}"),
        })
    }
}
