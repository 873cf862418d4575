//! Siege configuration types

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Default number of concurrent workers
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Largest accepted worker count (the tally channel's capacity limit)
pub const MAX_CONCURRENCY: usize = tokio::sync::Semaphore::MAX_PERMITS;

/// Default per-request deadline
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(1000);

/// Siege configuration
///
/// Built once at startup, validated before any worker exists, and only read
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiegeConfig {
    /// Endpoint every worker sends GET requests to
    pub target_url: String,

    /// Number of concurrent workers
    pub concurrency: usize,

    /// Deadline covering connect and response of a single request
    #[serde(rename = "request_timeout_ms", with = "duration_ms")]
    pub request_timeout: Duration,
}

impl SiegeConfig {
    /// Create a config for the given target with default concurrency and timeout
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the number of workers
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.target_url.trim();
        if url.is_empty() {
            return Err(ConfigError::EmptyUrl);
        }

        let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "{url}: unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(
                "concurrency must be at least 1".into(),
            ));
        }

        // The tally channel holds one slot per worker
        if self.concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::InvalidConcurrency(format!(
                "concurrency must be at most {MAX_CONCURRENCY}"
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "request timeout must be positive".into(),
            ));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Target URL missing or blank
    #[error("Invalid url: target url must not be empty")]
    EmptyUrl,

    /// Target URL is not an absolute http(s) URL
    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    /// Invalid concurrency value
    #[error("Invalid concurrency: {0}")]
    InvalidConcurrency(String),

    /// Invalid request timeout
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
