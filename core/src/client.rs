//! HTTP client seam used by workers
//!
//! Workers only ever see [`HttpClient`]. The production implementation wraps
//! a single `reqwest::Client`; tests substitute in-memory clients.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Status code counted as a success
pub const STATUS_OK: u16 = 200;

/// Issues GET requests on behalf of workers
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform one GET request and return the response status
    ///
    /// The whole exchange is bounded by the client's configured timeout.
    async fn get(&self, url: &str) -> std::result::Result<u16, TransportError>;
}

/// Request could not complete at the transport level
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Deadline expired during connect or response
    #[error("request timed out")]
    Timeout,

    /// Connection refused, DNS failure, unreachable host
    #[error("connection failed: {0}")]
    Connect(String),

    /// Anything else the transport reported
    #[error("transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // a connect timeout is both; report it as the timeout it is
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Classified result of one request attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Completed with status 200
    Success,

    /// Completed with any other status
    Status(u16),

    /// Did not complete
    Transport(TransportError),
}

impl Outcome {
    /// Classify the result of [`HttpClient::get`]
    pub fn classify(result: std::result::Result<u16, TransportError>) -> Self {
        match result {
            Ok(STATUS_OK) => Outcome::Success,
            Ok(status) => Outcome::Status(status),
            Err(err) => Outcome::Transport(err),
        }
    }

    /// Whether this attempt counts as a success
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// [`HttpClient`] backed by reqwest
///
/// One instance is shared by every worker so connections are pooled.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Build a client whose connect and total deadlines are both `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> std::result::Result<u16, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();

        // Read the body so the connection goes back to the pool. A body that
        // fails mid-read means the exchange did not complete.
        response.bytes().await?;

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_ok() {
        assert_eq!(Outcome::classify(Ok(200)), Outcome::Success);
        assert!(Outcome::classify(Ok(200)).is_success());
    }

    #[test]
    fn test_classify_other_statuses() {
        for status in [201, 204, 301, 404, 500, 503] {
            let outcome = Outcome::classify(Ok(status));
            assert_eq!(outcome, Outcome::Status(status));
            assert!(!outcome.is_success());
        }
    }

    #[test]
    fn test_classify_transport_errors() {
        let outcome = Outcome::classify(Err(TransportError::Timeout));
        assert_eq!(outcome, Outcome::Transport(TransportError::Timeout));
        assert!(!outcome.is_success());

        let outcome = Outcome::classify(Err(TransportError::Connect("refused".into())));
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::new(Duration::from_millis(250)).is_ok());
    }
}
