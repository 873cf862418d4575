//! Builder pattern for Orchestrator construction

use std::sync::Arc;
use std::time::Duration;

use crate::client::{HttpClient, ReqwestClient};
use crate::config::SiegeConfig;
use crate::error::Result;

use super::executor::Orchestrator;

/// Builder for creating an Orchestrator with validated configuration
///
/// # Example
///
/// ```ignore
/// let orchestrator = OrchestratorBuilder::new(SiegeConfig::new("http://localhost:8080/"))
///     .concurrency(10)
///     .request_timeout(Duration::from_millis(500))
///     .build()?;
///
/// let outcome = orchestrator.run(CtrlC).await?;
/// ```
pub struct OrchestratorBuilder {
    config: SiegeConfig,
    client: Option<Arc<dyn HttpClient>>,
}

impl OrchestratorBuilder {
    /// Create a builder for the given configuration
    pub fn new(config: SiegeConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Set the number of workers
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Set the per-request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Use a custom HTTP client instead of reqwest
    ///
    /// The client is responsible for enforcing the request timeout.
    pub fn client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Validate the configuration and build the orchestrator
    ///
    /// # Errors
    ///
    /// Returns a configuration error if validation fails; nothing else is
    /// created in that case. Returns a client error if the default HTTP
    /// client cannot be constructed.
    pub fn build(self) -> Result<Orchestrator> {
        self.config.validate()?;

        let client = match self.client {
            Some(client) => client,
            None => Arc::new(ReqwestClient::new(self.config.request_timeout)?),
        };

        Ok(Orchestrator::new(self.config, client))
    }
}
