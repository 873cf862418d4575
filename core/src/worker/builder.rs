//! Builder pattern for Worker construction

use crate::channel::TallySender;
use crate::client::HttpClient;
use crate::error::{Error, Result};
use crate::stop::StopSignal;

use super::executor::Worker;

use std::sync::Arc;

/// Builder for creating Worker instances
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(0)
///     .client(client)
///     .target_url(url)
///     .stop_signal(stop.clone())
///     .tally_tx(tx.clone())
///     .build()?;
/// ```
pub struct WorkerBuilder {
    id: usize,
    client: Option<Arc<dyn HttpClient>>,
    target_url: Option<Arc<str>>,
    stop: Option<StopSignal>,
    tally_tx: Option<TallySender>,
}

impl WorkerBuilder {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            client: None,
            target_url: None,
            stop: None,
            tally_tx: None,
        }
    }

    /// Set the HTTP client
    pub fn client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the target URL
    pub fn target_url(mut self, url: impl Into<Arc<str>>) -> Self {
        self.target_url = Some(url.into());
        self
    }

    /// Set the stop signal
    pub fn stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Set the tally channel sender
    pub fn tally_tx(mut self, tx: TallySender) -> Self {
        self.tally_tx = Some(tx);
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if any required field is missing.
    pub fn build(self) -> Result<Worker> {
        let client = self.client.ok_or(Error::MissingComponent("client"))?;
        let target_url = self
            .target_url
            .ok_or(Error::MissingComponent("target_url"))?;
        let stop = self.stop.ok_or(Error::MissingComponent("stop_signal"))?;
        let tally_tx = self.tally_tx.ok_or(Error::MissingComponent("tally_tx"))?;

        Ok(Worker::new(self.id, client, target_url, stop, tally_tx))
    }
}
