//! External stop triggers
//!
//! The orchestrator blocks on exactly one trigger after the pool is started.
//! A trigger knows nothing about workers: it only reports that a stop was
//! requested.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::{Error, Result};

/// Event source the orchestrator waits on before stopping the pool
#[async_trait]
pub trait StopTrigger: Send {
    /// Short label used in logs
    fn name(&self) -> &str;

    /// Block until a stop is requested
    async fn wait(&mut self) -> Result<()>;
}

/// Process interrupt (Ctrl+C / SIGINT)
#[derive(Debug, Default, Clone, Copy)]
pub struct CtrlC;

#[async_trait]
impl StopTrigger for CtrlC {
    fn name(&self) -> &str {
        "ctrl-c"
    }

    async fn wait(&mut self) -> Result<()> {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| Error::Trigger(format!("failed to listen for Ctrl+C: {e}")))?;
        tracing::info!("Received Ctrl+C, initiating shutdown");
        Ok(())
    }
}

/// Fires once the given delay has elapsed
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    after: Duration,
}

impl Deadline {
    /// Fire after `after`
    pub fn after(after: Duration) -> Self {
        Self { after }
    }
}

#[async_trait]
impl StopTrigger for Deadline {
    fn name(&self) -> &str {
        "deadline"
    }

    async fn wait(&mut self) -> Result<()> {
        tokio::time::sleep(self.after).await;
        tracing::info!(after_ms = self.after.as_millis() as u64, "Deadline reached");
        Ok(())
    }
}

/// Trigger fired by hand from another task
///
/// Dropping the [`ManualHandle`] without firing counts as a stop request, so
/// a run can never outlive whoever controls it.
#[derive(Debug)]
pub struct Manual {
    rx: oneshot::Receiver<()>,
}

/// Firing side of a [`Manual`] trigger
#[derive(Debug)]
pub struct ManualHandle {
    tx: oneshot::Sender<()>,
}

impl Manual {
    /// Create a trigger and the handle that fires it
    pub fn new() -> (Self, ManualHandle) {
        let (tx, rx) = oneshot::channel();
        (Self { rx }, ManualHandle { tx })
    }
}

impl ManualHandle {
    /// Request the stop
    pub fn fire(self) {
        let _ = self.tx.send(());
    }
}

#[async_trait]
impl StopTrigger for Manual {
    fn name(&self) -> &str {
        "manual"
    }

    async fn wait(&mut self) -> Result<()> {
        if (&mut self.rx).await.is_err() {
            tracing::debug!("Manual trigger handle dropped, treating as stop request");
        }
        Ok(())
    }
}
