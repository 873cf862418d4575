//! Orchestrator execution logic

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::channel::tally_channel;
use crate::client::HttpClient;
use crate::config::SiegeConfig;
use crate::error::Result;
use crate::stop::StopSignal;
use crate::trigger::StopTrigger;
use crate::worker::{Worker, WorkerBuilder};

use super::aggregator::{aggregate_tallies, Aggregate};
use super::barrier::CompletionBarrier;

/// What a finished siege produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiegeOutcome {
    /// Summed tallies of all workers
    pub aggregate: Aggregate,

    /// Pool start to full drain
    pub elapsed: Duration,

    /// Wall-clock time the pool was started
    pub started_at: DateTime<Utc>,
}

/// Orchestrator manages the siege lifecycle
///
/// Spawns the worker pool, waits for the stop trigger, stops and drains the
/// pool, and aggregates the tallies. An orchestrator runs once.
pub struct Orchestrator {
    /// Validated configuration
    pub(crate) config: SiegeConfig,

    /// HTTP client (shared across workers)
    pub(crate) client: Arc<dyn HttpClient>,

    /// Stop signal shared with every worker
    pub(crate) stop: StopSignal,
}

impl Orchestrator {
    /// Create a new orchestrator
    ///
    /// Use `OrchestratorBuilder`, which validates the configuration first.
    pub(crate) fn new(config: SiegeConfig, client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            client,
            stop: StopSignal::new(),
        }
    }

    /// Get a handle to the stop signal
    ///
    /// Closing it stops the pool just like the trigger would, except that
    /// `run` still waits for its trigger before draining.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Get the siege configuration
    pub fn config(&self) -> &SiegeConfig {
        &self.config
    }

    /// Run the siege until `trigger` fires
    ///
    /// The pool is always stopped and fully drained before this returns, even
    /// when the trigger itself fails. If the future is dropped before it
    /// completes, the stop signal is closed and the workers wind down on
    /// their own; their tallies are discarded.
    pub async fn run<T: StopTrigger>(self, mut trigger: T) -> Result<SiegeOutcome> {
        let concurrency = self.config.concurrency;
        let target_url: Arc<str> = Arc::from(self.config.target_url.as_str());

        let started_at = Utc::now();
        let start = Instant::now();

        let (tally_tx, mut tally_rx) = tally_channel(concurrency);

        let workers = (0..concurrency)
            .map(|worker_id| {
                WorkerBuilder::new(worker_id)
                    .client(Arc::clone(&self.client))
                    .target_url(Arc::clone(&target_url))
                    .stop_signal(self.stop.clone())
                    .tally_tx(tally_tx.clone())
                    .build()
            })
            .collect::<Result<Vec<Worker>>>()?;

        // Workers hold the only senders from here on
        drop(tally_tx);

        tracing::info!(
            concurrency,
            target_url = %self.config.target_url,
            request_timeout_ms = self.config.request_timeout.as_millis() as u64,
            "Starting siege"
        );

        // Dropping this future must not leave the pool running
        let _stop_on_drop = self.stop.close_on_drop();

        let mut barrier = CompletionBarrier::with_capacity(concurrency);
        for worker in workers {
            barrier.register(tokio::spawn(worker.run()));
        }

        let triggered = trigger.wait().await;
        if let Err(e) = &triggered {
            tracing::error!(trigger = trigger.name(), error = %e, "Stop trigger failed, stopping anyway");
        }

        tracing::info!(concurrency, trigger = trigger.name(), "Stopping workers");
        if !self.stop.close() {
            tracing::debug!("Stop signal was already closed");
        }

        let summary = barrier.wait().await;
        let elapsed = start.elapsed();

        let tallies = tally_rx.drain(concurrency);
        let aggregate = aggregate_tallies(&tallies);

        tracing::info!(
            workers = aggregate.workers,
            panicked = summary.panicked,
            successes = aggregate.total_successes,
            failures = aggregate.total_failures,
            elapsed_ms = elapsed.as_millis() as u64,
            "Siege completed"
        );

        triggered?;

        Ok(SiegeOutcome {
            aggregate,
            elapsed,
            started_at,
        })
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("stopped", &self.stop.is_closed())
            .finish()
    }
}
