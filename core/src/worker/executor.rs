//! Worker request loop

use std::sync::Arc;

use crate::channel::TallySender;
use crate::client::{HttpClient, Outcome};
use crate::stop::StopSignal;

use super::tally::Tally;

/// Worker issues GET requests in a loop: check stop -> request -> count -> repeat
///
/// Workers are independent tokio tasks managed by the Orchestrator. They share
/// the HTTP client, the target URL and the stop signal, and each one reports a
/// single [`Tally`] when it exits.
pub struct Worker {
    /// Unique worker identifier
    id: usize,

    /// HTTP client (shared across workers via Arc)
    client: Arc<dyn HttpClient>,

    /// Endpoint to hit
    target_url: Arc<str>,

    /// Stop signal, checked before every attempt
    stop: StopSignal,

    /// Where the final tally goes
    tally_tx: TallySender,
}

impl Worker {
    /// Create a new worker
    pub fn new(
        id: usize,
        client: Arc<dyn HttpClient>,
        target_url: Arc<str>,
        stop: StopSignal,
        tally_tx: TallySender,
    ) -> Self {
        Self {
            id,
            client,
            target_url,
            stop,
            tally_tx,
        }
    }

    /// Run the worker loop until the stop signal closes
    ///
    /// An in-flight request is never cut short: the signal is only consulted
    /// between attempts. The tally is emitted when the loop ends, including
    /// when it ends by panic or task cancellation.
    pub async fn run(self) {
        let mut guard = TallyGuard::new(self.id, self.tally_tx);

        tracing::debug!(worker_id = self.id, "Worker started");

        loop {
            if self.stop.is_closed() {
                tracing::debug!(worker_id = self.id, "Worker observed stop signal");
                break;
            }

            let outcome = Outcome::classify(self.client.get(&self.target_url).await);
            match &outcome {
                Outcome::Success => {}
                Outcome::Status(status) => {
                    tracing::warn!(worker_id = self.id, status, "Unexpected response status");
                }
                Outcome::Transport(e) => {
                    tracing::warn!(worker_id = self.id, error = %e, "Request failed");
                }
            }
            guard.tally.record(&outcome);

            // A client that fails without ever suspending would otherwise hold
            // its runtime thread until the stop signal closes.
            tokio::task::yield_now().await;
        }

        guard.finish();
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("target_url", &self.target_url)
            .field("stopped", &self.stop.is_closed())
            .finish()
    }
}

/// Emits the tally exactly once, when dropped
///
/// Lives inside the worker future, so it is dropped on normal return, when a
/// panic is caught by the runtime, and when the task is aborted. In every case
/// that happens before the task's join handle resolves.
struct TallyGuard {
    worker_id: usize,
    tally: Tally,
    tx: TallySender,
    finished: bool,
}

impl TallyGuard {
    fn new(worker_id: usize, tx: TallySender) -> Self {
        Self {
            worker_id,
            tally: Tally::new(),
            tx,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for TallyGuard {
    fn drop(&mut self) {
        if self.finished {
            tracing::debug!(
                worker_id = self.worker_id,
                successes = self.tally.successes,
                failures = self.tally.failures,
                "Worker finished"
            );
        } else {
            tracing::warn!(
                worker_id = self.worker_id,
                successes = self.tally.successes,
                failures = self.tally.failures,
                "Worker exited abnormally, emitting partial tally"
            );
        }
        self.tx.emit(self.worker_id, self.tally);
    }
}
