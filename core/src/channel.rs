//! Tally channel between workers and the orchestrator
//!
//! Capacity equals the worker count and each worker sends exactly once, so a
//! send can never find the buffer full.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

use crate::worker::Tally;

/// Create a tally channel with room for `capacity` tallies
pub fn tally_channel(capacity: usize) -> (TallySender, TallyReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (TallySender { tx }, TallyReceiver { rx })
}

/// Sending half, one clone per worker
#[derive(Debug, Clone)]
pub struct TallySender {
    tx: mpsc::Sender<Tally>,
}

impl TallySender {
    /// Enqueue a worker's final tally without blocking
    ///
    /// Returns `false` if the tally could not be enqueued.
    pub fn emit(&self, worker_id: usize, tally: Tally) -> bool {
        match self.tx.try_send(tally) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::error!(worker_id, "Tally channel full, tally dropped");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::error!(worker_id, "Tally channel closed, tally dropped");
                false
            }
        }
    }
}

/// Receiving half, owned by the orchestrator
#[derive(Debug)]
pub struct TallyReceiver {
    rx: mpsc::Receiver<Tally>,
}

impl TallyReceiver {
    /// Take every queued tally without blocking
    ///
    /// Meant to be called once all workers have exited: by then every tally is
    /// queued and every sender dropped. A count different from `expected` is
    /// logged, never waited for.
    pub fn drain(&mut self, expected: usize) -> Vec<Tally> {
        let mut tallies = Vec::with_capacity(expected);
        let disconnected = loop {
            match self.rx.try_recv() {
                Ok(tally) => tallies.push(tally),
                Err(TryRecvError::Empty) => break false,
                Err(TryRecvError::Disconnected) => break true,
            }
        };

        if !disconnected {
            tracing::warn!(
                received = tallies.len(),
                "Tally channel drained while senders are still alive"
            );
        }
        if tallies.len() != expected {
            tracing::error!(
                expected,
                received = tallies.len(),
                "Tally count does not match worker count"
            );
        }

        tallies
    }
}
