//! One-shot broadcast stop signal shared by the orchestrator and every worker

use std::sync::Arc;

use tokio::sync::watch;

/// Cooperative stop signal
///
/// Starts open and can be closed exactly once. Every clone observes the
/// transition, including clones created after it happened, so a worker that
/// checks late still sees the closed state.
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl StopSignal {
    /// Create a new, open signal
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Close the signal
    ///
    /// Returns `true` for the call that performed the transition and `false`
    /// for every later call. Closing again never reopens or re-notifies.
    pub fn close(&self) -> bool {
        self.tx.send_if_modified(|closed| {
            if *closed {
                false
            } else {
                *closed = true;
                true
            }
        })
    }

    /// Whether the signal has been closed
    pub fn is_closed(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the signal is closed
    ///
    /// Resolves immediately if it already is.
    pub async fn closed(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot observe a dropped channel.
        let _ = rx.wait_for(|closed| *closed).await;
    }

    /// Guard that closes the signal when dropped
    pub fn close_on_drop(&self) -> CloseOnDrop {
        CloseOnDrop {
            signal: self.clone(),
        }
    }
}

/// Closes its [`StopSignal`] when dropped
#[derive(Debug)]
#[must_use = "the signal is closed as soon as the guard is dropped"]
pub struct CloseOnDrop {
    signal: StopSignal,
}

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        if self.signal.close() {
            tracing::debug!("Stop signal closed on drop");
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
