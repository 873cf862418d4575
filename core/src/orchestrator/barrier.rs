//! Completion barrier over the worker tasks

use tokio::task::JoinHandle;

/// Blocks the orchestrator until every worker task has exited
///
/// A worker signals the barrier by finishing its task, which happens only
/// after its tally has been enqueued.
#[derive(Debug, Default)]
pub struct CompletionBarrier {
    handles: Vec<JoinHandle<()>>,
}

/// How the workers behind a barrier exited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BarrierSummary {
    /// Tasks that have exited (always equal to the number registered)
    pub exited: usize,

    /// Tasks that exited by panic
    pub panicked: usize,
}

impl CompletionBarrier {
    /// Create a barrier expecting `count` workers
    pub fn with_capacity(count: usize) -> Self {
        Self {
            handles: Vec::with_capacity(count),
        }
    }

    /// Register a spawned worker task
    pub fn register(&mut self, handle: JoinHandle<()>) {
        self.handles.push(handle);
    }

    /// Number of registered workers
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no worker is registered
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every registered worker to exit
    pub async fn wait(self) -> BarrierSummary {
        let mut summary = BarrierSummary::default();

        for (worker_id, handle) in self.handles.into_iter().enumerate() {
            match handle.await {
                Ok(()) => {}
                Err(e) if e.is_panic() => {
                    summary.panicked += 1;
                    tracing::error!(worker_id, "Worker task panicked");
                }
                Err(e) => {
                    tracing::error!(worker_id, error = %e, "Worker task cancelled");
                }
            }
            summary.exited += 1;
        }

        summary
    }
}
