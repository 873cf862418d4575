//! Result aggregation from multiple workers

use serde::{Deserialize, Serialize};

use crate::worker::Tally;

/// Element-wise sum of every worker's tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    /// Number of tallies that were summed
    pub workers: usize,

    /// Total successful requests
    pub total_successes: u64,

    /// Total failed requests
    pub total_failures: u64,
}

impl Aggregate {
    /// Get the total number of requests (successes + failures)
    pub fn total_requests(&self) -> u64 {
        self.total_successes + self.total_failures
    }

    /// Get the success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let total = self.total_requests();
        if total > 0 {
            self.total_successes as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Get the failure rate (0.0 - 1.0)
    ///
    /// Zero when nothing was attempted.
    pub fn failure_rate(&self) -> f64 {
        let total = self.total_requests();
        if total > 0 {
            self.total_failures as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Aggregate the tallies drained from the tally channel
pub fn aggregate_tallies(tallies: &[Tally]) -> Aggregate {
    let sum: Tally = tallies.iter().sum();

    Aggregate {
        workers: tallies.len(),
        total_successes: sum.successes,
        total_failures: sum.failures,
    }
}
