//! Per-worker outcome counts

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::client::Outcome;

/// Lifetime success/failure counts of one worker
///
/// Owned by its worker until emitted once on the tally channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Requests that completed with status 200
    pub successes: u64,

    /// Requests that failed at the transport level or returned another status
    pub failures: u64,
}

impl Tally {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one classified attempt
    pub fn record(&mut self, outcome: &Outcome) {
        if outcome.is_success() {
            self.record_success();
        } else {
            self.record_failure();
        }
    }

    /// Record a successful request
    pub fn record_success(&mut self) {
        self.successes += 1;
    }

    /// Record a failed request
    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    /// Total attempts (successes + failures)
    pub fn total(&self) -> u64 {
        self.successes + self.failures
    }

    /// Whether no request was attempted
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl Add for Tally {
    type Output = Tally;

    fn add(self, rhs: Tally) -> Tally {
        Tally {
            successes: self.successes + rhs.successes,
            failures: self.failures + rhs.failures,
        }
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Tally) {
        *self = *self + rhs;
    }
}

impl Sum for Tally {
    fn sum<I: Iterator<Item = Tally>>(iter: I) -> Tally {
        iter.fold(Tally::new(), Add::add)
    }
}

impl<'a> Sum<&'a Tally> for Tally {
    fn sum<I: Iterator<Item = &'a Tally>>(iter: I) -> Tally {
        iter.copied().sum()
    }
}
