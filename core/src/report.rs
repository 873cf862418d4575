//! Human-readable and JSON siege reports

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SiegeConfig;
use crate::orchestrator::{Aggregate, SiegeOutcome};

/// Elapsed times below this are too short to divide by
const MIN_MEASURABLE_ELAPSED: Duration = Duration::from_millis(1);

/// Requests per second over `elapsed`
///
/// Returns 0.0 when `elapsed` is under one millisecond instead of dividing by
/// (nearly) zero.
pub fn throughput(total_requests: u64, elapsed: Duration) -> f64 {
    if elapsed < MIN_MEASURABLE_ELAPSED {
        return 0.0;
    }
    total_requests as f64 / elapsed.as_secs_f64()
}

/// Final report of one siege
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Endpoint that was targeted
    pub target_url: String,

    /// Number of workers
    pub concurrency: usize,

    /// Wall-clock start of the pool
    pub started_at: DateTime<Utc>,

    /// Pool start to full drain, in milliseconds
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,

    /// Summed worker tallies
    #[serde(flatten)]
    pub aggregate: Aggregate,

    /// Total requests
    pub total_requests: u64,

    /// Requests per second over the whole run
    pub requests_per_second: f64,
}

impl Report {
    /// Build the report for a finished siege
    pub fn new(config: &SiegeConfig, outcome: &SiegeOutcome) -> Self {
        let total_requests = outcome.aggregate.total_requests();

        Self {
            target_url: config.target_url.clone(),
            concurrency: config.concurrency,
            started_at: outcome.started_at,
            elapsed: outcome.elapsed,
            aggregate: outcome.aggregate,
            total_requests,
            requests_per_second: throughput(total_requests, outcome.elapsed),
        }
    }

    /// Share of requests that succeeded (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        self.aggregate.success_rate()
    }
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_millis() as u64)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);

        writeln!(f, "{rule}")?;
        writeln!(f, "   Siege Results")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "  Target:               {}", self.target_url)?;
        writeln!(f, "  Workers:              {}", self.concurrency)?;
        writeln!(
            f,
            "  Started:              {}",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(
            f,
            "  Elapsed:              {:.2} s",
            self.elapsed.as_secs_f64()
        )?;
        writeln!(f)?;
        writeln!(f, "  Requests:             {}", self.total_requests)?;
        writeln!(
            f,
            "  Successes:            {} ({:.1}%)",
            self.aggregate.total_successes,
            self.success_rate() * 100.0
        )?;
        writeln!(f, "  Failures:             {}", self.aggregate.total_failures)?;
        writeln!(
            f,
            "  Throughput:           {:.2} req/sec",
            self.requests_per_second
        )?;
        write!(f, "{rule}")
    }
}
