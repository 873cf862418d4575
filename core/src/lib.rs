//! besiege-core: worker pool lifecycle for the besiege HTTP load generator
//!
//! This crate provides everything between a validated configuration and a
//! final report:
//!
//! - Configuration and validation
//! - The one-shot stop signal and external stop triggers
//! - The HTTP client seam and outcome classification
//! - Workers, the tally channel and the completion barrier
//! - The orchestrator, aggregation and the report model
//!
//! # Example
//!
//! ```no_run
//! use besiege_core::{CtrlC, Report, SiegeConfig};
//!
//! # async fn example() -> besiege_core::Result<()> {
//! let config = SiegeConfig::new("http://localhost:8080/").with_concurrency(10);
//! let outcome = besiege_core::run(config.clone(), CtrlC).await?;
//! println!("{}", Report::new(&config, &outcome));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod stop;
pub mod trigger;
pub mod worker;

pub use client::{HttpClient, Outcome, ReqwestClient, TransportError};
pub use config::{ConfigError, SiegeConfig};
pub use error::{Error, Result};
pub use orchestrator::{Aggregate, Orchestrator, OrchestratorBuilder, SiegeOutcome};
pub use report::Report;
pub use stop::{CloseOnDrop, StopSignal};
pub use trigger::{CtrlC, Deadline, Manual, ManualHandle, StopTrigger};
pub use worker::{Tally, Worker, WorkerBuilder};

/// Validate `config`, run a siege with the reqwest client until `trigger`
/// fires, and return the aggregated outcome
pub async fn run<T: StopTrigger>(config: SiegeConfig, trigger: T) -> Result<SiegeOutcome> {
    OrchestratorBuilder::new(config).build()?.run(trigger).await
}
