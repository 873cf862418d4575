//! Orchestrator for siege lifecycle management
//!
//! The Orchestrator coordinates a complete siege:
//! - Spawning the worker pool
//! - Waiting on an external stop trigger
//! - Broadcasting the stop signal and waiting on the completion barrier
//! - Draining the tally channel and aggregating the result
//!
//! # Example
//!
//! ```ignore
//! use besiege_core::{CtrlC, OrchestratorBuilder, SiegeConfig};
//!
//! let orchestrator = OrchestratorBuilder::new(SiegeConfig::new("http://localhost:8080/"))
//!     .concurrency(10)
//!     .build()?;
//!
//! let outcome = orchestrator.run(CtrlC).await?;
//! ```

mod aggregator;
mod barrier;
mod builder;
mod executor;

pub use aggregator::{aggregate_tallies, Aggregate};
pub use barrier::{BarrierSummary, CompletionBarrier};
pub use builder::OrchestratorBuilder;
pub use executor::{Orchestrator, SiegeOutcome};
