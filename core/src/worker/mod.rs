//! Worker module for issuing load
//!
//! The Worker is the unit of load in besiege. Each one is a tokio task running
//! the loop **check stop -> GET -> classify -> count -> repeat**:
//!
//! 1. Checks the shared stop signal; exits once it is closed
//! 2. Sends one GET to the target through the shared HTTP client
//! 3. Classifies the outcome (200 is a success, everything else a failure)
//! 4. Counts it in a private [`Tally`]
//!
//! There is no pacing and no iteration cap. Against an unreachable target a
//! worker fails as fast as the transport lets it until it is stopped.
//!
//! When the loop ends the tally is sent to the orchestrator, exactly once.
//!
//! # Example
//!
//! ```ignore
//! use besiege_core::worker::WorkerBuilder;
//!
//! let worker = WorkerBuilder::new(0)
//!     .client(client)
//!     .target_url("http://localhost:8080/")
//!     .stop_signal(stop.clone())
//!     .tally_tx(tally_tx.clone())
//!     .build()?;
//!
//! tokio::spawn(worker.run());
//! ```

mod builder;
mod executor;
mod tally;

pub use builder::WorkerBuilder;
pub use executor::Worker;
pub use tally::Tally;

#[cfg(test)]
mod tests;
