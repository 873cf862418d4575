//! Error types for besiege-core

use thiserror::Error;

use crate::config::ConfigError;

/// Core error type
///
/// Only startup problems end up here. Failed requests are folded into a
/// worker's [`Tally`](crate::worker::Tally) and never surface as errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration rejected during validation
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed
    #[error("client error: {0}")]
    Client(String),

    /// The stop trigger source failed
    #[error("stop trigger error: {0}")]
    Trigger(String),

    /// A builder was finalized without a required component
    #[error("missing required component: {0}")]
    MissingComponent(&'static str),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
