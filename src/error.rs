//! Error types for sheercloud
//!
//! The service itself has no structured error channel: failures are
//! reported in response bodies and the parsers stay lenient (see
//! [`crate::protocol`]). The variants here cover what can go wrong on the
//! client side of that contract.

use crate::types::Operation;
use thiserror::Error;

/// Result type alias for sheercloud operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for sheercloud
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g. "location")
        key: Option<String>,
    },

    /// A second operation was started while one is still pending.
    ///
    /// The client performs exactly one network operation at a time; wait
    /// for the pending operation to complete (or cancel it) before starting
    /// the next one.
    #[error("cannot start {requested}: {outstanding} still in flight")]
    RequestInFlight {
        /// The operation the caller tried to start
        requested: Operation,
        /// The operation currently outstanding
        outstanding: Operation,
    },

    /// The request produced no response at all (connect failure, timeout,
    /// stream cut mid-body). Responses with non-success statuses are not
    /// errors; their bodies flow through the lenient parsers.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL construction failed
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The pending operation was cancelled via
    /// [`cancel`](crate::CloudClient::cancel)
    #[error("operation cancelled")]
    Cancelled,
}
