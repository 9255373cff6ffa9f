//! Telemetry error types.

use thiserror::Error;

/// Errors from setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level or filter directive does not parse.
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// The directive that was rejected.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}

/// Result alias for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
