//! Server errors.

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

/// Errors from configuring or running the server.
///
/// Per-request failures never show up here; they become error responses.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The bind address does not parse.
    #[error("invalid address '{addr}': {source}")]
    InvalidAddress {
        /// The configured address.
        addr: String,
        /// Parser error.
        source: AddrParseError,
    },

    /// The listener could not be bound.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// The address that was tried.
        addr: SocketAddr,
        /// I/O error from the OS.
        source: std::io::Error,
    },

    /// The configuration document is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O error while serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
