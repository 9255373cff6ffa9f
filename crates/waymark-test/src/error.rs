//! Test error types.

use thiserror::Error;

/// Errors from building a test request or reading its response.
#[derive(Debug, Error)]
pub enum TestError {
    /// The URI, a header, or the body could not be built.
    #[error("request build error: {0}")]
    RequestBuild(String),

    /// The response body is not what the accessor expected.
    #[error("body read error: {0}")]
    BodyRead(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
