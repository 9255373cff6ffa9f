//! Binding error types.

use http::StatusCode;
use thiserror::Error;

/// A request whose data cannot be bound into its record.
///
/// Every variant is the client's fault, so the router answers with a 4xx.
///
/// # Example
///
/// ```rust
/// use waymark_extract::BindError;
/// use http::StatusCode;
///
/// let err = BindError::Parse { field: "age", value: "AB".to_string() };
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.to_string(), "can not parse value 'AB' into field 'age'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The raw value does not fit the field's type.
    #[error("can not parse value '{value}' into field '{field}'")]
    Parse {
        /// Field identifier.
        field: &'static str,
        /// The offending raw value.
        value: String,
    },

    /// The field's type has no string mapping.
    #[error("unrecognized field type '{kind}' of field '{field}'")]
    UnrecognizedFieldType {
        /// Field identifier.
        field: &'static str,
        /// Field type or kind.
        kind: String,
    },

    /// The body is not valid JSON for the record; carries the decoder message.
    #[error("{0}")]
    Body(String),

    /// The body exceeds the configured limit.
    #[error("payload too large: max {limit} bytes, got {actual} bytes")]
    PayloadTooLarge {
        /// Configured maximum.
        limit: usize,
        /// Received size.
        actual: usize,
    },
}

impl BindError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Parse { .. } | Self::UnrecognizedFieldType { .. } | Self::Body(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    /// Returns a stable code for logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "INVALID_PARAMETER",
            Self::UnrecognizedFieldType { .. } => "UNRECOGNIZED_FIELD_TYPE",
            Self::Body(_) => "DESERIALIZATION_FAILED",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
        }
    }
}
