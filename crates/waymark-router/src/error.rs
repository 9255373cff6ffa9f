//! Errors raised while registering patterns.

use http::Method;
use thiserror::Error;

/// A pattern or registration the multiplexer refuses.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A `{` placeholder segment is not closed by `}`.
    #[error("unterminated placeholder in pattern '{pattern}'")]
    UnterminatedPlaceholder {
        /// The offending pattern.
        pattern: String,
    },

    /// The `:regex` part of a placeholder does not compile.
    #[error("invalid constraint for '{param}' in pattern '{pattern}': {source}")]
    InvalidConstraint {
        /// The offending pattern.
        pattern: String,
        /// Placeholder name.
        param: String,
        /// Compiler error.
        #[source]
        source: regex::Error,
    },

    /// A placeholder constraint contains `/`, which never occurs inside a
    /// segment.
    #[error("constraint for '{param}' in pattern '{pattern}' can not match '/'")]
    ConstraintSpansSegments {
        /// The offending pattern.
        pattern: String,
        /// Placeholder name.
        param: String,
    },

    /// A `*name` segment is followed by more segments.
    #[error("wildcard must be the last segment in pattern '{pattern}'")]
    WildcardNotLast {
        /// The offending pattern.
        pattern: String,
    },

    /// The method is already registered for an equivalent pattern.
    #[error("route {method} '{pattern}' is already registered")]
    Duplicate {
        /// HTTP method.
        method: Method,
        /// The pattern being registered.
        pattern: String,
    },
}
