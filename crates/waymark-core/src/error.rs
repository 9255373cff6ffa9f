//! Registration-time errors.
//!
//! Everything here is a programmer error: a malformed template, a record
//! that cannot represent its route's parameters, or a request record whose
//! shape does not cover the parameter record. They surface once, when a
//! route is built, and are expected to abort startup.

use thiserror::Error;
use waymark_router::RouteError;

/// Result type alias using [`ConstructionError`].
pub type ConstructionResult<T> = Result<T, ConstructionError>;

/// A route that cannot be built.
#[derive(Debug, Error)]
pub enum ConstructionError {
    /// A `{` placeholder is never closed.
    #[error("missing closing bracket in template '{template}'")]
    UnterminatedBrace {
        /// The template being compiled.
        template: String,
    },

    /// A parameter record field has no wire annotation.
    #[error("missing wire name on field '{field}' of type '{record}'")]
    MissingWireName {
        /// Field identifier.
        field: &'static str,
        /// Record type name.
        record: &'static str,
    },

    /// A template placeholder has no matching field.
    #[error("missing path param '{param}' in struct '{record}'")]
    MissingPathParam {
        /// Placeholder name.
        param: String,
        /// Record type name.
        record: &'static str,
    },

    /// A parameter record field has a type the binder cannot fill.
    #[error("unrecognized field type '{kind}' of field '{field}' in struct '{record}'")]
    OpaqueParamField {
        /// Field identifier.
        field: &'static str,
        /// Field type as written.
        kind: &'static str,
        /// Record type name.
        record: &'static str,
    },

    /// The request record lacks a parameter record field.
    #[error("missing field '{field}' in struct '{record}'")]
    MissingField {
        /// Field identifier.
        field: &'static str,
        /// Request record type name.
        record: &'static str,
    },

    /// Same field, different type.
    #[error("mismatch type of field '{field}' in struct '{record}'")]
    TypeMismatch {
        /// Field identifier.
        field: &'static str,
        /// Request record type name.
        record: &'static str,
    },

    /// Same field, different wire annotation.
    #[error("mismatch wire name of field '{field}' in struct '{record}'")]
    WireMismatch {
        /// Field identifier.
        field: &'static str,
        /// Request record type name.
        record: &'static str,
    },

    /// The multiplexer refused the pattern.
    #[error(transparent)]
    Route(#[from] RouteError),
}
