//! # Waymark Extract
//!
//! Moves request data into records.
//!
//! | Item | Role |
//! |------|------|
//! | [`bind`] | Writes raw strings into the wire-named fields of a record |
//! | [`bind_route`] | [`bind`] over a route's path values and query string |
//! | [`ValueSource`] | Lookup by wire name; [`QuerySource`], [`PathSource`], [`RouteSource`] |
//! | [`decode_json`] | JSON body decoding |
//! | [`BindError`] | Everything that makes a request unbindable |
//!
//! ## Conversion rules
//!
//! - text fields take the value verbatim
//! - signed fields parse base-10 as `i64`, then narrow to the field width
//! - unsigned fields parse base-10 as `u64`, then narrow
//! - `Nullable` fields are marked present, then the payload is parsed
//! - anything else is an [`BindError::UnrecognizedFieldType`]
//!
//! An empty value is the same as a missing one: the field keeps its value.

#![doc(html_root_url = "https://docs.rs/waymark-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bind;
mod error;
mod json;
mod source;

pub use bind::{bind, bind_route};
pub use error::BindError;
pub use json::{check_body_limit, decode_json};
pub use source::{PathSource, QuerySource, RouteSource, ValueSource};
