//! Derive macro for waymark records.
//!
//! `#[derive(Record)]` generates a static field-descriptor table and
//! indexed field accessors, so binding request data into a struct and
//! rendering it back into a URL need no runtime type inspection.
//!
//! # Example
//!
//! ```rust,ignore
//! use waymark_core::{Nullable, Record};
//!
//! #[derive(Debug, Default, Record)]
//! struct UserRequest {
//!     #[wire("user_id")]
//!     user_id: i64,
//!     #[wire("age,omitempty")]
//!     age: Nullable<u32>,
//!     #[wire("id", scalar)]
//!     owner: OwnerId,
//!     tags: Vec<String>,
//! }
//! ```
//!
//! # Attributes
//!
//! - `#[wire("name")]` / `#[wire("name,modifier")]` on a field sets its wire
//!   name. The full string, modifiers included, is kept for shape checks.
//! - `#[wire("name", scalar)]` exposes a field whose type implements
//!   `FieldValue` but is not one of the built-in scalars.
//! - `#[record(crate = "path")]` on the struct changes the path used to
//!   reach `waymark_core`, e.g. `waymark::core` when only the facade is a
//!   dependency.
//!
//! `String`, the primitive integers and `Nullable<..>` of those are
//! recognized from the written type. Everything else is opaque: it keeps
//! its descriptor but cannot be bound or rendered.

mod parse;
mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `waymark_core::Record` for a struct with named fields.
#[proc_macro_derive(Record, attributes(wire, record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand_record(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
