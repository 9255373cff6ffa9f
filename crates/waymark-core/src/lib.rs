//! # Waymark Core
//!
//! Core types shared by every waymark crate:
//!
//! - [`Record`] and [`FieldDescriptor`] - wire-named records with a static
//!   descriptor table, usually from `#[derive(Record)]`
//! - [`FieldValue`] and [`Nullable`] - what the binder can write into
//! - [`PathTemplate`] - a route pattern bound to its parameter record
//! - [`check_is_subset`] - request/parameter record compatibility
//! - [`RequestContext`] - per-request state, including the status override
//! - [`ConstructionError`] - everything that can go wrong while building a route

#![doc(html_root_url = "https://docs.rs/waymark-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Lets `#[derive(Record)]` expand inside this crate.
extern crate self as waymark_core;

mod context;
mod error;
mod html;
mod nullable;
mod record;
mod shape;
mod template;

pub use context::{RequestContext, RequestContextBuilder, RequestId};
pub use error::{ConstructionError, ConstructionResult};
pub use html::Html;
pub use nullable::Nullable;
pub use record::{
    Empty, FieldDescriptor, FieldKind, FieldValue, NullableField, Record, ScalarError,
};
pub use shape::check_is_subset;
pub use template::PathTemplate;
pub use waymark_macros::Record;
pub use waymark_router::Params;
