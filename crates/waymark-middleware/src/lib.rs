//! # Waymark Middleware
//!
//! Handler-transform middleware for waymark routes.
//!
//! Every route handler is erased to a [`GenericHandler`] over
//! type-erased [`Payload`]s. A [`Middleware`] maps one generic handler to
//! another, and [`compose`] stacks a list of them around a route:
//!
//! ```text
//! request → m1 → m2 → … → handler
//! response ← m1 ← m2 ← … ←───┘
//! ```
//!
//! The first middleware registered is the outermost. A middleware that
//! returns an error without calling `next` stops the request; it can set a
//! status through [`RequestContext::set_status_code`] first.
//!
//! ## Example
//!
//! ```
//! use waymark_middleware::{compose, downcast_response, erase, middleware_fn, Payload};
//!
//! # tokio_test::block_on(async {
//! let handler = erase(|_ctx, n: u32| async move { Ok(n * 2) });
//! let log = middleware_fn(|ctx, req: Payload, next| async move {
//!     tracing::info!(path = ctx.path(), "handling");
//!     next(ctx, req).await
//! });
//!
//! let chain = compose(handler, &[log]);
//! let ctx = waymark_core::RequestContext::builder(
//!     http::Method::GET,
//!     "/double".parse().unwrap(),
//! )
//! .build();
//!
//! let out = chain(ctx, Box::new(21_u32)).await.unwrap();
//! assert_eq!(downcast_response::<u32>(out).unwrap(), 42);
//! # });
//! ```
//!
//! [`RequestContext::set_status_code`]: waymark_core::RequestContext::set_status_code

#![doc(html_root_url = "https://docs.rs/waymark-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod chain;
pub mod middleware;
mod trace;

pub use chain::{compose, downcast_response, erase};
pub use middleware::{
    handler_fn, middleware, middleware_fn, BoxFuture, GenericHandler, Middleware, Payload,
};
pub use trace::trace_requests;
