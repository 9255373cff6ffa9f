//! Generic handlers and the middleware type.
//!
//! Routes store their typed handlers behind one uniform signature,
//! [`GenericHandler`], taking and returning type-erased payloads. A
//! [`Middleware`] turns one generic handler into another, so it can run
//! code before and after the handler, change the request context, or
//! fail without calling the handler at all.
//!
//! # Example
//!
//! ```
//! use waymark_middleware::{middleware_fn, Payload};
//!
//! let logging = middleware_fn(|ctx, req: Payload, next| async move {
//!     println!("-> {}", ctx.path());
//!     let resp = next(ctx, req).await;
//!     println!("<- ok: {}", resp.is_ok());
//!     resp
//! });
//! # let _ = logging;
//! ```

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use waymark_core::RequestContext;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A type-erased request or response value.
pub type Payload = Box<dyn Any + Send>;

/// A handler over type-erased payloads.
pub type GenericHandler =
    Arc<dyn Fn(RequestContext, Payload) -> BoxFuture<'static, anyhow::Result<Payload>> + Send + Sync>;

/// A transform from one generic handler to another.
pub type Middleware = Arc<dyn Fn(GenericHandler) -> GenericHandler + Send + Sync>;

/// Wraps an async function as a [`GenericHandler`].
pub fn handler_fn<F, Fut>(f: F) -> GenericHandler
where
    F: Fn(RequestContext, Payload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Payload>> + Send + 'static,
{
    Arc::new(
        move |ctx: RequestContext, req: Payload| -> BoxFuture<'static, anyhow::Result<Payload>> {
            Box::pin(f(ctx, req))
        },
    )
}

/// Wraps a handler transform as a [`Middleware`].
pub fn middleware<F>(f: F) -> Middleware
where
    F: Fn(GenericHandler) -> GenericHandler + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Builds a [`Middleware`] from an async function receiving the next handler.
///
/// `f` decides whether and how to call `next`. Returning an error without
/// calling it stops the request there.
pub fn middleware_fn<F, Fut>(f: F) -> Middleware
where
    F: Fn(RequestContext, Payload, GenericHandler) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Payload>> + Send + 'static,
{
    let f = Arc::new(f);
    Arc::new(move |next: GenericHandler| -> GenericHandler {
        let f = Arc::clone(&f);
        Arc::new(
            move |ctx: RequestContext, req: Payload| -> BoxFuture<'static, anyhow::Result<Payload>> {
                Box::pin(f(ctx, req, Arc::clone(&next)))
            },
        )
    })
}
