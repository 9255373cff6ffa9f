//! Chain assembly and typed erasure.
//!
//! [`erase`] turns a typed handler into a [`GenericHandler`]; the only
//! downcast of the request happens there, at the innermost layer.
//! [`compose`] wraps it in middleware so the first one listed runs first.

use std::any::type_name;
use std::future::Future;
use std::sync::Arc;

use anyhow::anyhow;
use waymark_core::RequestContext;

use crate::middleware::{handler_fn, GenericHandler, Middleware, Payload};

/// Wraps `handler` with `middlewares`.
///
/// The first middleware is the outermost: it sees the request first and
/// the response last.
///
/// ```
/// use waymark_middleware::{compose, handler_fn, middleware_fn, Payload};
///
/// let handler = handler_fn(|_ctx, req| async move { Ok(req) });
/// let noop = middleware_fn(|ctx, req: Payload, next| async move { next(ctx, req).await });
///
/// let chain = compose(handler, &[noop.clone(), noop]);
/// # let _ = chain;
/// ```
#[must_use]
pub fn compose(handler: GenericHandler, middlewares: &[Middleware]) -> GenericHandler {
    middlewares
        .iter()
        .rev()
        .fold(handler, |inner, middleware| middleware(inner))
}

/// Erases a typed handler.
///
/// The returned handler downcasts its payload to `Req`, calls `handler` and
/// boxes the `Resp`. A payload of any other type is an error.
pub fn erase<Req, Resp, F, Fut>(handler: F) -> GenericHandler
where
    Req: Send + 'static,
    Resp: Send + 'static,
    F: Fn(RequestContext, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Resp>> + Send + 'static,
{
    let handler = Arc::new(handler);
    handler_fn(move |ctx, payload: Payload| {
        let handler = Arc::clone(&handler);
        async move {
            let req = payload
                .downcast::<Req>()
                .map_err(|_| anyhow!("request payload is not a {}", type_name::<Req>()))?;
            let resp = handler(ctx, *req).await?;
            Ok(Box::new(resp) as Payload)
        }
    })
}

/// Recovers the typed response from a chain's output.
///
/// # Errors
///
/// Fails if a middleware replaced the response with another type.
pub fn downcast_response<Resp: 'static>(payload: Payload) -> anyhow::Result<Resp> {
    payload
        .downcast::<Resp>()
        .map(|resp| *resp)
        .map_err(|_| anyhow!("response payload is not a {}", type_name::<Resp>()))
}
