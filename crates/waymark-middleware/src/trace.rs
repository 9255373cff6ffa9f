//! Request tracing middleware.
//!
//! Runs the rest of the chain inside a `request` span carrying the request
//! ID, method and path, and logs how the request ended.

use tracing::Instrument;
use waymark_core::RequestContext;

use crate::middleware::{middleware_fn, Middleware, Payload};

/// Returns a middleware that traces each request.
///
/// Successful requests log at debug level. Failures log at warn level
/// together with the status override, if one was set.
#[must_use]
pub fn trace_requests() -> Middleware {
    middleware_fn(|ctx: RequestContext, req: Payload, next| {
        let span = tracing::info_span!(
            "request",
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
        );

        async move {
            tracing::debug!("request started");
            let result = next(ctx.clone(), req).await;
            let elapsed_ms = u64::try_from(ctx.elapsed().as_millis()).unwrap_or(u64::MAX);

            match &result {
                Ok(_) => tracing::debug!(elapsed_ms, "request completed"),
                Err(error) => tracing::warn!(
                    elapsed_ms,
                    status = ?ctx.status_override(),
                    error = %error,
                    "request failed"
                ),
            }
            result
        }
        .instrument(span)
    })
}
