//! Typed route registration and dispatch.
//!
//! Each registration method ties a [`PathTemplate`] to a typed handler.
//! Per request the installed endpoint:
//!
//! 1. decodes the JSON body into the request record (body routes only)
//! 2. binds path and query values over it, so path values win
//! 3. runs the middleware chain around the handler
//! 4. renders the result, or an error envelope
//!
//! ```rust
//! use serde::Serialize;
//! use waymark_core::{PathTemplate, Record, RequestContext};
//! use waymark_server::Router;
//!
//! #[derive(Debug, Default, Record)]
//! struct UserParams {
//!     #[wire("user_id")]
//!     user_id: i64,
//! }
//!
//! #[derive(Serialize)]
//! struct User {
//!     id: i64,
//! }
//!
//! let users = PathTemplate::<UserParams>::new("/api/users/{user_id}").unwrap();
//!
//! let router = Router::new();
//! router
//!     .json_get(&users, |_ctx: RequestContext, req: UserParams| async move {
//!         Ok(User { id: req.user_id })
//!     })
//!     .unwrap();
//! assert_eq!(router.route_count(), 1);
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderValue, ALLOW};
use http::{Method, Request, StatusCode};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use waymark_core::{
    check_is_subset, ConstructionResult, Html, PathTemplate, Record, RequestContext,
};
use waymark_extract::{bind_route, check_body_limit, decode_json, BindError};
use waymark_middleware::{compose, downcast_response, erase, BoxFuture, GenericHandler, Middleware};
use waymark_router::Mux;

use crate::config::DEFAULT_MAX_BODY_BYTES;
use crate::response::{error_response, html_response, json_response, merge_headers, HttpResponse};

/// What the multiplexer stores per method and pattern.
type BoxedEndpoint =
    Arc<dyn Fn(RequestContext, Bytes) -> BoxFuture<'static, HttpResponse> + Send + Sync>;

type Decoder<Req> = fn(&[u8]) -> Result<Req, BindError>;
type Renderer<Resp> = fn(StatusCode, Resp) -> HttpResponse;

/// Registers typed routes and dispatches requests to them.
///
/// Clones share the route table. [`Router::with_middlewares`] gives a router
/// over the same table with a longer middleware list; routes capture the
/// list they were registered with.
#[derive(Clone)]
pub struct Router {
    mux: Arc<RwLock<Mux<BoxedEndpoint>>>,
    middlewares: Vec<Middleware>,
    max_body_bytes: usize,
}

impl Router {
    /// Creates a router with no routes and no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mux: Arc::new(RwLock::new(Mux::new())),
            middlewares: Vec::new(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Returns a router sharing this route table, with `middlewares`
    /// appended after the current ones.
    ///
    /// The current router is left unchanged.
    #[must_use]
    pub fn with_middlewares(&self, middlewares: impl IntoIterator<Item = Middleware>) -> Self {
        let mut router = self.clone();
        router.middlewares.extend(middlewares);
        router
    }

    /// Returns a router sharing this route table with another body limit
    /// for the routes it registers.
    #[must_use]
    pub fn with_max_body_bytes(&self, limit: usize) -> Self {
        let mut router = self.clone();
        router.max_body_bytes = limit;
        router
    }

    /// Number of middlewares new routes are wrapped in.
    #[must_use]
    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    /// Number of registered patterns.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.mux.read().len()
    }

    /// Registers a JSON `GET` route.
    ///
    /// # Errors
    ///
    /// A [`ConstructionError`](waymark_core::ConstructionError) if `Req`
    /// does not cover `P` or the pattern clashes with an existing route.
    pub fn json_get<P, Req, Resp, F, Fut>(
        &self,
        template: &PathTemplate<P>,
        handler: F,
    ) -> ConstructionResult<()>
    where
        P: Record,
        Req: Record,
        Resp: Serialize + Send + 'static,
        F: Fn(RequestContext, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Resp>> + Send + 'static,
    {
        self.register(Method::GET, template, None, render_json::<Resp>, handler)
    }

    /// Registers a JSON `DELETE` route. The body is ignored.
    ///
    /// # Errors
    ///
    /// See [`Router::json_get`].
    pub fn json_delete<P, Req, Resp, F, Fut>(
        &self,
        template: &PathTemplate<P>,
        handler: F,
    ) -> ConstructionResult<()>
    where
        P: Record,
        Req: Record,
        Resp: Serialize + Send + 'static,
        F: Fn(RequestContext, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Resp>> + Send + 'static,
    {
        self.register(Method::DELETE, template, None, render_json::<Resp>, handler)
    }

    /// Registers a JSON `POST` route that decodes the body into `Req`.
    ///
    /// # Errors
    ///
    /// See [`Router::json_get`].
    pub fn json_post<P, Req, Resp, F, Fut>(
        &self,
        template: &PathTemplate<P>,
        handler: F,
    ) -> ConstructionResult<()>
    where
        P: Record,
        Req: Record + DeserializeOwned,
        Resp: Serialize + Send + 'static,
        F: Fn(RequestContext, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Resp>> + Send + 'static,
    {
        self.register(
            Method::POST,
            template,
            Some(decode_json::<Req>),
            render_json::<Resp>,
            handler,
        )
    }

    /// Registers a JSON `PUT` route that decodes the body into `Req`.
    ///
    /// # Errors
    ///
    /// See [`Router::json_get`].
    pub fn json_put<P, Req, Resp, F, Fut>(
        &self,
        template: &PathTemplate<P>,
        handler: F,
    ) -> ConstructionResult<()>
    where
        P: Record,
        Req: Record + DeserializeOwned,
        Resp: Serialize + Send + 'static,
        F: Fn(RequestContext, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Resp>> + Send + 'static,
    {
        self.register(
            Method::PUT,
            template,
            Some(decode_json::<Req>),
            render_json::<Resp>,
            handler,
        )
    }

    /// Registers a JSON `PATCH` route that decodes the body into `Req`.
    ///
    /// # Errors
    ///
    /// See [`Router::json_get`].
    pub fn json_patch<P, Req, Resp, F, Fut>(
        &self,
        template: &PathTemplate<P>,
        handler: F,
    ) -> ConstructionResult<()>
    where
        P: Record,
        Req: Record + DeserializeOwned,
        Resp: Serialize + Send + 'static,
        F: Fn(RequestContext, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Resp>> + Send + 'static,
    {
        self.register(
            Method::PATCH,
            template,
            Some(decode_json::<Req>),
            render_json::<Resp>,
            handler,
        )
    }

    /// Registers an HTML `GET` route. Errors still render as JSON.
    ///
    /// # Errors
    ///
    /// See [`Router::json_get`].
    pub fn html_get<P, Req, F, Fut>(
        &self,
        template: &PathTemplate<P>,
        handler: F,
    ) -> ConstructionResult<()>
    where
        P: Record,
        Req: Record,
        F: Fn(RequestContext, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Html>> + Send + 'static,
    {
        self.register(Method::GET, template, None, html_response, handler)
    }

    /// Registers an HTML `POST` route that decodes the body into `Req`.
    ///
    /// # Errors
    ///
    /// See [`Router::json_get`].
    pub fn html_post<P, Req, F, Fut>(
        &self,
        template: &PathTemplate<P>,
        handler: F,
    ) -> ConstructionResult<()>
    where
        P: Record,
        Req: Record + DeserializeOwned,
        F: Fn(RequestContext, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Html>> + Send + 'static,
    {
        self.register(
            Method::POST,
            template,
            Some(decode_json::<Req>),
            html_response,
            handler,
        )
    }

    fn register<P, Req, Resp, F, Fut>(
        &self,
        method: Method,
        template: &PathTemplate<P>,
        decode: Option<Decoder<Req>>,
        render: Renderer<Resp>,
        handler: F,
    ) -> ConstructionResult<()>
    where
        P: Record,
        Req: Record,
        Resp: Send + 'static,
        F: Fn(RequestContext, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Resp>> + Send + 'static,
    {
        check_is_subset::<Req, P>()?;

        let endpoint = Arc::new(Endpoint {
            template: template.clone(),
            decode,
            render,
            chain: compose(erase(handler), &self.middlewares),
            max_body_bytes: self.max_body_bytes,
        });
        let boxed: BoxedEndpoint = Arc::new(
            move |ctx: RequestContext, body: Bytes| -> BoxFuture<'static, HttpResponse> {
                let endpoint = Arc::clone(&endpoint);
                Box::pin(async move { endpoint.handle(ctx, body).await })
            },
        );

        self.mux.write().route(method.clone(), template.pattern(), boxed)?;

        tracing::info!(
            method = %method,
            pattern = template.pattern(),
            request = Req::type_name(),
            middlewares = self.middlewares.len(),
            "route registered"
        );
        Ok(())
    }

    /// Serves one request.
    ///
    /// Unknown paths get a 404 envelope. A known path without a route for
    /// the method gets 405 with an `Allow` header.
    pub async fn dispatch(&self, request: Request<Bytes>) -> HttpResponse {
        let (parts, body) = request.into_parts();

        let lookup = {
            let mux = self.mux.read();
            match mux.match_path(parts.uri.path()) {
                None => Lookup::NotFound,
                Some((methods, params)) => match methods.handler(&parts.method) {
                    Some(endpoint) => Lookup::Found(Arc::clone(endpoint), params),
                    None => Lookup::MethodNotAllowed(methods.allowed_methods()),
                },
            }
        };

        match lookup {
            Lookup::Found(endpoint, params) => {
                let ctx = RequestContext::builder(parts.method, parts.uri)
                    .headers(parts.headers)
                    .params(params)
                    .build();
                tracing::debug!(
                    request_id = %ctx.request_id(),
                    method = %ctx.method(),
                    path = ctx.path(),
                    "dispatching request"
                );
                endpoint(ctx, body).await
            }
            Lookup::NotFound => {
                tracing::debug!(method = %parts.method, path = parts.uri.path(), "no route");
                error_response(StatusCode::NOT_FOUND, "not found")
            }
            Lookup::MethodNotAllowed(allowed) => {
                tracing::debug!(method = %parts.method, path = parts.uri.path(), "method not allowed");
                let mut response =
                    error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
                let allow = allowed
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                if let Ok(value) = HeaderValue::from_str(&allow) {
                    response.headers_mut().insert(ALLOW, value);
                }
                response
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.route_count())
            .field("middlewares", &self.middlewares.len())
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

enum Lookup {
    Found(BoxedEndpoint, waymark_router::Params),
    NotFound,
    MethodNotAllowed(Vec<Method>),
}

/// A registered route with its types still known.
struct Endpoint<P, Req, Resp> {
    template: PathTemplate<P>,
    decode: Option<Decoder<Req>>,
    render: Renderer<Resp>,
    chain: GenericHandler,
    max_body_bytes: usize,
}

impl<P, Req, Resp> Endpoint<P, Req, Resp>
where
    P: Record,
    Req: Record,
    Resp: Send + 'static,
{
    async fn handle(&self, ctx: RequestContext, body: Bytes) -> HttpResponse {
        let mut req = match self.decode {
            None => Req::default(),
            Some(decode) => {
                match check_body_limit(body.len(), self.max_body_bytes).and_then(|()| decode(&body))
                {
                    Ok(req) => req,
                    Err(e) => return reject(&ctx, &e),
                }
            }
        };

        if let Err(e) = bind_route(&mut req, &self.template, ctx.params(), ctx.query()) {
            return reject(&ctx, &e);
        }

        let outcome = (self.chain)(ctx.clone(), Box::new(req))
            .await
            .and_then(downcast_response::<Resp>);

        let mut response = match outcome {
            Ok(resp) => (self.render)(ctx.status_override().unwrap_or(StatusCode::OK), resp),
            Err(e) => {
                let status = ctx
                    .status_override()
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    tracing::error!(request_id = %ctx.request_id(), status = status.as_u16(), error = %e, "handler failed");
                } else {
                    tracing::warn!(request_id = %ctx.request_id(), status = status.as_u16(), error = %e, "request refused");
                }
                error_response(status, &e.to_string())
            }
        };
        merge_headers(&mut response, ctx.response_headers());
        response
    }
}

fn reject(ctx: &RequestContext, error: &BindError) -> HttpResponse {
    tracing::warn!(
        request_id = %ctx.request_id(),
        code = error.error_code(),
        error = %error,
        "request rejected"
    );
    error_response(error.status_code(), &error.to_string())
}

fn render_json<Resp: Serialize>(status: StatusCode, resp: Resp) -> HttpResponse {
    json_response(status, &resp)
}
