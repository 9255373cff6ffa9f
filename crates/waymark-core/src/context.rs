//! Request context types.
//!
//! The [`RequestContext`] carries per-request state through the middleware
//! chain and into handlers, including the status override middleware can
//! set before failing a request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use waymark_router::Params;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps log lines for one request easy to
/// correlate.
///
/// # Example
///
/// ```
/// use waymark_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// State written by middleware and handlers, read when the response is built.
#[derive(Debug, Default)]
struct ResponseState {
    status_override: Option<StatusCode>,
    headers: HeaderMap,
}

/// Per-request context that flows through the middleware chain.
///
/// Cloning is cheap. Clones share the response state, so a status set by a
/// middleware is visible to the router after the chain returns. A context
/// belongs to a single request.
///
/// # Example
///
/// ```
/// use http::{Method, StatusCode};
/// use waymark_core::RequestContext;
///
/// let ctx = RequestContext::builder(Method::GET, "/api/users/1".parse().unwrap()).build();
/// let observer = ctx.clone();
///
/// ctx.set_status_code(StatusCode::FORBIDDEN);
/// assert_eq!(observer.status_override(), Some(StatusCode::FORBIDDEN));
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    method: Method,
    uri: Uri,
    headers: Arc<HeaderMap>,
    params: Arc<Params>,
    started_at: Instant,
    response: Arc<Mutex<ResponseState>>,
}

impl RequestContext {
    /// Starts building a context for `method` and `uri`.
    #[must_use]
    pub fn builder(method: Method, uri: Uri) -> RequestContextBuilder {
        RequestContextBuilder {
            request_id: None,
            method,
            uri,
            headers: HeaderMap::new(),
            params: Params::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the raw query string, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a request header as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the raw path values captured by the multiplexer.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Returns one raw path value.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Time since the request entered the router.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Overrides the status used for the response.
    pub fn set_status_code(&self, status: StatusCode) {
        self.response.lock().status_override = Some(status);
    }

    /// Returns the status override, if one was set.
    #[must_use]
    pub fn status_override(&self) -> Option<StatusCode> {
        self.response.lock().status_override
    }

    /// Adds a header to the response.
    pub fn insert_response_header(&self, name: HeaderName, value: HeaderValue) {
        self.response.lock().headers.insert(name, value);
    }

    /// Returns a copy of the headers added so far.
    #[must_use]
    pub fn response_headers(&self) -> HeaderMap {
        self.response.lock().headers.clone()
    }
}

/// Builder for [`RequestContext`].
#[derive(Debug)]
pub struct RequestContextBuilder {
    request_id: Option<RequestId>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    params: Params,
}

impl RequestContextBuilder {
    /// Uses a known request ID instead of generating one.
    #[must_use]
    pub fn request_id(mut self, id: RequestId) -> Self {
        self.request_id = Some(id);
        self
    }

    /// Sets the request headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the captured path values.
    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Builds the context.
    #[must_use]
    pub fn build(self) -> RequestContext {
        RequestContext {
            request_id: self.request_id.unwrap_or_default(),
            method: self.method,
            uri: self.uri,
            headers: Arc::new(self.headers),
            params: Arc::new(self.params),
            started_at: Instant::now(),
            response: Arc::new(Mutex::new(ResponseState::default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(uri: &str) -> RequestContext {
        RequestContext::builder(Method::GET, uri.parse().unwrap()).build()
    }

    #[test]
    fn test_request_id_is_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }

    #[test]
    fn test_uri_accessors() {
        let ctx = ctx("/api/users/1?age=3");
        assert_eq!(ctx.path(), "/api/users/1");
        assert_eq!(ctx.query(), Some("age=3"));
        assert_eq!(ctx.method(), Method::GET);
    }

    #[test]
    fn test_params_and_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-tenant", HeaderValue::from_static("acme"));
        let mut params = Params::new();
        params.push("user_id", "42");

        let ctx = RequestContext::builder(Method::POST, "/u/42".parse().unwrap())
            .headers(headers)
            .params(params)
            .build();

        assert_eq!(ctx.header("x-tenant"), Some("acme"));
        assert_eq!(ctx.header("missing"), None);
        assert_eq!(ctx.path_param("user_id"), Some("42"));
    }

    #[test]
    fn test_status_override_shared_between_clones() {
        let ctx = ctx("/");
        let clone = ctx.clone();
        assert_eq!(ctx.status_override(), None);

        clone.set_status_code(StatusCode::FORBIDDEN);
        assert_eq!(ctx.status_override(), Some(StatusCode::FORBIDDEN));
    }

    #[test]
    fn test_response_headers_shared_between_clones() {
        let ctx = ctx("/");
        ctx.clone()
            .insert_response_header(HeaderName::from_static("x-step"), HeaderValue::from_static("1"));

        assert_eq!(ctx.response_headers().get("x-step").unwrap(), "1");
    }

    #[test]
    fn test_contexts_do_not_share_state() {
        let a = ctx("/");
        let b = ctx("/");
        a.set_status_code(StatusCode::IM_A_TEAPOT);
        assert_eq!(b.status_override(), None);
        assert_ne!(a.request_id(), b.request_id());
    }
}
