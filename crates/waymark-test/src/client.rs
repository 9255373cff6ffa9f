//! In-memory test client.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, Request};
use serde::Serialize;
use waymark_server::Router;

use crate::error::TestError;
use crate::response::TestResponse;

/// Sends requests straight to a [`Router`], without a socket.
///
/// ```rust
/// use waymark_core::{Empty, PathTemplate, RequestContext};
/// use waymark_server::Router;
/// use waymark_test::TestClient;
///
/// # tokio_test::block_on(async {
/// let router = Router::new();
/// let ping = PathTemplate::<Empty>::new("/ping").unwrap();
/// router
///     .json_get(&ping, |_ctx: RequestContext, _req: Empty| async move { Ok("pong") })
///     .unwrap();
///
/// let client = TestClient::new(router);
/// let response = client.get("/ping").send().await.unwrap();
/// assert_eq!(response.status_code(), 200);
/// assert_eq!(response.json::<String>().unwrap(), "pong");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct TestClient {
    router: Router,
    default_headers: HeaderMap,
}

impl TestClient {
    /// Wraps a router.
    #[must_use]
    pub fn new(router: Router) -> Self {
        Self {
            router,
            default_headers: HeaderMap::new(),
        }
    }

    /// Adds a header sent with every request.
    ///
    /// # Errors
    ///
    /// [`TestError::RequestBuild`] for an invalid name or value.
    pub fn with_default_header(mut self, name: &str, value: &str) -> Result<Self, TestError> {
        let (name, value) = parse_header(name, value)?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Returns the wrapped router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Starts a `GET` request.
    #[must_use]
    pub fn get(&self, uri: &str) -> TestRequestBuilder<'_> {
        self.request(Method::GET, uri)
    }

    /// Starts a `POST` request.
    #[must_use]
    pub fn post(&self, uri: &str) -> TestRequestBuilder<'_> {
        self.request(Method::POST, uri)
    }

    /// Starts a `PUT` request.
    #[must_use]
    pub fn put(&self, uri: &str) -> TestRequestBuilder<'_> {
        self.request(Method::PUT, uri)
    }

    /// Starts a `PATCH` request.
    #[must_use]
    pub fn patch(&self, uri: &str) -> TestRequestBuilder<'_> {
        self.request(Method::PATCH, uri)
    }

    /// Starts a `DELETE` request.
    #[must_use]
    pub fn delete(&self, uri: &str) -> TestRequestBuilder<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Starts a request with any method.
    #[must_use]
    pub fn request(&self, method: Method, uri: &str) -> TestRequestBuilder<'_> {
        TestRequestBuilder {
            client: self,
            method,
            uri: uri.to_string(),
            headers: self.default_headers.clone(),
            body: Bytes::new(),
            error: None,
        }
    }
}

/// A request being built by a [`TestClient`].
///
/// Builder errors are kept until [`send`](Self::send).
#[derive(Debug)]
#[must_use]
pub struct TestRequestBuilder<'a> {
    client: &'a TestClient,
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Bytes,
    error: Option<TestError>,
}

impl TestRequestBuilder<'_> {
    /// Sets a header, replacing earlier values.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match parse_header(name, value) {
            Ok((name, value)) => {
                self.headers.insert(name, value);
            }
            Err(e) => self.error = self.error.or(Some(e)),
        }
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Serializes `value` as the JSON body.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.body = Bytes::from(bytes);
                self.headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            Err(e) => self.error = self.error.or(Some(TestError::Json(e))),
        }
        self
    }

    /// Dispatches the request and collects the response.
    ///
    /// # Errors
    ///
    /// The first builder error, or [`TestError::RequestBuild`] for an
    /// invalid URI.
    pub async fn send(self) -> Result<TestResponse, TestError> {
        if let Some(e) = self.error {
            return Err(e);
        }

        let mut request = Request::builder()
            .method(self.method)
            .uri(self.uri.as_str())
            .body(self.body)
            .map_err(|e| TestError::RequestBuild(format!("invalid request to '{}': {e}", self.uri)))?;
        *request.headers_mut() = self.headers;

        let response = self.client.router.dispatch(request).await;
        TestResponse::from_http(response).await
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), TestError> {
    let name = HeaderName::try_from(name)
        .map_err(|e| TestError::RequestBuild(format!("invalid header name '{name}': {e}")))?;
    let value = HeaderValue::try_from(value)
        .map_err(|e| TestError::RequestBuild(format!("invalid header value '{value}': {e}")))?;
    Ok((name, value))
}
