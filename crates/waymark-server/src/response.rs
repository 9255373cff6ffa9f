//! Response rendering.
//!
//! Success bodies are JSON or HTML depending on the route. Errors are
//! always a JSON envelope:
//!
//! ```text
//! {"error":"<message>"}
//! ```

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use waymark_core::Html;

/// Response body type produced by the router.
pub type ResponseBody = Full<Bytes>;

/// Response type produced by the router.
pub type HttpResponse = Response<ResponseBody>;

/// Content type of JSON bodies, including error envelopes.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Content type of HTML bodies.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Renders a value as a JSON body followed by a newline.
///
/// Falls back to a 500 envelope if the value does not serialize.
#[must_use]
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> HttpResponse {
    match serde_json::to_vec(value) {
        Ok(mut body) => {
            body.push(b'\n');
            build(status, JSON_CONTENT_TYPE, body)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// Renders markup verbatim.
#[must_use]
pub fn html_response(status: StatusCode, html: Html) -> HttpResponse {
    build(status, HTML_CONTENT_TYPE, html.into_string())
}

/// Renders the `{"error": ..}` envelope.
#[must_use]
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    let mut body = serde_json::to_vec(&ErrorBody { error: message })
        .unwrap_or_else(|_| br#"{"error":"internal error"}"#.to_vec());
    body.push(b'\n');
    build(status, JSON_CONTENT_TYPE, body)
}

/// Copies headers added through the request context onto a response.
pub(crate) fn merge_headers(response: &mut HttpResponse, headers: HeaderMap) {
    let target = response.headers_mut();
    let mut last = None;
    for (name, value) in headers {
        // Repeated values arrive with `None` names.
        if let Some(name) = name {
            target.remove(&name);
            last = Some(name);
        }
        if let Some(name) = &last {
            target.append(name.clone(), value);
        }
    }
}

fn build(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> HttpResponse {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
