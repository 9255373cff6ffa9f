//! # Waymark Server
//!
//! Typed routes and the HTTP server that serves them.
//!
//! - [`Router`] - registration API (`json_get`, `json_post`, `html_get`, ...)
//!   and in-memory [`Router::dispatch`]
//! - [`Server`] - hyper HTTP/1.1 server with graceful shutdown
//! - [`ServerConfig`] - builder, TOML and environment configuration
//!
//! ## Responses
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | JSON handler succeeded | 200 or override | serialized response + `\n` |
//! | HTML handler succeeded | 200 or override | markup verbatim |
//! | body or parameter rejected | 400 (413 for size) | `{"error":"..."}` |
//! | handler or middleware failed | 500 or override | `{"error":"..."}` |
//! | no route for the path | 404 | `{"error":"not found"}` |
//! | no route for the method | 405 + `Allow` | `{"error":"method not allowed"}` |
//!
//! The override is whatever a middleware or handler set through
//! [`RequestContext::set_status_code`](waymark_core::RequestContext::set_status_code).

#![doc(html_root_url = "https://docs.rs/waymark-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod response;
mod router;
mod server;
mod shutdown;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_BYTES,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS, HTTP_ADDR_ENV,
};
pub use error::ServerError;
pub use response::{
    error_response, html_response, json_response, HttpResponse, ResponseBody, HTML_CONTENT_TYPE,
    JSON_CONTENT_TYPE,
};
pub use router::Router;
pub use server::Server;
pub use shutdown::ShutdownSignal;
