//! # Waymark Test
//!
//! Drive a [`Router`](waymark_server::Router) in memory from tests.
//!
//! [`TestClient`] builds `http` requests and hands them to
//! [`Router::dispatch`](waymark_server::Router::dispatch); nothing binds a
//! port. [`TestResponse`] holds the collected status, headers and body.
//!
//! ```rust
//! use waymark_core::{PathTemplate, Record, RequestContext};
//! use waymark_server::Router;
//! use waymark_test::TestClient;
//!
//! #[derive(Debug, Default, Record)]
//! struct ItemParams {
//!     #[wire("item_id")]
//!     item_id: u32,
//! }
//!
//! # tokio_test::block_on(async {
//! let router = Router::new();
//! let item = PathTemplate::<ItemParams>::new("/items/{item_id}").unwrap();
//! router
//!     .json_get(&item, |_ctx: RequestContext, req: ItemParams| async move {
//!         Ok(req.item_id * 2)
//!     })
//!     .unwrap();
//!
//! let client = TestClient::new(router);
//! let response = client.get("/items/21").send().await.unwrap();
//! assert_eq!(response.text().unwrap(), "42\n");
//!
//! let response = client.get("/items/abc").send().await.unwrap();
//! assert_eq!(response.status_code(), 400);
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/waymark-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod response;

pub use client::{TestClient, TestRequestBuilder};
pub use error::TestError;
pub use response::TestResponse;
