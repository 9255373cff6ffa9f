//! # Waymark
//!
//! **Typed HTTP routes over hyper**
//!
//! A route is a [`PathTemplate`](core::PathTemplate) bound to a parameter
//! record. The same template registers the handler and renders links back
//! to it, so a URL and the code serving it cannot drift apart.
//!
//! - **Records** - `#[derive(Record)]` gives every field a wire name
//! - **Binding** - path, query and JSON body land in one request record
//! - **Construction checks** - request records must cover the parameters,
//!   checked when the route is registered
//! - **Middleware** - handler transforms, first registered runs outermost
//! - **Server** - HTTP/1.1 with graceful shutdown and JSON logging
//!
//! ## Quick Start
//!
//! ```rust
//! use waymark::prelude::*;
//!
//! #[derive(Debug, Default, Record)]
//! #[record(crate = "waymark::core")]
//! struct UserParams {
//!     #[wire("user_id")]
//!     user_id: i64,
//!     #[wire("tab")]
//!     tab: String,
//! }
//!
//! let users = PathTemplate::<UserParams>::new("/api/users/{user_id}").unwrap();
//! let link = users.eval(&UserParams { user_id: 7, tab: "posts".into() });
//! assert_eq!(link, "/api/users/7?tab=posts");
//!
//! let router = Router::new().with_middlewares([trace_requests()]);
//! router
//!     .json_get(&users, |_ctx: RequestContext, req: UserParams| async move {
//!         Ok(format!("user {} ({})", req.user_id, req.tab))
//!     })
//!     .unwrap();
//! assert_eq!(router.route_count(), 1);
//! ```
//!
//! Serving it for real:
//!
//! ```rust,no_run
//! use waymark::prelude::*;
//!
//! # async fn run(router: Router) -> Result<(), Box<dyn std::error::Error>> {
//! init_logging(&LogConfig::production().with_service_name("users"))?;
//!
//! let config = ServerConfig::builder().http_addr("127.0.0.1:8081").build().with_env_overrides();
//! Server::new(config, router).run().await?;
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/waymark/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use waymark_core as core;

// Re-export server types
pub use waymark_server as server;

// Re-export middleware types
pub use waymark_middleware as middleware;

// Re-export the route table
pub use waymark_router as router;

// Re-export binding
pub use waymark_extract as extract;

// Re-export logging setup
pub use waymark_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// Records derived through the prelude need `#[record(crate = "waymark::core")]`
/// unless `waymark-core` is also a direct dependency.
pub mod prelude {
    pub use waymark_core::{
        ConstructionError, ConstructionResult, Empty, Html, Nullable, PathTemplate, Record,
        RequestContext, RequestId,
    };

    pub use waymark_extract::BindError;

    pub use waymark_middleware::{middleware_fn, trace_requests, GenericHandler, Middleware, Payload};

    pub use waymark_server::{Router, Server, ServerConfig, ServerError, ShutdownSignal};

    pub use waymark_telemetry::{init_logging, LogConfig};
}
