//! Radix tree request multiplexer for waymark.
//!
//! The multiplexer maps `(method, path)` pairs to handlers of any type `H`
//! and captures placeholder values along the way. It knows nothing about
//! records or HTTP bodies; the server crate stores its type-erased
//! endpoints in it.
//!
//! # Pattern syntax
//!
//! - `/users/me`: literal segments
//! - `/users/{user_id}`: a placeholder capturing one segment
//! - `/ds/{dataset_id:[0-9]+}`: a placeholder whose whole segment must
//!   match the regular expression
//! - `/api/v{version}/items`, `/files/{name}.{ext:[a-z]+}`: literal text
//!   and placeholders sharing one segment
//! - `/files/*path`: a wildcard capturing the rest of the path
//!
//! Braces nest, so `{code:[A-Z]{3}}` is one placeholder. A constraint can
//! not contain `/`.
//!
//! Empty segments are significant: `/users/` and `/users` are different
//! paths, and `//users` matches neither.
//!
//! # Example
//!
//! ```rust
//! use waymark_router::{Mux, MethodRouter};
//! use http::Method;
//!
//! let mut mux = Mux::new();
//! mux.insert("/users", MethodRouter::new().get("list_users").post("create_user"))
//!     .unwrap();
//! mux.insert("/users/{name}", MethodRouter::new().get("get_user"))
//!     .unwrap();
//! mux.insert("/files/*path", MethodRouter::new().get("serve_file"))
//!     .unwrap();
//!
//! let m = mux.match_route(&Method::GET, "/users/alice").unwrap();
//! assert_eq!(*m.handler, "get_user");
//! assert_eq!(m.params.get("name"), Some("alice"));
//! ```
//!
//! # Layout
//!
//! ```text
//!                    (root)
//!                      │
//!              ┌───────┴───────┐
//!              │               │
//!            "users"        "files"
//!              │               │
//!        ┌─────┴─────┐      "*path"
//!        │           │
//!       (leaf)    "{name}"
//!   [GET,POST]       │
//!                  (leaf)
//!                  [GET]
//! ```

mod error;
mod method_router;
mod node;
mod params;
mod router;

pub use error::RouteError;
pub use method_router::MethodRouter;
pub use node::{Constraint, Node, SegmentKind, SegmentPattern};
pub use params::Params;
pub use router::Mux;

/// A matched route: the handler and the values captured from the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, H> {
    /// The registered handler.
    pub handler: &'a H,
    /// Raw (still percent-encoded) placeholder values.
    pub params: Params,
}

impl<'a, H> RouteMatch<'a, H> {
    /// Creates a route match.
    #[must_use]
    pub fn new(handler: &'a H, params: Params) -> Self {
        Self { handler, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_basic_routing() {
        let mut mux = Mux::new();
        mux.insert("/users", MethodRouter::new().get("list_users")).unwrap();
        mux.insert("/users/{name}", MethodRouter::new().get("get_user")).unwrap();

        let m = mux.match_route(&Method::GET, "/users").unwrap();
        assert_eq!(*m.handler, "list_users");
        assert!(m.params.is_empty());

        let m = mux.match_route(&Method::GET, "/users/alice").unwrap();
        assert_eq!(*m.handler, "get_user");
        assert_eq!(m.params.get("name"), Some("alice"));
    }

    #[test]
    fn test_no_match() {
        let mut mux = Mux::new();
        mux.insert("/users", MethodRouter::new().get("list_users")).unwrap();

        assert!(mux.match_route(&Method::GET, "/posts").is_none());
        assert!(mux.match_path("/posts").is_none());
    }

    #[test]
    fn test_multiple_params() {
        let mut mux = Mux::new();
        mux.route(Method::GET, "/ds/{dataset_id}/users/{user_id:[0-9]+}", "dataset_user")
            .unwrap();

        let m = mux.match_route(&Method::GET, "/ds/abc/users/12").unwrap();
        assert_eq!(m.params.get("dataset_id"), Some("abc"));
        assert_eq!(m.params.get("user_id"), Some("12"));
    }

    #[test]
    fn test_params_stay_encoded() {
        let mut mux = Mux::new();
        mux.route(Method::GET, "/users/{name}", ()).unwrap();

        let m = mux.match_route(&Method::GET, "/users/hello%20world").unwrap();
        assert_eq!(m.params.get("name"), Some("hello%20world"));
    }
}
