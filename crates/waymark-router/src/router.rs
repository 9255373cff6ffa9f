//! Pattern registration and lookup.
//!
//! [`Mux`] is the front door of the crate: patterns go in with
//! [`Mux::insert`] or [`Mux::route`], request paths come out as a
//! [`RouteMatch`] carrying the handler and the captured values.

use http::Method;

use crate::error::RouteError;
use crate::method_router::MethodRouter;
use crate::node::{parse_pattern, Node};
use crate::params::Params;
use crate::RouteMatch;

/// A radix tree request multiplexer, generic over the handler type.
///
/// # Example
///
/// ```rust
/// use waymark_router::{Mux, MethodRouter};
/// use http::Method;
///
/// let mut mux = Mux::new();
/// mux.insert("/users", MethodRouter::new().get("list_users")).unwrap();
/// mux.route(Method::GET, "/users/{user_id:[0-9]+}", "get_user").unwrap();
///
/// let m = mux.match_route(&Method::GET, "/users/123").unwrap();
/// assert_eq!(*m.handler, "get_user");
/// assert_eq!(m.params.get("user_id"), Some("123"));
///
/// assert!(mux.match_route(&Method::GET, "/users/abc").is_none());
/// ```
///
/// # Route Priority
///
/// 1. Static segments (`/users/me`)
/// 2. Mixed segments (`/files/{name}.json`)
/// 3. Constrained placeholders (`/users/{id:[0-9]+}`)
/// 4. Plain placeholders (`/users/{name}`)
/// 5. Wildcards (`/files/*path`)
///
/// A branch that fails deeper in the path falls back to the next candidate.
#[derive(Debug, Clone)]
pub struct Mux<H> {
    root: Node<H>,
    route_count: usize,
}

impl<H> Default for Mux<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Mux<H> {
    /// Creates an empty multiplexer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Registers every method of `methods` under `pattern`.
    ///
    /// # Errors
    ///
    /// Fails if the pattern is malformed or one of the methods is already
    /// registered for an equivalent pattern. Nothing is registered on error.
    pub fn insert(&mut self, pattern: &str, methods: MethodRouter<H>) -> Result<(), RouteError> {
        let segments = parse_pattern(pattern)?;
        let added = methods.allowed_methods().len();
        self.root
            .insert(&segments, methods)
            .map_err(|method| RouteError::Duplicate {
                method,
                pattern: pattern.to_string(),
            })?;
        self.route_count += added;
        Ok(())
    }

    /// Registers a single method.
    ///
    /// # Errors
    ///
    /// Same as [`Mux::insert`].
    pub fn route(&mut self, method: Method, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.insert(pattern, MethodRouter::new().method(method, handler))
    }

    /// Finds the handler for `method` and `path`.
    ///
    /// Returns `None` both when no pattern matches and when the pattern
    /// matches but has no handler for `method`; use [`Mux::match_path`] to
    /// tell them apart.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, H>> {
        let (methods, params) = self.root.match_path(path)?;
        let handler = methods.handler(method)?;
        Some(RouteMatch::new(handler, params))
    }

    /// Finds the method table for `path`, regardless of method.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<H>, Params)> {
        self.root.match_path(path)
    }

    /// Returns the number of registered (method, pattern) pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}
