//! Per-path method table.
//!
//! A [`MethodRouter`] holds the handlers registered for a single path
//! pattern, one per HTTP method.

use http::Method;

/// Maps HTTP methods to handlers for one path pattern.
///
/// # Example
///
/// ```rust
/// use waymark_router::MethodRouter;
/// use http::Method;
///
/// let methods = MethodRouter::new().get("list_users").post("create_user");
///
/// assert_eq!(methods.handler(&Method::GET), Some(&"list_users"));
/// assert_eq!(methods.handler(&Method::DELETE), None);
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<H> {
    entries: Vec<(Method, H)>,
}

impl<H> Default for MethodRouter<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H> MethodRouter<H> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a GET handler.
    #[must_use]
    pub fn get(self, handler: H) -> Self {
        self.method(Method::GET, handler)
    }

    /// Registers a POST handler.
    #[must_use]
    pub fn post(self, handler: H) -> Self {
        self.method(Method::POST, handler)
    }

    /// Registers a PUT handler.
    #[must_use]
    pub fn put(self, handler: H) -> Self {
        self.method(Method::PUT, handler)
    }

    /// Registers a PATCH handler.
    #[must_use]
    pub fn patch(self, handler: H) -> Self {
        self.method(Method::PATCH, handler)
    }

    /// Registers a DELETE handler.
    #[must_use]
    pub fn delete(self, handler: H) -> Self {
        self.method(Method::DELETE, handler)
    }

    /// Registers a handler for an arbitrary method, replacing any previous one.
    #[must_use]
    pub fn method(mut self, method: Method, handler: H) -> Self {
        self.entries.retain(|(m, _)| *m != method);
        self.entries.push((method, handler));
        self
    }

    /// Returns the handler for `method`.
    #[must_use]
    pub fn handler(&self, method: &Method) -> Option<&H> {
        self.entries
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, h)| h)
    }

    /// Returns true if a handler is registered for `method`.
    #[must_use]
    pub fn contains(&self, method: &Method) -> bool {
        self.entries.iter().any(|(m, _)| m == method)
    }

    /// Moves the entries of `other` into this table.
    ///
    /// Returns the first method both tables define; in that case nothing
    /// is moved.
    pub fn merge(&mut self, other: MethodRouter<H>) -> Result<(), Method> {
        if let Some((method, _)) = other.entries.iter().find(|(m, _)| self.contains(m)) {
            return Err(method.clone());
        }
        self.entries.extend(other.entries);
        Ok(())
    }

    /// Returns true if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lists registered methods in registration order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.entries.iter().map(|(m, _)| m.clone()).collect()
    }
}
