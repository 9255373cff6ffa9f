//! Where raw values come from.
//!
//! The binder asks a [`ValueSource`] for one wire name at a time. Query
//! strings and captured path values are the two request-backed sources;
//! [`RouteSource`] sends placeholder names to the path and everything else
//! to the query.

use std::borrow::Cow;
use std::collections::HashMap;

use waymark_router::Params;

/// Looks up raw string values by wire name.
///
/// A missing value and an empty one are treated alike by the binder.
pub trait ValueSource {
    /// Returns the raw value for `wire_name`.
    fn value(&self, wire_name: &str) -> Option<Cow<'_, str>>;
}

impl<F> ValueSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn value(&self, wire_name: &str) -> Option<Cow<'_, str>> {
        self(wire_name).map(Cow::Owned)
    }
}

impl ValueSource for HashMap<String, String> {
    fn value(&self, wire_name: &str) -> Option<Cow<'_, str>> {
        self.get(wire_name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

/// Decoded query string pairs.
///
/// Repeated keys keep every pair, but lookups return the first.
///
/// ```rust
/// use waymark_extract::{QuerySource, ValueSource};
///
/// let query = QuerySource::parse(Some("name=a+b&tag=x&tag=y&bad=%3F"));
/// assert_eq!(query.value("name").as_deref(), Some("a b"));
/// assert_eq!(query.value("tag").as_deref(), Some("x"));
/// assert_eq!(query.value("bad").as_deref(), Some("?"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySource {
    pairs: Vec<(String, String)>,
}

impl QuerySource {
    /// Parses a raw query string. Malformed input yields no pairs.
    #[must_use]
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
            .unwrap_or_default();
        Self { pairs }
    }

    /// Returns all decoded pairs in order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl ValueSource for QuerySource {
    fn value(&self, wire_name: &str) -> Option<Cow<'_, str>> {
        self.pairs
            .iter()
            .find(|(k, _)| k == wire_name)
            .map(|(_, v)| Cow::Borrowed(v.as_str()))
    }
}

/// Path values captured by the multiplexer, percent-decoded on lookup.
///
/// A value that does not decode to UTF-8 is returned raw.
#[derive(Debug, Clone, Copy)]
pub struct PathSource<'a> {
    params: &'a Params,
}

impl<'a> PathSource<'a> {
    /// Wraps captured path values.
    #[must_use]
    pub fn new(params: &'a Params) -> Self {
        Self { params }
    }
}

impl ValueSource for PathSource<'_> {
    fn value(&self, wire_name: &str) -> Option<Cow<'_, str>> {
        let raw = self.params.get(wire_name)?;
        Some(urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw)))
    }
}

/// Path values for placeholder names, query values for the rest.
#[derive(Debug, Clone, Copy)]
pub struct RouteSource<'a> {
    path_names: &'a [String],
    path: PathSource<'a>,
    query: &'a QuerySource,
}

impl<'a> RouteSource<'a> {
    /// Combines the two request sources.
    #[must_use]
    pub fn new(path_names: &'a [String], params: &'a Params, query: &'a QuerySource) -> Self {
        Self {
            path_names,
            path: PathSource::new(params),
            query,
        }
    }
}

impl ValueSource for RouteSource<'_> {
    fn value(&self, wire_name: &str) -> Option<Cow<'_, str>> {
        if self.path_names.iter().any(|n| n == wire_name) {
            self.path.value(wire_name)
        } else {
            self.query.value(wire_name)
        }
    }
}
