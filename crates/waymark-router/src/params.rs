//! Path values captured while matching a request path.

use smallvec::SmallVec;

/// Most templates carry one or two placeholders.
const INLINE_PARAMS: usize = 4;

/// Raw path values captured by a route match, keyed by placeholder name.
///
/// Values are stored exactly as they appeared in the request path, so they
/// are still percent-encoded. Decoding is the caller's concern.
///
/// # Example
///
/// ```rust
/// use waymark_router::Params;
///
/// let params: Params = vec![("user_id".to_string(), "123".to_string())]
///     .into_iter()
///     .collect();
///
/// assert_eq!(params.get("user_id"), Some("123"));
/// assert_eq!(params.get("dataset_id"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a captured value.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Drops values captured after `len`, used when a branch fails to match.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }

    /// Returns the value captured for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of captured values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates `(name, value)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
