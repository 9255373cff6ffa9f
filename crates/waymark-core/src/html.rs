//! Markup returned by HTML routes.

use std::fmt;

/// Rendered markup, written to the response body verbatim.
///
/// ```rust
/// use waymark_core::Html;
///
/// let page = Html::from("<div>Hello</div>");
/// assert_eq!(page.as_str(), "<div>Hello</div>");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Html(pub String);

impl Html {
    /// Returns the markup.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Html {
    fn from(markup: String) -> Self {
        Self(markup)
    }
}

impl From<&str> for Html {
    fn from(markup: &str) -> Self {
        Self(markup.to_string())
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
