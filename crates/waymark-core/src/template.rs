//! Typed path templates.
//!
//! A [`PathTemplate`] ties a route pattern such as `/api/users/{user_id}`
//! to the record type that describes its parameters. Compiling checks the
//! pair once; evaluating turns a record back into a concrete URL.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use crate::error::{ConstructionError, ConstructionResult};
use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A route pattern bound to its parameter record `T`.
///
/// # Example
///
/// ```rust
/// use waymark_core::{PathTemplate, Record};
///
/// #[derive(Debug, Default, Record)]
/// struct UserParams {
///     #[wire("user_id")]
///     user_id: i64,
///     #[wire("search")]
///     search: String,
/// }
///
/// let path = PathTemplate::<UserParams>::new("/api/users/{user_id:[0-9]+}").unwrap();
/// assert_eq!(path.path_params(), ["user_id"]);
///
/// let url = path.eval(&UserParams { user_id: 7, search: "hello?!".to_string() });
/// assert_eq!(url, "/api/users/7?search=hello%3F%21");
/// ```
pub struct PathTemplate<T> {
    pattern: String,
    segments: Vec<Segment>,
    path_params: Vec<String>,
    all_params: Vec<&'static str>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for PathTemplate<T> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            segments: self.segments.clone(),
            path_params: self.path_params.clone(),
            all_params: self.all_params.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for PathTemplate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathTemplate")
            .field("pattern", &self.pattern)
            .field("path_params", &self.path_params)
            .field("all_params", &self.all_params)
            .finish()
    }
}

impl<T: Record> PathTemplate<T> {
    /// Compiles `pattern` against `T`.
    ///
    /// # Errors
    ///
    /// Fails if a placeholder is unterminated, a field of `T` has no wire
    /// name or no scalar mapping, or a placeholder names no field of `T`.
    pub fn new(pattern: impl Into<String>) -> ConstructionResult<Self> {
        let pattern = pattern.into();
        let segments = split_segments(&pattern)?;
        let all_params = record_wire_names::<T>()?;

        let path_params: Vec<String> = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(name) => Some(name.clone()),
                Segment::Literal(_) => None,
            })
            .collect();

        if let Some(missing) = path_params
            .iter()
            .find(|p| !all_params.contains(&p.as_str()))
        {
            return Err(ConstructionError::MissingPathParam {
                param: missing.clone(),
                record: T::type_name(),
            });
        }

        Ok(Self {
            pattern,
            segments,
            path_params,
            all_params,
            _record: PhantomData,
        })
    }

    /// Renders `values` as a path plus query string.
    ///
    /// Placeholders take the string form of their field, or nothing if the
    /// field is zero. Every other non-zero field becomes a query pair, sorted
    /// by wire name and form-encoded: alphanumerics and `*-._` stay as they
    /// are, space becomes `+` and every other byte is percent-encoded, `~`
    /// included.
    #[must_use]
    pub fn eval(&self, values: &T) -> String {
        let mut remaining: BTreeMap<&'static str, String> = BTreeMap::new();
        for (index, descriptor) in T::fields().iter().enumerate() {
            let (Some(name), Some(field)) = (descriptor.wire_name(), values.field(index)) else {
                continue;
            };
            if !field.is_zero() {
                remaining.insert(name, field.to_wire());
            }
        }

        let mut url = String::with_capacity(self.pattern.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => url.push_str(text),
                Segment::Param(name) => {
                    if let Some(value) = remaining.remove(name.as_str()) {
                        url.push_str(&value);
                    }
                }
            }
        }

        if remaining.is_empty() {
            return url;
        }

        // String pairs always encode.
        let query = serde_urlencoded::to_string(&remaining).unwrap_or_default();
        url.push('?');
        url.push_str(&query);
        url
    }
}

impl<T> PathTemplate<T> {
    /// Returns the pattern as written, constraints included.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the placeholder names in template order.
    #[must_use]
    pub fn path_params(&self) -> &[String] {
        &self.path_params
    }

    /// Returns every wire name of `T` in declaration order.
    #[must_use]
    pub fn all_params(&self) -> &[&'static str] {
        &self.all_params
    }

    /// Returns true if `name` is a placeholder of this template.
    #[must_use]
    pub fn is_path_param(&self, name: &str) -> bool {
        self.path_params.iter().any(|p| p == name)
    }
}

/// Splits a pattern into literal text and placeholders.
///
/// Braces nest so `{id:[0-9]{3}}` is one placeholder; the `:regex` suffix
/// is dropped here and left to the multiplexer.
fn split_segments(pattern: &str) -> ConstructionResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut placeholder = String::new();
    let mut depth = 0_usize;

    for c in pattern.chars() {
        match (c, depth) {
            ('{', 0) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                depth = 1;
            }
            ('{', _) => {
                depth += 1;
                placeholder.push(c);
            }
            ('}', 1) => {
                let inner = std::mem::take(&mut placeholder);
                let name = inner.split_once(':').map_or(inner.as_str(), |(n, _)| n);
                segments.push(Segment::Param(name.to_string()));
                depth = 0;
            }
            ('}', d) if d > 1 => {
                depth -= 1;
                placeholder.push(c);
            }
            (_, 0) => literal.push(c),
            _ => placeholder.push(c),
        }
    }

    if depth > 0 {
        return Err(ConstructionError::UnterminatedBrace {
            template: pattern.to_string(),
        });
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn record_wire_names<T: Record>() -> ConstructionResult<Vec<&'static str>> {
    T::fields()
        .iter()
        .map(|field| {
            let name = field.wire_name().ok_or(ConstructionError::MissingWireName {
                field: field.ident,
                record: T::type_name(),
            })?;
            if !field.bindable {
                return Err(ConstructionError::OpaqueParamField {
                    field: field.ident,
                    kind: field.type_name,
                    record: T::type_name(),
                });
            }
            Ok(name)
        })
        .collect()
}
