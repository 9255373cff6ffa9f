//! Radix tree nodes.
//!
//! Each node owns one path segment. Lookups try static children first,
//! then placeholder children (mixed segments, then constrained, then
//! plain), then the wildcard child, backtracking when a branch dead-ends.

use regex::Regex;

use crate::error::RouteError;
use crate::method_router::MethodRouter;
use crate::params::Params;

/// A compiled `{name:regex}` constraint.
///
/// The expression must match the whole segment.
#[derive(Debug, Clone)]
pub struct Constraint {
    source: String,
    regex: Regex,
}

impl Constraint {
    fn compile(pattern: &str, param: &str, source: &str) -> Result<Self, RouteError> {
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| {
            RouteError::InvalidConstraint {
                pattern: pattern.to_string(),
                param: param.to_string(),
                source: e,
            }
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Returns the expression as written in the pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn is_match(&self, segment: &str) -> bool {
        self.regex.is_match(segment)
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Constraint {}

/// A segment mixing literal text with placeholders, such as
/// `v{version}` or `{name}.{ext:[a-z]+}`.
///
/// Compiled to one anchored expression; placeholders without a constraint
/// match lazily so the literal text after them decides where they end.
#[derive(Debug, Clone)]
pub struct SegmentPattern {
    source: String,
    names: Vec<String>,
    regex: Regex,
}

impl SegmentPattern {
    fn compile(pattern: &str, source: &str, parts: &[Part<'_>]) -> Result<Self, RouteError> {
        let mut expr = String::from("^");
        let mut names = Vec::new();
        for part in parts {
            match part {
                Part::Literal(text) => expr.push_str(&regex::escape(text)),
                Part::Placeholder(inner) => {
                    let (name, constraint) = split_placeholder(pattern, inner)?;
                    let body = constraint.as_ref().map_or(".+?", Constraint::as_str);
                    expr.push_str(&format!("(?P<p{}>{body})", names.len()));
                    names.push(name.to_string());
                }
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| RouteError::InvalidConstraint {
            pattern: pattern.to_string(),
            param: names.join(","),
            source: e,
        })?;
        Ok(Self {
            source: source.to_string(),
            names,
            regex,
        })
    }

    /// Returns the segment as written in the pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the placeholder names in order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Pushes every capture, or nothing if `segment` does not match.
    fn capture(&self, segment: &str, params: &mut Params) -> bool {
        let Some(caps) = self.regex.captures(segment) else {
            return false;
        };
        for (i, name) in self.names.iter().enumerate() {
            let value = caps.name(&format!("p{i}")).map_or("", |m| m.as_str());
            params.push(name.clone(), value);
        }
        true
    }
}

impl PartialEq for SegmentPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for SegmentPattern {}

/// Kind of segment a node matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal text.
    Static(String),
    /// `{name}` or `{name:regex}` filling the whole segment.
    Param {
        /// Placeholder name.
        name: String,
        /// Optional whole-segment constraint.
        constraint: Option<Constraint>,
    },
    /// Literal text and placeholders sharing one segment.
    Mixed(SegmentPattern),
    /// `*name`, capturing the rest of the path.
    Wildcard(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Splits a pattern on `/` outside braces, after one leading `/`.
fn split_top_level(pattern: &str) -> Result<Vec<&str>, RouteError> {
    let body = pattern.strip_prefix('/').unwrap_or(pattern);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let mut segments = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' if depth > 0 => depth -= 1,
            '/' if depth == 0 => {
                segments.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(RouteError::UnterminatedPlaceholder {
            pattern: pattern.to_string(),
        });
    }
    segments.push(&body[start..]);
    Ok(segments)
}

/// Splits one balanced segment into literal runs and placeholder bodies.
fn split_parts(segment: &str) -> Vec<Part<'_>> {
    let mut parts = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    for (i, c) in segment.char_indices() {
        match c {
            '{' => {
                if depth == 0 {
                    if start < i {
                        parts.push(Part::Literal(&segment[start..i]));
                    }
                    start = i + 1;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    parts.push(Part::Placeholder(&segment[start..i]));
                    start = i + 1;
                }
            }
            _ => {}
        }
    }
    if start < segment.len() {
        parts.push(Part::Literal(&segment[start..]));
    }
    parts
}

fn split_placeholder<'a>(
    pattern: &str,
    inner: &'a str,
) -> Result<(&'a str, Option<Constraint>), RouteError> {
    match inner.split_once(':') {
        Some((name, expr)) => {
            if expr.contains('/') {
                return Err(RouteError::ConstraintSpansSegments {
                    pattern: pattern.to_string(),
                    param: name.to_string(),
                });
            }
            Ok((name, Some(Constraint::compile(pattern, name, expr)?)))
        }
        None => Ok((inner, None)),
    }
}

/// Splits a pattern into segments, compiling constraints.
///
/// Braces nest, so a constraint may itself contain `{n}` repetitions.
/// Empty segments are kept: `/users/` has a trailing empty segment and is
/// a different pattern from `/users`.
pub(crate) fn parse_pattern(pattern: &str) -> Result<Vec<SegmentKind>, RouteError> {
    let raw = split_top_level(pattern)?;
    let mut segments = Vec::with_capacity(raw.len());

    for (i, s) in raw.iter().enumerate() {
        let parts = split_parts(s);
        let kind = match parts.as_slice() {
            [] => SegmentKind::Static(String::new()),
            [Part::Placeholder(inner)] => {
                let (name, constraint) = split_placeholder(pattern, inner)?;
                SegmentKind::Param {
                    name: name.to_string(),
                    constraint,
                }
            }
            [Part::Literal(text)] => match text.strip_prefix('*') {
                Some(name) => {
                    if i + 1 != raw.len() {
                        return Err(RouteError::WildcardNotLast {
                            pattern: pattern.to_string(),
                        });
                    }
                    SegmentKind::Wildcard(name.to_string())
                }
                None => SegmentKind::Static((*text).to_string()),
            },
            _ => SegmentKind::Mixed(SegmentPattern::compile(pattern, s, &parts)?),
        };
        segments.push(kind);
    }

    Ok(segments)
}

/// A node in the radix tree.
#[derive(Debug, Clone)]
pub struct Node<H> {
    kind: SegmentKind,
    methods: Option<MethodRouter<H>>,
    /// Sorted by segment text for binary search.
    static_children: Vec<Node<H>>,
    /// Mixed segments, then constrained, then plain placeholders; ties keep
    /// registration order.
    param_children: Vec<Node<H>>,
    wildcard_child: Option<Box<Node<H>>>,
}

impl<H> Node<H> {
    fn with_kind(kind: SegmentKind) -> Self {
        Self {
            kind,
            methods: None,
            static_children: Vec::new(),
            param_children: Vec::new(),
            wildcard_child: None,
        }
    }

    /// Creates the root of an empty tree.
    #[must_use]
    pub fn root() -> Self {
        Self::with_kind(SegmentKind::Static(String::new()))
    }

    /// Returns the segment kind of this node.
    #[must_use]
    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    /// Inserts `methods` under `segments`.
    ///
    /// On conflict returns the first method already present at that node.
    pub(crate) fn insert(
        &mut self,
        segments: &[SegmentKind],
        methods: MethodRouter<H>,
    ) -> Result<(), http::Method> {
        let Some((segment, remaining)) = segments.split_first() else {
            return match &mut self.methods {
                Some(existing) => existing.merge(methods),
                None => {
                    self.methods = Some(methods);
                    Ok(())
                }
            };
        };

        let child = match segment {
            SegmentKind::Static(text) => {
                match self
                    .static_children
                    .binary_search_by(|c| c.static_text().cmp(text.as_str()))
                {
                    Ok(i) => &mut self.static_children[i],
                    Err(i) => {
                        self.static_children
                            .insert(i, Node::with_kind(segment.clone()));
                        &mut self.static_children[i]
                    }
                }
            }
            SegmentKind::Param { .. } | SegmentKind::Mixed(_) => {
                match self.param_children.iter().position(|c| c.kind == *segment) {
                    Some(i) => &mut self.param_children[i],
                    None => {
                        let rank = segment_rank(segment);
                        let at = self
                            .param_children
                            .iter()
                            .position(|c| segment_rank(&c.kind) > rank)
                            .unwrap_or(self.param_children.len());
                        self.param_children
                            .insert(at, Node::with_kind(segment.clone()));
                        &mut self.param_children[at]
                    }
                }
            }
            SegmentKind::Wildcard(_) => &mut **self
                .wildcard_child
                .get_or_insert_with(|| Box::new(Node::with_kind(segment.clone()))),
        };

        child.insert(remaining, methods)
    }

    fn static_text(&self) -> &str {
        match &self.kind {
            SegmentKind::Static(text) => text,
            _ => "",
        }
    }

    /// Matches a request path, capturing placeholder values.
    ///
    /// Empty segments count: `/users/12/` does not match `/users/{id}`.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<H>, Params)> {
        let body = path.strip_prefix('/').unwrap_or(path);
        let segments: Vec<&str> = if body.is_empty() {
            Vec::new()
        } else {
            body.split('/').collect()
        };
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    fn match_segments<'a>(
        &'a self,
        segments: &[&str],
        params: &mut Params,
    ) -> Option<&'a MethodRouter<H>> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.methods.as_ref();
        };

        if let Ok(i) = self
            .static_children
            .binary_search_by(|c| c.static_text().cmp(*segment))
        {
            if let Some(found) = self.static_children[i].match_segments(remaining, params) {
                return Some(found);
            }
        }

        for child in &self.param_children {
            let mark = params.len();
            match &child.kind {
                SegmentKind::Param { name, constraint } => {
                    if segment.is_empty()
                        || constraint.as_ref().is_some_and(|c| !c.is_match(segment))
                    {
                        continue;
                    }
                    params.push(name.clone(), *segment);
                }
                SegmentKind::Mixed(pattern) => {
                    if !pattern.capture(segment, params) {
                        continue;
                    }
                }
                SegmentKind::Static(_) | SegmentKind::Wildcard(_) => continue,
            }
            if let Some(found) = child.match_segments(remaining, params) {
                return Some(found);
            }
            params.truncate(mark);
        }

        if let Some(child) = &self.wildcard_child {
            if let SegmentKind::Wildcard(name) = &child.kind {
                params.push(name.clone(), segments.join("/"));
                return child.methods.as_ref();
            }
        }

        None
    }
}

/// Lookup order among placeholder children: mixed segments, then
/// constrained, then plain.
fn segment_rank(kind: &SegmentKind) -> u8 {
    match kind {
        SegmentKind::Mixed(_) => 0,
        SegmentKind::Param {
            constraint: Some(_),
            ..
        } => 1,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn insert(root: &mut Node<&'static str>, pattern: &str, methods: MethodRouter<&'static str>) {
        let segments = parse_pattern(pattern).unwrap();
        root.insert(&segments, methods).unwrap();
    }

    #[test]
    fn test_parse_pattern_kinds() {
        let segments = parse_pattern("/api/users/{user_id:[0-9]+}/{name}/*rest").unwrap();

        assert_eq!(segments[0], SegmentKind::Static("api".to_string()));
        match &segments[2] {
            SegmentKind::Param { name, constraint } => {
                assert_eq!(name, "user_id");
                assert_eq!(constraint.as_ref().map(Constraint::as_str), Some("[0-9]+"));
            }
            other => panic!("unexpected segment {other:?}"),
        }
        assert_eq!(
            segments[3],
            SegmentKind::Param {
                name: "name".to_string(),
                constraint: None
            }
        );
        assert_eq!(segments[4], SegmentKind::Wildcard("rest".to_string()));
    }

    #[test]
    fn test_parse_pattern_rejects_bad_input() {
        assert!(matches!(
            parse_pattern("/users/{user_id"),
            Err(RouteError::UnterminatedPlaceholder { .. })
        ));
        assert!(matches!(
            parse_pattern("/users/{id:[0-9}"),
            Err(RouteError::InvalidConstraint { .. })
        ));
        assert!(matches!(
            parse_pattern("/files/*path/more"),
            Err(RouteError::WildcardNotLast { .. })
        ));
    }

    #[test]
    fn test_constraint_must_match_whole_segment() {
        let mut root = Node::root();
        insert(&mut root, "/ds/{id:[0-9]+}", MethodRouter::new().get("numeric"));

        assert!(root.match_path("/ds/42").is_some());
        assert!(root.match_path("/ds/42x").is_none());
        assert!(root.match_path("/ds/abc").is_none());
    }

    #[test]
    fn test_constrained_param_before_plain_param() {
        let mut root = Node::root();
        insert(&mut root, "/users/{name}", MethodRouter::new().get("by_name"));
        insert(&mut root, "/users/{id:[0-9]+}", MethodRouter::new().get("by_id"));

        let (methods, params) = root.match_path("/users/7").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"by_id"));
        assert_eq!(params.get("id"), Some("7"));

        let (methods, params) = root.match_path("/users/alice").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"by_name"));
        assert_eq!(params.get("name"), Some("alice"));
    }

    #[test]
    fn test_backtracking_drops_stale_captures() {
        let mut root = Node::root();
        insert(&mut root, "/a/{x:[0-9]+}/end", MethodRouter::new().get("digits"));
        insert(&mut root, "/a/{y}/other", MethodRouter::new().get("other"));

        let (methods, params) = root.match_path("/a/5/other").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"other"));
        assert_eq!(params.get("x"), None);
        assert_eq!(params.get("y"), Some("5"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_static_priority_over_param() {
        let mut root = Node::root();
        insert(&mut root, "/users/me", MethodRouter::new().get("me"));
        insert(&mut root, "/users/{user_id}", MethodRouter::new().get("user"));

        let (methods, params) = root.match_path("/users/me").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"me"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_wildcard_captures_remainder() {
        let mut root = Node::root();
        insert(&mut root, "/static/*path", MethodRouter::new().get("files"));

        let (_, params) = root.match_path("/static/css/site.css").unwrap();
        assert_eq!(params.get("path"), Some("css/site.css"));
    }

    #[test]
    fn test_insert_reports_conflict() {
        let mut root: Node<&'static str> = Node::root();
        let segments = parse_pattern("/users/{user_id}").unwrap();
        root.insert(&segments, MethodRouter::new().get("a")).unwrap();

        let err = root
            .insert(&segments, MethodRouter::new().get("b"))
            .unwrap_err();
        assert_eq!(err, Method::GET);
    }
    #[test]
    fn test_parse_mixed_segments() {
        let segments = parse_pattern("/api/v{version}/{name}.{ext:[a-z]+}").unwrap();
        assert_eq!(segments.len(), 3);

        let SegmentKind::Mixed(version) = &segments[1] else {
            panic!("unexpected segment {:?}", segments[1]);
        };
        assert_eq!(version.as_str(), "v{version}");
        assert_eq!(version.names(), ["version"]);

        let SegmentKind::Mixed(file) = &segments[2] else {
            panic!("unexpected segment {:?}", segments[2]);
        };
        assert_eq!(file.names(), ["name", "ext"]);
    }

    #[test]
    fn test_parse_pattern_nested_braces() {
        let segments = parse_pattern("/codes/{code:[A-Z]{3}}").unwrap();
        match &segments[1] {
            SegmentKind::Param { name, constraint } => {
                assert_eq!(name, "code");
                assert_eq!(constraint.as_ref().map(Constraint::as_str), Some("[A-Z]{3}"));
            }
            other => panic!("unexpected segment {other:?}"),
        }
    }

    #[test]
    fn test_constraint_with_slash_is_rejected() {
        let err = parse_pattern("/files/{path:[a-z/]+}/raw").unwrap_err();
        assert!(matches!(
            err,
            RouteError::ConstraintSpansSegments { ref param, .. } if param == "path"
        ));
        assert!(matches!(
            parse_pattern("/files/v{path:.+/.+}"),
            Err(RouteError::ConstraintSpansSegments { .. })
        ));
    }

    #[test]
    fn test_mixed_segment_captures() {
        let mut root = Node::root();
        insert(&mut root, "/api/v{version}/items", MethodRouter::new().get("items"));
        insert(&mut root, "/files/{version}.json", MethodRouter::new().get("json"));
        insert(&mut root, "/files/{name}", MethodRouter::new().get("plain"));

        let (methods, params) = root.match_path("/api/v2/items").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"items"));
        assert_eq!(params.get("version"), Some("2"));

        let (methods, params) = root.match_path("/files/1.2.json").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"json"));
        assert_eq!(params.get("version"), Some("1.2"));

        let (methods, params) = root.match_path("/files/1.2.xml").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"plain"));
        assert_eq!(params.get("name"), Some("1.2.xml"));

        assert!(root.match_path("/api/v/items").is_none());
        assert!(root.match_path("/api/2/items").is_none());
    }

    #[test]
    fn test_mixed_segment_honours_constraints() {
        let mut root = Node::root();
        insert(&mut root, "/api/v{version:[0-9]+}", MethodRouter::new().get("numeric"));

        assert!(root.match_path("/api/v12").is_some());
        assert!(root.match_path("/api/vx").is_none());
    }

    #[test]
    fn test_empty_segments_are_significant() {
        let mut root = Node::root();
        insert(&mut root, "/users/{id}", MethodRouter::new().get("user"));
        insert(&mut root, "/users/", MethodRouter::new().get("index"));

        assert!(root.match_path("/users/12").is_some());
        assert!(root.match_path("/users/12/").is_none());
        assert!(root.match_path("//users/12").is_none());

        let (methods, params) = root.match_path("/users/").unwrap();
        assert_eq!(methods.handler(&Method::GET), Some(&"index"));
        assert!(params.is_empty());
    }
}
