//! Route pattern compilation and matching.
//!
//! A pattern such as `/users/{id}/posts` compiles into a list of [`Segment`]s.
//! Matching a request path is a segment-by-segment comparison: the segment counts
//! must be equal, literals compare byte for byte against the raw segment, and
//! parameters bind any non-empty segment, percent-decoded. There are no wildcard
//! segments and no prefix matches.

use crate::context::percent_decode;
use crate::errors::RegistrationError;
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Maximum number of path parameters before heap allocation.
/// Most REST APIs have ≤4 path params (e.g., /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Per-request parameter bindings in pattern order.
///
/// Param names use `Arc<str>` because they come from the compiled pattern and are
/// shared by every request; values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Request path segments, borrowed from the request path.
pub type PathSegments<'a> = SmallVec<[&'a str; MAX_INLINE_PARAMS]>;

static PARAM_NAME: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("parameter name regex is valid")
});

/// One component of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly this text
    Literal(Box<str>),
    /// Matches any non-empty segment and binds it to the name
    Param(Arc<str>),
}

impl Segment {
    #[inline]
    fn is_literal(&self) -> bool {
        matches!(self, Segment::Literal(_))
    }
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Compile a pattern string.
    ///
    /// Empty segments are dropped, so `/`, `//` and `` all compile to the root
    /// pattern and `/users/` is the same as `/users`. A segment is a parameter only
    /// when it is exactly `{name}`; any other use of braces is rejected.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::InvalidPattern`] for malformed braces, parameter names
    /// that are not identifiers, and parameter names repeated within the pattern.
    pub fn parse(pattern: &str) -> Result<Self, RegistrationError> {
        let invalid = |reason: String| RegistrationError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        for seg in pattern.split('/').filter(|s| !s.is_empty()) {
            if let Some(name) = seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                if !PARAM_NAME.is_match(name) {
                    return Err(invalid(format!("'{name}' is not a valid parameter name")));
                }
                let duplicate = segments
                    .iter()
                    .any(|s| matches!(s, Segment::Param(existing) if existing.as_ref() == name));
                if duplicate {
                    return Err(invalid(format!("parameter '{name}' appears more than once")));
                }
                segments.push(Segment::Param(Arc::from(name)));
            } else if seg.contains(['{', '}']) {
                return Err(invalid(format!(
                    "segment '{seg}' mixes literal text and braces"
                )));
            } else {
                segments.push(Segment::Literal(seg.into()));
            }
        }

        Ok(Self {
            raw: canonical_text(&segments),
            segments,
        })
    }

    /// Build a pattern from the segments of two patterns, `prefix` first.
    ///
    /// # Errors
    ///
    /// Fails when a parameter name occurs in both halves.
    pub fn join(prefix: &RoutePattern, inner: &RoutePattern) -> Result<Self, RegistrationError> {
        for seg in &inner.segments {
            if let Segment::Param(name) = seg {
                if prefix.param_names().any(|p| p == name.as_ref()) {
                    return Err(RegistrationError::InvalidPattern {
                        pattern: format!("{}{}", prefix.prefix_text(), inner.raw),
                        reason: format!("parameter '{name}' appears more than once"),
                    });
                }
            }
        }
        let segments: Vec<Segment> = prefix
            .segments
            .iter()
            .chain(inner.segments.iter())
            .cloned()
            .collect();
        Ok(Self {
            raw: canonical_text(&segments),
            segments,
        })
    }

    /// Canonical text of the pattern (leading `/`, no empty segments)
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Compiled segments in order
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the parameters in pattern order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_ref()),
            Segment::Literal(_) => None,
        })
    }

    /// Whether two patterns are the same route regardless of parameter names.
    #[must_use]
    pub fn same_shape(&self, other: &RoutePattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| match (a, b) {
                    (Segment::Literal(x), Segment::Literal(y)) => x == y,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }

    /// Test a split request path against the pattern.
    ///
    /// Returns the bindings in pattern order, or `None` when the path does not match.
    /// Bound values are percent-decoded; an encoded `/` does not split a segment.
    #[must_use]
    pub fn matches(&self, path: &[&str]) -> Option<ParamVec> {
        if path.len() != self.segments.len() {
            return None;
        }
        let mut params = ParamVec::new();
        for (seg, value) in self.segments.iter().zip(path) {
            match seg {
                Segment::Literal(lit) => {
                    if lit.as_ref() != *value {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if value.is_empty() {
                        return None;
                    }
                    params.push((Arc::clone(name), percent_decode(value).into_owned()));
                }
            }
        }
        Some(params)
    }

    /// Precedence between two patterns that both match the same path.
    ///
    /// At the first position where one pattern has a literal and the other a
    /// parameter, the literal wins. `Ordering::Greater` means `self` is preferred.
    #[must_use]
    pub fn precedence(&self, other: &RoutePattern) -> Ordering {
        for (a, b) in self.segments.iter().zip(&other.segments) {
            match (a.is_literal(), b.is_literal()) {
                (true, false) => return Ordering::Greater,
                (false, true) => return Ordering::Less,
                _ => {}
            }
        }
        Ordering::Equal
    }

    fn prefix_text(&self) -> &str {
        if self.segments.is_empty() {
            ""
        } else {
            &self.raw
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn canonical_text(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    let mut out = String::new();
    for seg in segments {
        out.push('/');
        match seg {
            Segment::Literal(lit) => out.push_str(lit),
            Segment::Param(name) => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
    }
    out
}

/// Split a request path into segments.
///
/// Exactly one leading `/` is removed and `/` itself yields no segments. Every
/// other empty segment is kept, so `/users/` is `["users", ""]` and matches no
/// pattern.
#[must_use]
pub fn split_path(path: &str) -> PathSegments<'_> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return PathSegments::new();
    }
    trimmed.split('/').collect()
}
