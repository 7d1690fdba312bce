//! Dotted symbol paths.
//!
//! A definitions key such as `process.env.NODE_ENV` or `typeof window` is
//! parsed once at registration time into its fragments plus a flag recording
//! whether the key was a `typeof` query.

use std::fmt;

/// Marker that turns a key into a `typeof` query.
const TYPEOF_MARKER: &str = "typeof";

/// A parsed definitions key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SymbolPath {
    segments: Vec<String>,
    is_typeof_query: bool,
}

impl SymbolPath {
    /// Parse a full dotted key.
    ///
    /// A leading `typeof` followed by at least one whitespace character is
    /// stripped and recorded. The marker is only recognised at the very start
    /// of the key.
    pub fn parse(key: &str) -> Self {
        let (rest, is_typeof_query) = match strip_typeof_marker(key) {
            Some(rest) => (rest, true),
            None => (key, false),
        };
        SymbolPath {
            segments: rest.split('.').map(str::to_owned).collect(),
            is_typeof_query,
        }
    }

    #[inline]
    pub fn is_typeof_query(&self) -> bool {
        self.is_typeof_query
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The path joined with `.`, without any `typeof` marker.
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    /// Every non-empty strict prefix, shortest first.
    ///
    /// For `a.b.c` this yields `a` and `a.b`.
    pub fn strict_prefixes(&self) -> impl Iterator<Item = String> + '_ {
        (1..self.segments.len()).map(move |end| self.segments[..end].join("."))
    }
}

impl fmt::Display for SymbolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_typeof_query {
            write!(f, "{TYPEOF_MARKER} ")?;
        }
        f.write_str(&self.dotted())
    }
}

fn strip_typeof_marker(key: &str) -> Option<&str> {
    let rest = key.strip_prefix(TYPEOF_MARKER)?;
    let trimmed = rest.trim_start();
    // `typeofFoo` is an ordinary identifier, not a query
    if trimmed.len() == rest.len() || trimmed.is_empty() {
        return None;
    }
    Some(trimmed)
}
