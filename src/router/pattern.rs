//! Parsed path patterns.
//!
//! A pattern such as `/users/{id}/files/**` is split into typed segments once,
//! at registration time. The trie and the descriptor both keep the parsed form
//! so the hot path never re-parses pattern text.

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, RouterError};

static PARAM_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("Failed to compile param name regex")
});

/// One segment of a [`PathPattern`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matches exactly this text
    Literal(String),
    /// Matches any one segment and captures it under the name
    Param(Arc<str>),
    /// `*`: matches any one segment without capturing
    SingleWildcard,
    /// `**`: matches zero or more trailing segments
    MultiWildcard,
}

/// A normalized, parsed path pattern.
///
/// Invariant: [`Segment::MultiWildcard`] only ever appears as the last segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
    separator: char,
}

impl PathPattern {
    /// Parse pattern text, normalizing separators on the way.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] when `**` is not the final
    /// segment or a `{param}` name is malformed.
    pub fn parse(raw: &str, separator: char) -> Result<Self> {
        let parts = normalize(raw, separator);
        let mut segments = Vec::with_capacity(parts.len());

        for (idx, part) in parts.iter().enumerate() {
            let segment = match *part {
                "**" => {
                    if idx + 1 != parts.len() {
                        return Err(RouterError::InvalidPattern {
                            pattern: raw.to_string(),
                            reason: "'**' may only appear as the last segment".to_string(),
                        });
                    }
                    Segment::MultiWildcard
                }
                "*" => Segment::SingleWildcard,
                p if p.len() >= 2 && p.starts_with('{') && p.ends_with('}') => {
                    let name = &p[1..p.len() - 1];
                    if !PARAM_NAME.is_match(name) {
                        return Err(RouterError::InvalidPattern {
                            pattern: raw.to_string(),
                            reason: format!("invalid parameter name '{name}'"),
                        });
                    }
                    Segment::Param(Arc::from(name))
                }
                p => Segment::Literal(p.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            segments,
            separator,
        })
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Names of the `{param}` segments, in path order.
    pub fn param_names(&self) -> impl Iterator<Item = &Arc<str>> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name),
            _ => None,
        })
    }

    /// Whether the pattern ends in `**`.
    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::MultiWildcard))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{}", self.separator);
        }
        for segment in &self.segments {
            write!(f, "{}", self.separator)?;
            match segment {
                Segment::Literal(text) => write!(f, "{text}")?,
                Segment::Param(name) => write!(f, "{{{name}}}")?,
                Segment::SingleWildcard => write!(f, "*")?,
                Segment::MultiWildcard => write!(f, "**")?,
            }
        }
        Ok(())
    }
}

/// Trim the path, collapse duplicate separators and strip surrounding
/// separators. Whitespace inside a segment is kept.
pub fn normalize(path: &str, separator: char) -> SmallVec<[&str; 8]> {
    path.trim()
        .split(separator)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Canonical string form of a path: leading separator, no trailing one.
#[must_use]
pub fn normalize_path(path: &str, separator: char) -> String {
    let parts = normalize(path, separator);
    if parts.is_empty() {
        return separator.to_string();
    }
    let mut out = String::with_capacity(path.len() + 1);
    for part in parts {
        out.push(separator);
        out.push_str(part);
    }
    out
}

/// Join a namespace prefix and a handler pattern.
#[must_use]
pub fn join_prefix(prefix: &str, pattern: &str, separator: char) -> String {
    let mut joined = normalize_path(prefix, separator);
    let rest = normalize_path(pattern, separator);
    if joined.len() == separator.len_utf8() {
        return rest;
    }
    if rest.len() > separator.len_utf8() {
        joined.push_str(&rest);
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_segment_kinds() {
        let p = PathPattern::parse("/files/{id}/*/**", '/').unwrap();
        assert_eq!(
            p.segments(),
            &[
                Segment::Literal("files".to_string()),
                Segment::Param(Arc::from("id")),
                Segment::SingleWildcard,
                Segment::MultiWildcard,
            ]
        );
        assert!(p.is_catch_all());
        assert_eq!(p.to_string(), "/files/{id}/*/**");
    }

    #[test]
    fn test_multi_wildcard_must_be_last() {
        let err = PathPattern::parse("/a/**/b", '/').unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { .. }));
    }

    #[test]
    fn test_invalid_param_name() {
        assert!(PathPattern::parse("/a/{1x}", '/').is_err());
        assert!(PathPattern::parse("/a/{}", '/').is_err());
    }

    #[test]
    fn test_normalization() {
        let p = PathPattern::parse("  //users///{id}/ ", '/').unwrap();
        assert_eq!(p.to_string(), "/users/{id}");
        assert_eq!(PathPattern::parse("/", '/').unwrap().to_string(), "/");
        assert_eq!(normalize_path("a//b/", '/'), "/a/b");
        assert_eq!(normalize_path(" /a /b ", '/'), "/a /b");
    }

    #[test]
    fn test_join_prefix() {
        assert_eq!(join_prefix("/admin/", "/panel", '/'), "/admin/panel");
        assert_eq!(join_prefix("", "/panel", '/'), "/panel");
        assert_eq!(join_prefix("/admin", "/", '/'), "/admin");
        assert_eq!(join_prefix("/", "/", '/'), "/");
    }
}
