//! Router core module - hot path for path resolution.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::pattern::normalize;
use super::radix::{Captures, TrieNode};
use crate::action::HandlerDescriptor;
use crate::error::{Result, RouterError};

/// Maximum number of path parameters before heap allocation.
/// Most patterns have ≤4 params (e.g. /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Param names use `Arc<str>` shared with the registered pattern; values are
/// per-call data taken from the path.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Result of successfully resolving a path
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched handler descriptor
    pub descriptor: Arc<HandlerDescriptor>,
    /// Values captured by `{param}` segments, in path order
    pub path_params: ParamVec,
}

impl RouteMatch {
    /// Get a path parameter by name
    ///
    /// Uses "last write wins" semantics: if duplicate parameter names exist
    /// at different path depths (e.g., `/org/{id}/team/{team_id}/user/{id}`),
    /// returns the last occurrence.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert path_params to a HashMap
    /// Note: This allocates - use get_path_param() in hot paths instead
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Trie of registered handler patterns.
///
/// Built during a single-writer registration phase; afterwards [`resolve`]
/// only reads, so a fully built trie can be shared across threads without
/// locking.
///
/// [`resolve`]: RouteTrie::resolve
#[derive(Clone)]
pub struct RouteTrie {
    root: TrieNode,
    separator: char,
    len: usize,
    slow_threshold: Duration,
}

impl RouteTrie {
    /// Create an empty trie splitting paths on `separator`.
    #[must_use]
    pub fn new(separator: char) -> Self {
        Self {
            root: TrieNode::default(),
            separator,
            len: 0,
            slow_threshold: Duration::from_millis(1),
        }
    }

    /// Resolutions slower than `threshold` are logged at `warn`.
    #[must_use]
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    /// Number of registered descriptors
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Register a descriptor under its own pattern.
    ///
    /// # Errors
    ///
    /// [`RouterError::DuplicatePath`] when the normalized pattern shape is
    /// already taken. Parameter names do not distinguish shapes, so
    /// `/users/{id}` and `/users/{user_id}` collide. The existing entry is
    /// left untouched.
    pub fn register(&mut self, descriptor: Arc<HandlerDescriptor>) -> Result<()> {
        let pattern = descriptor.pattern();
        let segments = pattern.segments().to_vec();

        if let Err(existing) = self.root.insert(&segments, Arc::clone(&descriptor)) {
            warn!(
                pattern = %pattern,
                existing = %existing.pattern(),
                "Duplicate path pattern rejected"
            );
            return Err(RouterError::DuplicatePath {
                pattern: pattern.to_string(),
                existing: existing.pattern().to_string(),
            });
        }

        self.len += 1;
        info!(
            pattern = %pattern,
            lifecycle = ?descriptor.lifecycle(),
            namespace = ?descriptor.namespace(),
            routes_count = self.len,
            "Handler registered"
        );
        Ok(())
    }

    /// Resolve a path to its most specific descriptor.
    ///
    /// Returns `None` when nothing matches; the caller decides how to surface
    /// that.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        debug!(path = %path, "Route resolve attempt");
        let start = Instant::now();

        let segments = normalize(path, self.separator);
        let mut captures = Captures::new();
        let found = self.root.search_exact(&segments, &mut captures).or_else(|| {
            captures.clear();
            self.root.search_catch_all(&segments, &mut captures)
        });

        let elapsed = start.elapsed();

        let Some(descriptor) = found else {
            debug!(
                path = %path,
                duration_us = elapsed.as_micros(),
                "No route matched"
            );
            return None;
        };

        let path_params: ParamVec = descriptor
            .pattern()
            .param_names()
            .cloned()
            .zip(captures)
            .collect();

        if elapsed > self.slow_threshold {
            warn!(
                path = %path,
                pattern = %descriptor.pattern(),
                duration_us = elapsed.as_micros(),
                "Slow route resolution detected"
            );
        } else {
            debug!(
                path = %path,
                pattern = %descriptor.pattern(),
                path_params = ?path_params,
                duration_us = elapsed.as_micros(),
                "Route matched"
            );
        }

        Some(RouteMatch {
            descriptor,
            path_params,
        })
    }

    /// Every registered descriptor, literal branches first.
    #[must_use]
    pub fn descriptors(&self) -> Vec<Arc<HandlerDescriptor>> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect(&mut out);
        out
    }

    /// Drop every registration. Safe to call on an empty trie.
    pub fn clear(&mut self) {
        if self.len > 0 {
            info!(routes_count = self.len, "Route trie cleared");
        }
        self.root = TrieNode::default();
        self.len = 0;
    }
}
