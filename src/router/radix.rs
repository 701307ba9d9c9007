//! Segment trie for route resolution
//!
//! Each node represents one path segment. Children are tried in a fixed
//! priority order so resolution is deterministic regardless of registration
//! order:
//!
//! 1. literal children (exact text)
//! 2. the `{param}` child (captures the segment)
//! 3. the `*` child
//! 4. `**` catch-alls, only once every literal/param/`*` descent has failed
//!
//! Parameter names are not stored on nodes. A node has at most one param
//! child shared by every pattern with a parameter at that position; captured
//! values are positional and get their names from the pattern of the
//! descriptor that finally matched. `/users/{id}/posts` and
//! `/users/{user_id}/comments` therefore share a node but still bind
//! different names.

use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::Arc;

use super::pattern::Segment;
use crate::action::HandlerDescriptor;

/// Positional captures collected while descending.
pub(crate) type Captures = SmallVec<[String; 8]>;

/// Node in the segment trie
#[derive(Clone, Default)]
pub(crate) struct TrieNode {
    /// Literal text of this node (empty for root, param and wildcard nodes)
    segment: Cow<'static, str>,
    /// Handler terminating exactly at this node
    handler: Option<Arc<HandlerDescriptor>>,
    /// Handler registered as `<this node>/**`
    catch_all: Option<Arc<HandlerDescriptor>>,
    /// Literal children, in registration order
    children: Vec<TrieNode>,
    /// `{param}` child
    param_child: Option<Box<TrieNode>>,
    /// `*` child
    wildcard_child: Option<Box<TrieNode>>,
}

impl TrieNode {
    fn literal(segment: &str) -> Self {
        Self {
            segment: Cow::Owned(segment.to_string()),
            ..Self::default()
        }
    }

    /// Insert a descriptor at the position described by `segments`.
    ///
    /// Returns the descriptor already occupying that slot on conflict. Empty
    /// intermediate nodes created before the conflict is detected do not
    /// change what resolves.
    pub(crate) fn insert(
        &mut self,
        segments: &[Segment],
        descriptor: Arc<HandlerDescriptor>,
    ) -> Result<(), Arc<HandlerDescriptor>> {
        let Some((segment, remaining)) = segments.split_first() else {
            return match &self.handler {
                Some(existing) => Err(Arc::clone(existing)),
                None => {
                    self.handler = Some(descriptor);
                    Ok(())
                }
            };
        };

        match segment {
            Segment::MultiWildcard => match &self.catch_all {
                Some(existing) => Err(Arc::clone(existing)),
                None => {
                    self.catch_all = Some(descriptor);
                    Ok(())
                }
            },
            Segment::Param(_) => self
                .param_child
                .get_or_insert_with(Box::default)
                .insert(remaining, descriptor),
            Segment::SingleWildcard => self
                .wildcard_child
                .get_or_insert_with(Box::default)
                .insert(remaining, descriptor),
            Segment::Literal(text) => {
                let idx = match self.children.iter().position(|c| c.segment == text.as_str()) {
                    Some(idx) => idx,
                    None => {
                        self.children.push(TrieNode::literal(text));
                        self.children.len() - 1
                    }
                };
                self.children[idx].insert(remaining, descriptor)
            }
        }
    }

    /// Exact descent: literal, then param, then `*`, with backtracking.
    pub(crate) fn search_exact(
        &self,
        segments: &[&str],
        captures: &mut Captures,
    ) -> Option<Arc<HandlerDescriptor>> {
        let Some((&segment, remaining)) = segments.split_first() else {
            return self.handler.clone();
        };

        if let Some(child) = self.children.iter().find(|c| c.segment == segment) {
            if let Some(found) = child.search_exact(remaining, captures) {
                return Some(found);
            }
        }

        if let Some(param) = &self.param_child {
            captures.push(segment.to_string());
            if let Some(found) = param.search_exact(remaining, captures) {
                return Some(found);
            }
            // Backtrack: drop the capture if this branch fails
            captures.pop();
        }

        if let Some(wildcard) = &self.wildcard_child {
            if let Some(found) = wildcard.search_exact(remaining, captures) {
                return Some(found);
            }
        }

        None
    }

    /// Catch-all descent, run only after [`search_exact`](Self::search_exact)
    /// found nothing. Deeper catch-alls win over shallower ones; between
    /// branches the literal > param > `*` order still applies.
    pub(crate) fn search_catch_all(
        &self,
        segments: &[&str],
        captures: &mut Captures,
    ) -> Option<Arc<HandlerDescriptor>> {
        if let Some((&segment, remaining)) = segments.split_first() {
            if let Some(child) = self.children.iter().find(|c| c.segment == segment) {
                if let Some(found) = child.search_catch_all(remaining, captures) {
                    return Some(found);
                }
            }

            if let Some(param) = &self.param_child {
                captures.push(segment.to_string());
                if let Some(found) = param.search_catch_all(remaining, captures) {
                    return Some(found);
                }
                captures.pop();
            }

            if let Some(wildcard) = &self.wildcard_child {
                if let Some(found) = wildcard.search_catch_all(remaining, captures) {
                    return Some(found);
                }
            }
        }

        self.catch_all.clone()
    }

    /// Collect every descriptor below this node in priority order.
    pub(crate) fn collect(&self, out: &mut Vec<Arc<HandlerDescriptor>>) {
        if let Some(handler) = &self.handler {
            out.push(Arc::clone(handler));
        }
        for child in &self.children {
            child.collect(out);
        }
        if let Some(param) = &self.param_child {
            param.collect(out);
        }
        if let Some(wildcard) = &self.wildcard_child {
            wildcard.collect(out);
        }
        if let Some(catch_all) = &self.catch_all {
            out.push(Arc::clone(catch_all));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{HandlerRegistration, HandlerTarget, Outcome};
    use crate::router::PathPattern;

    fn descriptor(pattern: &str) -> Arc<HandlerDescriptor> {
        let target = HandlerTarget::from_fn(|_, _| Ok(Outcome::default()));
        let reg = HandlerRegistration::new(pattern, target);
        let parsed = PathPattern::parse(pattern, '/').unwrap();
        Arc::new(HandlerDescriptor::from_registration(parsed, reg))
    }

    fn insert(root: &mut TrieNode, pattern: &str) -> Result<(), Arc<HandlerDescriptor>> {
        let d = descriptor(pattern);
        let segments = d.pattern().segments().to_vec();
        root.insert(&segments, d)
    }

    fn lookup(root: &TrieNode, path: &str) -> Option<(String, Captures)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut captures = Captures::new();
        let found = root
            .search_exact(&segments, &mut captures)
            .or_else(|| {
                captures.clear();
                root.search_catch_all(&segments, &mut captures)
            })?;
        Some((found.pattern().to_string(), captures))
    }

    #[test]
    fn test_literal_beats_param_beats_wildcard() {
        let mut root = TrieNode::default();
        insert(&mut root, "/aa/*/d1").unwrap();
        insert(&mut root, "/aa/{k}/d1").unwrap();
        insert(&mut root, "/aa/bb/d1").unwrap();

        assert_eq!(lookup(&root, "/aa/bb/d1").unwrap().0, "/aa/bb/d1");
        let (pattern, captures) = lookup(&root, "/aa/x/d1").unwrap();
        assert_eq!(pattern, "/aa/{k}/d1");
        assert_eq!(captures.as_slice(), &["x".to_string()]);
    }

    #[test]
    fn test_backtracks_out_of_literal_branch() {
        let mut root = TrieNode::default();
        insert(&mut root, "/aa/bb/only").unwrap();
        insert(&mut root, "/aa/{k}/d1").unwrap();

        let (pattern, captures) = lookup(&root, "/aa/bb/d1").unwrap();
        assert_eq!(pattern, "/aa/{k}/d1");
        assert_eq!(captures.as_slice(), &["bb".to_string()]);
    }

    #[test]
    fn test_backtracking_drops_stale_captures() {
        let mut root = TrieNode::default();
        insert(&mut root, "/a/{x}/b").unwrap();
        insert(&mut root, "/a/*/c").unwrap();

        let (pattern, captures) = lookup(&root, "/a/1/c").unwrap();
        assert_eq!(pattern, "/a/*/c");
        assert!(captures.is_empty());
    }

    #[test]
    fn test_catch_all_is_lowest_priority() {
        let mut root = TrieNode::default();
        insert(&mut root, "/aa/**").unwrap();
        insert(&mut root, "/aa/*/d1").unwrap();

        assert_eq!(lookup(&root, "/aa/x/d1").unwrap().0, "/aa/*/d1");
        assert_eq!(lookup(&root, "/aa/x/d2").unwrap().0, "/aa/**");
        assert_eq!(lookup(&root, "/aa").unwrap().0, "/aa/**");
    }

    #[test]
    fn test_deeper_catch_all_wins() {
        let mut root = TrieNode::default();
        insert(&mut root, "/**").unwrap();
        insert(&mut root, "/a/b/**").unwrap();

        assert_eq!(lookup(&root, "/a/b/c/d").unwrap().0, "/a/b/**");
        assert_eq!(lookup(&root, "/a/c").unwrap().0, "/**");
    }

    #[test]
    fn test_passing_through_non_terminal_is_no_match() {
        let mut root = TrieNode::default();
        insert(&mut root, "/a/b/c").unwrap();
        assert!(lookup(&root, "/a/b").is_none());
    }

    #[test]
    fn test_duplicate_slot_returns_existing() {
        let mut root = TrieNode::default();
        insert(&mut root, "/users/{id}").unwrap();
        let existing = insert(&mut root, "/users/{user_id}").unwrap_err();
        assert_eq!(existing.pattern().to_string(), "/users/{id}");
    }

    #[test]
    fn test_collect_lists_every_descriptor() {
        let mut root = TrieNode::default();
        insert(&mut root, "/a").unwrap();
        insert(&mut root, "/a/{b}").unwrap();
        insert(&mut root, "/a/**").unwrap();
        let mut out = Vec::new();
        root.collect(&mut out);
        let patterns: Vec<String> = out.iter().map(|d| d.pattern().to_string()).collect();
        assert_eq!(patterns, vec!["/a", "/a/{b}", "/a/**"]);
    }
}
