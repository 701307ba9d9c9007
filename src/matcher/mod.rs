//! # Matcher Module
//!
//! Stateless glob matching between a single pattern and a single path. The
//! matcher is used wherever a path has to be compared against a glob rather
//! than resolved through the trie: interceptor stack `include`/`exclude`
//! filters and AOP rule `matches` patterns.
//!
//! ## Syntax
//!
//! - `?` matches exactly one character inside a segment
//! - `*` matches zero or more characters inside a segment; a segment that is
//!   exactly `*` matches any single non-empty segment
//! - `**` as a whole segment matches zero or more segments
//!
//! ```rust
//! use actionrouter::matcher::PathMatcher;
//!
//! let m = PathMatcher::default();
//! assert!(m.matches("/*/?", "/abc/d"));
//! assert!(m.matches("/abc/**", "/abc"));
//! assert!(m.match_start("/abc/*/def", "/abc/x"));
//! ```

mod core;

pub use core::PathMatcher;
