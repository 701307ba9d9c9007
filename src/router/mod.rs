//! # Router Module
//!
//! The router module resolves an abstract request path (any separator-delimited
//! string key) to a registered handler descriptor.
//!
//! ## Overview
//!
//! Patterns are parsed once at registration into typed segments:
//!
//! - `users`: literal text
//! - `{id}`: one segment, captured under `id`
//! - `*`: one segment, not captured
//! - `**`: zero or more trailing segments (final segment only)
//!
//! and stored in a segment trie. Resolution walks the trie with a fixed
//! priority order, **literal > param > `*` > `**`**, backtracking when a
//! branch dead-ends, so the most specific pattern always wins regardless of
//! registration order.
//!
//! ## Example
//!
//! ```rust
//! use actionrouter::action::{HandlerRegistration, HandlerTarget, Outcome};
//! use actionrouter::service::ActionRouter;
//!
//! # fn main() -> Result<(), actionrouter::RouterError> {
//! let mut router = ActionRouter::new();
//! router.register_handler(HandlerRegistration::new(
//!     "/users/{id}",
//!     HandlerTarget::from_fn(|_, _| Ok(Outcome::default())),
//! ))?;
//!
//! let matched = router.resolve("/users/42").expect("route");
//! assert_eq!(matched.get_path_param("id"), Some("42"));
//! # Ok(())
//! # }
//! ```

mod core;
mod pattern;
mod radix;

pub use core::{ParamVec, RouteMatch, RouteTrie, MAX_INLINE_PARAMS};
pub use pattern::{join_prefix, normalize_path, PathPattern, Segment};
