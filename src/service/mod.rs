//! # Service Module
//!
//! [`ActionRouter`] ties the trie, the interceptor registry and the result
//! dispatcher together behind one registration surface and one invocation
//! surface. [`SharedRouter`] wraps a built router for lock-free sharing and
//! atomic replacement.
//!
//! ## Lifecycle
//!
//! 1. Build: `register_*` / `add_aop_rule` calls on an owned router
//! 2. Serve: share it (`Arc`, `SharedRouter`) and call `dispatch` from any
//!    thread
//! 3. Tear down: drop it, or `clear()` to release every registration
//!
//! ```rust
//! use actionrouter::action::{HandlerRegistration, HandlerTarget, Outcome, ResultDescriptor};
//! use actionrouter::service::ActionRouter;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), actionrouter::RouterError> {
//! let mut router = ActionRouter::new();
//! router.register_handler(
//!     HandlerRegistration::new("/old", HandlerTarget::from_fn(|_, _| Ok(Outcome::default())))
//!         .result(ResultDescriptor::forward("success", "/new")),
//! )?;
//! router.register_handler(HandlerRegistration::new(
//!     "/new",
//!     HandlerTarget::from_fn(|_, args| Ok(Outcome::new(json!({ "args": args })))),
//! ))?;
//!
//! let value = router.dispatch("/old", vec![json!(1)])?;
//! assert_eq!(value, json!({ "args": [1] }));
//! # Ok(())
//! # }
//! ```

mod core;
mod shared;

pub use core::ActionRouter;
pub use shared::SharedRouter;
