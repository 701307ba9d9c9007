//! # Dispatcher Module
//!
//! The per-call invocation pipeline: resolve a path, build the interceptor
//! chain, run it around the handler, and hand the outcome to result
//! dispatch.
//!
//! ## State Machine
//!
//! ```text
//! Created → Resolving → Chaining → Executing → ResultDispatch → Completed
//!                                                      │
//!                                                      └→ Forwarded → Resolving …
//! (any step) → Failed
//! ```
//!
//! Each call owns an [`InvocationContext`]; the context carries the resolved
//! descriptor, path captures, call parameters and a reference to the router
//! (for forwarding). It is passed explicitly to every interceptor, the
//! handler and the result type, never stored in ambient state.
//!
//! ## Error Handling
//!
//! The pipeline never retries and never swallows failures. A path that does
//! not resolve becomes [`RouterError::NotFound`](crate::RouterError::NotFound)
//! at this boundary; everything else propagates as raised.
//!
//! ## Forwarding
//!
//! A `forward` result re-enters the pipeline one level deeper with the same
//! invocation id and the caller's original parameters. There is no depth
//! limit; callers must avoid self-referential forwards.

mod context;
mod core;

pub use context::{InvocationContext, InvocationState};
pub use core::InvocationPipeline;
pub(crate) use core::{saturating_micros, saturating_nanos};
