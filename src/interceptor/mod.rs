//! # Interceptor Module
//!
//! Cross-cutting behavior around handler execution, and the registry that
//! composes each handler's chain.
//!
//! ## Chain Composition
//!
//! For a handler the [`InterceptorRegistry`] builds, in order:
//!
//! 1. the handler's own stack, or its namespace's declaration, or the
//!    router-wide default stack
//! 2. the handler's explicit interceptor names (added, not replacing)
//! 3. every filtered stack (`include`/`exclude` globs) matching the
//!    handler's pattern, by ascending `order`
//! 4. every matching [`AopRule`], by ascending `order` then registration:
//!    `add_before` prepends, `add_after` appends, `override` replaces
//!
//! The first element runs first and wraps everything after it; the handler
//! is the innermost link.
//!
//! ## Writing Interceptors
//!
//! ```rust
//! use actionrouter::action::Outcome;
//! use actionrouter::dispatcher::InvocationContext;
//! use actionrouter::interceptor::{Interceptor, Next};
//! use actionrouter::Result;
//!
//! struct Deny;
//!
//! impl Interceptor for Deny {
//!     fn intercept(&self, ctx: &mut InvocationContext<'_>, next: Next<'_>) -> Result<Outcome> {
//!         if ctx.path_param("id") == Some("0") {
//!             return Ok(Outcome::result("denied"));
//!         }
//!         next.run(ctx)
//!     }
//! }
//! ```

mod core;
mod metrics;
mod registry;
mod tracing;

pub use core::{
    interceptor_error, interceptor_fn, FnInterceptor, Interceptor, NamedInterceptor, Next,
};
pub use metrics::{MetricsInterceptor, PatternStats};
pub use registry::{AopOperation, AopRule, InterceptorRegistry, InterceptorStackDescriptor};
pub use tracing::TracingInterceptor;
