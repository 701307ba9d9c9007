use std::fmt;
use std::sync::Arc;
use tracing::trace;

use crate::action::Outcome;
use crate::dispatcher::InvocationContext;
use crate::error::{Result, RouterError};

/// A unit of cross-cutting behavior wrapped around handler execution.
///
/// An interceptor receives the invocation context and the continuation
/// `next`. Calling [`Next::run`] executes the rest of the chain and finally
/// the handler; not calling it short-circuits with whatever the interceptor
/// returns.
pub trait Interceptor: Send + Sync {
    fn intercept(&self, ctx: &mut InvocationContext<'_>, next: Next<'_>) -> Result<Outcome>;
}

/// Continuation over the remaining interceptors and the handler.
///
/// Consumed by value, so one interceptor can run the rest of its chain at
/// most once.
#[must_use = "the rest of the chain only runs when `run` is called"]
pub struct Next<'a> {
    chain: &'a [NamedInterceptor],
}

impl<'a> Next<'a> {
    pub(crate) fn new(chain: &'a [NamedInterceptor]) -> Self {
        Self { chain }
    }

    /// Interceptors still to run before the handler.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chain.len()
    }

    /// Run the rest of the chain, then the handler.
    pub fn run(self, ctx: &mut InvocationContext<'_>) -> Result<Outcome> {
        match self.chain.split_first() {
            Some((head, rest)) => {
                trace!(
                    invocation_id = %ctx.id(),
                    interceptor = %head.name(),
                    remaining = rest.len(),
                    "Entering interceptor"
                );
                head.inner.intercept(ctx, Next::new(rest))
            }
            None => ctx.invoke_handler(),
        }
    }
}

/// An interceptor together with the name it was registered under.
#[derive(Clone)]
pub struct NamedInterceptor {
    name: Arc<str>,
    inner: Arc<dyn Interceptor>,
}

impl NamedInterceptor {
    pub fn new(name: impl Into<Arc<str>>, inner: Arc<dyn Interceptor>) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn interceptor(&self) -> &Arc<dyn Interceptor> {
        &self.inner
    }
}

impl fmt::Debug for NamedInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NamedInterceptor").field(&self.name).finish()
    }
}

/// Adapter turning a closure into an [`Interceptor`].
pub struct FnInterceptor<F>(F);

impl<F> Interceptor for FnInterceptor<F>
where
    F: Fn(&mut InvocationContext<'_>, Next<'_>) -> Result<Outcome> + Send + Sync,
{
    fn intercept(&self, ctx: &mut InvocationContext<'_>, next: Next<'_>) -> Result<Outcome> {
        (self.0)(ctx, next)
    }
}

/// Wrap a closure as an interceptor.
///
/// ```rust
/// use actionrouter::interceptor::interceptor_fn;
///
/// let audit = interceptor_fn(|ctx, next| {
///     ctx.set_attribute("audited", serde_json::Value::Bool(true));
///     next.run(ctx)
/// });
/// ```
pub fn interceptor_fn<F>(f: F) -> FnInterceptor<F>
where
    F: Fn(&mut InvocationContext<'_>, Next<'_>) -> Result<Outcome> + Send + Sync,
{
    FnInterceptor(f)
}

/// Wrap an `anyhow` failure raised inside interceptor `name`.
pub fn interceptor_error(name: &str, source: anyhow::Error) -> RouterError {
    RouterError::invocation(format!("interceptor '{name}'"), source)
}
