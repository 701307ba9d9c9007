use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::context::{InvocationContext, InvocationState};
use crate::error::{Result, RouterError};
use crate::ids::InvocationId;
use crate::interceptor::Next;
use crate::router::RouteMatch;
use crate::service::ActionRouter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Full interceptor chain around the handler
    Chain,
    /// Handler only, no interceptors
    HandlerOnly,
}

/// Drives one invocation through resolve → chain → execute → result dispatch.
///
/// The pipeline itself is stateless; everything per call lives in the
/// [`InvocationContext`] it creates. Cheap to construct, so
/// [`ActionRouter::dispatch`] builds one per call.
#[derive(Clone, Copy)]
pub struct InvocationPipeline<'r> {
    router: &'r ActionRouter,
}

impl<'r> InvocationPipeline<'r> {
    #[must_use]
    pub fn new(router: &'r ActionRouter) -> Self {
        Self { router }
    }

    /// Resolve `path`, run its interceptor chain and handler, then apply the
    /// selected result.
    ///
    /// # Errors
    ///
    /// [`RouterError::NotFound`] when nothing matches `path`; otherwise the
    /// first failure raised by an interceptor, the handler, the parameter
    /// converter or a result type.
    pub fn dispatch(&self, path: &str, params: Vec<Value>) -> Result<Value> {
        self.run(InvocationId::new(), path, params, 0, Mode::Chain)
    }

    /// [`dispatch`](Self::dispatch) under a caller-supplied invocation id.
    pub fn dispatch_with_id(
        &self,
        id: InvocationId,
        path: &str,
        params: Vec<Value>,
    ) -> Result<Value> {
        self.run(id, path, params, 0, Mode::Chain)
    }

    /// Resolve `path` and invoke the handler without any interceptors.
    ///
    /// Result dispatch still applies, so forwards and renders behave as in a
    /// full dispatch.
    pub fn invoke_handler_only(&self, path: &str, params: Vec<Value>) -> Result<Value> {
        self.run(InvocationId::new(), path, params, 0, Mode::HandlerOnly)
    }

    pub(crate) fn forward(
        &self,
        id: InvocationId,
        path: &str,
        params: Vec<Value>,
        depth: usize,
    ) -> Result<Value> {
        self.run(id, path, params, depth, Mode::Chain)
    }

    fn run(
        &self,
        id: InvocationId,
        path: &str,
        params: Vec<Value>,
        depth: usize,
        mode: Mode,
    ) -> Result<Value> {
        let start = Instant::now();
        debug!(
            invocation_id = %id,
            path = %path,
            depth = depth,
            mode = ?mode,
            state = %InvocationState::Created,
            "Invocation created"
        );

        let Some(RouteMatch {
            descriptor,
            path_params,
        }) = self.router.resolve(path)
        else {
            warn!(
                invocation_id = %id,
                path = %path,
                depth = depth,
                state = %InvocationState::Failed,
                "No handler registered for path"
            );
            return Err(RouterError::NotFound {
                path: path.to_string(),
            });
        };

        let mut ctx = InvocationContext::new(
            self.router,
            id,
            path.to_string(),
            descriptor,
            path_params,
            params,
            depth,
        );

        let result = self.execute(&mut ctx, mode);
        let latency_us = saturating_micros(start.elapsed());

        match &result {
            Ok(_) => {
                ctx.set_state(InvocationState::Completed);
                if depth == 0 {
                    info!(
                        invocation_id = %id,
                        path = %path,
                        pattern = %ctx.descriptor().path(),
                        latency_us = latency_us,
                        "Invocation completed"
                    );
                }
            }
            Err(e) => {
                ctx.set_state(InvocationState::Failed);
                error!(
                    invocation_id = %id,
                    path = %path,
                    pattern = %ctx.descriptor().path(),
                    depth = depth,
                    kind = ?e.kind(),
                    error = %e,
                    latency_us = latency_us,
                    "Invocation failed"
                );
            }
        }
        result
    }

    fn execute(&self, ctx: &mut InvocationContext<'r>, mode: Mode) -> Result<Value> {
        let outcome = match mode {
            Mode::Chain => {
                ctx.set_state(InvocationState::Chaining);
                let chain = self.router.chain_for(ctx.descriptor())?;
                debug!(
                    invocation_id = %ctx.id(),
                    pattern = %ctx.descriptor().path(),
                    chain_len = chain.len(),
                    "Interceptor chain built"
                );
                Next::new(&chain).run(ctx)?
            }
            Mode::HandlerOnly => ctx.invoke_handler()?,
        };

        ctx.set_state(InvocationState::ResultDispatch);
        self.router.results().apply(ctx, outcome)
    }
}

/// Whole microseconds in `d`, clamped to `u64::MAX`.
pub(crate) fn saturating_micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

/// Whole nanoseconds in `d`, clamped to `u64::MAX`.
pub(crate) fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_conversion_saturates() {
        assert_eq!(saturating_micros(Duration::from_micros(1500)), 1500);
        assert_eq!(saturating_nanos(Duration::from_nanos(7)), 7);
        assert_eq!(saturating_micros(Duration::MAX), u64::MAX);
        assert_eq!(saturating_nanos(Duration::MAX), u64::MAX);
    }
}
