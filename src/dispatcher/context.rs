use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use super::core::InvocationPipeline;
use crate::action::{HandlerDescriptor, HandlerTarget, Outcome};
use crate::error::{Result, RouterError};
use crate::ids::InvocationId;
use crate::router::ParamVec;
use crate::service::ActionRouter;

/// Where an invocation currently is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    Created,
    Resolving,
    Chaining,
    Executing,
    ResultDispatch,
    Forwarded,
    Completed,
    Failed,
}

impl InvocationState {
    /// `Completed` and `Failed` end an invocation.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, InvocationState::Completed | InvocationState::Failed)
    }
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Per-call state threaded explicitly through interceptors, the handler and
/// result dispatch.
///
/// Owned by the call stack that created it; never shared between calls.
pub struct InvocationContext<'r> {
    router: &'r ActionRouter,
    id: InvocationId,
    path: String,
    descriptor: Arc<HandlerDescriptor>,
    path_params: ParamVec,
    original_params: Vec<Value>,
    params: Vec<Value>,
    depth: usize,
    state: InvocationState,
    executed: bool,
    outcome: Option<Outcome>,
    attributes: HashMap<String, Value>,
}

impl<'r> InvocationContext<'r> {
    pub(crate) fn new(
        router: &'r ActionRouter,
        id: InvocationId,
        path: String,
        descriptor: Arc<HandlerDescriptor>,
        path_params: ParamVec,
        params: Vec<Value>,
        depth: usize,
    ) -> Self {
        Self {
            router,
            id,
            path,
            descriptor,
            path_params,
            original_params: params.clone(),
            params,
            depth,
            state: InvocationState::Resolving,
            executed: false,
            outcome: None,
            attributes: HashMap::new(),
        }
    }

    /// Router that owns the invoked handler.
    #[must_use]
    pub fn router(&self) -> &'r ActionRouter {
        self.router
    }

    #[must_use]
    pub fn id(&self) -> InvocationId {
        self.id
    }

    /// Path as requested by the caller.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn descriptor(&self) -> &HandlerDescriptor {
        &self.descriptor
    }

    /// Values captured by `{param}` segments, in path order.
    #[must_use]
    pub fn path_params(&self) -> &ParamVec {
        &self.path_params
    }

    /// Captured value for `name`; the last capture wins on duplicates.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Raw positional call parameters.
    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Parameters exactly as the caller passed them, before any rewrite.
    #[must_use]
    pub fn original_params(&self) -> &[Value] {
        &self.original_params
    }

    /// Interceptors may rewrite the parameters before the handler runs.
    pub fn params_mut(&mut self) -> &mut Vec<Value> {
        &mut self.params
    }

    /// Forwarding depth; `0` for a direct dispatch.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// Whether the handler has already run in this invocation.
    #[must_use]
    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// The handler's outcome, once it has run.
    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Attach a value for later interceptors, the handler or result types.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub(crate) fn set_state(&mut self, state: InvocationState) {
        trace!(
            invocation_id = %self.id,
            pattern = %self.descriptor.path(),
            depth = self.depth,
            from = %self.state,
            to = %state,
            "Invocation state transition"
        );
        self.state = state;
    }

    /// Run the handler directly, skipping whatever interceptors remain.
    ///
    /// This is the innermost link of every chain. Interceptors that call it
    /// themselves bypass the rest of the chain deliberately.
    ///
    /// # Errors
    ///
    /// - [`RouterError::ParameterConversion`] when the converter rejects the
    ///   arguments
    /// - [`RouterError::Instantiation`] when a per-call factory fails
    /// - [`RouterError::Invocation`] when the handler itself fails
    pub fn invoke_handler(&mut self) -> Result<Outcome> {
        self.set_state(InvocationState::Executing);
        let descriptor = Arc::clone(&self.descriptor);

        let args = self
            .router
            .param_converter()
            .convert(&descriptor, &self.params, &self.path_params)
            .map_err(|source| RouterError::ParameterConversion {
                pattern: descriptor.path().to_string(),
                source,
            })?;

        debug!(
            invocation_id = %self.id,
            pattern = %descriptor.path(),
            lifecycle = ?descriptor.lifecycle(),
            args = args.len(),
            "Invoking handler"
        );

        let result = match descriptor.target() {
            HandlerTarget::Singleton(handler) => handler.handle(self, args),
            HandlerTarget::PerCall(factory) => {
                let handler = factory
                    .create()
                    .map_err(|source| RouterError::Instantiation {
                        target: descriptor.path().to_string(),
                        source,
                    })?;
                handler.handle(self, args)
            }
        };
        self.executed = true;

        let outcome = result.map_err(|e| RouterError::invocation(descriptor.path(), e))?;
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Re-enter the pipeline for `path` with the caller's original parameters.
    ///
    /// Rewrites made by interceptors stay local to this invocation. The
    /// forwarded invocation keeps this invocation's id and runs one level
    /// deeper. Forwarding cycles are not detected.
    ///
    /// # Errors
    ///
    /// Whatever the forwarded dispatch fails with, unchanged.
    pub fn forward(&mut self, path: &str) -> Result<Value> {
        self.set_state(InvocationState::Forwarded);
        debug!(
            invocation_id = %self.id,
            from = %self.descriptor.path(),
            to = %path,
            depth = self.depth + 1,
            "Forwarding invocation"
        );
        InvocationPipeline::new(self.router).forward(
            self.id,
            path,
            self.original_params.clone(),
            self.depth + 1,
        )
    }
}

impl fmt::Debug for InvocationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationContext")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("pattern", &self.descriptor.path())
            .field("path_params", &self.path_params)
            .field("params", &self.params)
            .field("depth", &self.depth)
            .field("state", &self.state)
            .field("executed", &self.executed)
            .finish()
    }
}
