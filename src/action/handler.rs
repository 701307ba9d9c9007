use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::dispatcher::InvocationContext;

/// What a handler (or an interceptor short-circuiting it) hands back.
///
/// `result` optionally names the result to apply; when absent the result
/// dispatcher infers one (see [`crate::result`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Raw return value
    pub value: Value,
    /// Selected result name
    pub result: Option<String>,
}

impl Outcome {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self {
            value,
            result: None,
        }
    }

    /// Return `value` and select the result called `name`.
    #[must_use]
    pub fn with_result(value: Value, name: impl Into<String>) -> Self {
        Self {
            value,
            result: Some(name.into()),
        }
    }

    /// Select the result called `name` with a null value.
    #[must_use]
    pub fn result(name: impl Into<String>) -> Self {
        Self::with_result(Value::Null, name)
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// A callable action.
///
/// `args` are the call parameters after conversion; path captures are also
/// available through `ctx`.
pub trait Handler: Send + Sync {
    fn handle(&self, ctx: &InvocationContext<'_>, args: Vec<Value>) -> anyhow::Result<Outcome>;
}

/// Adapter turning a closure into a [`Handler`].
pub struct FnHandler<F>(F);

impl<F> Handler for FnHandler<F>
where
    F: Fn(&InvocationContext<'_>, Vec<Value>) -> anyhow::Result<Outcome> + Send + Sync,
{
    fn handle(&self, ctx: &InvocationContext<'_>, args: Vec<Value>) -> anyhow::Result<Outcome> {
        (self.0)(ctx, args)
    }
}

/// Builds a fresh handler instance for each call.
pub trait HandlerFactory: Send + Sync {
    fn create(&self) -> anyhow::Result<Box<dyn Handler>>;
}

impl<F> HandlerFactory for F
where
    F: Fn() -> anyhow::Result<Box<dyn Handler>> + Send + Sync,
{
    fn create(&self) -> anyhow::Result<Box<dyn Handler>> {
        self()
    }
}

/// Handler lifecycle mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// One shared instance serves every call; must tolerate concurrent use
    #[default]
    Singleton,
    /// A fresh instance is constructed per call
    PerCall,
}

/// The callable behind a descriptor, tagged by lifecycle.
#[derive(Clone)]
pub enum HandlerTarget {
    /// Shared instance
    Singleton(Arc<dyn Handler>),
    /// Factory invoked on every call
    PerCall(Arc<dyn HandlerFactory>),
}

impl HandlerTarget {
    /// Wrap a shared handler instance.
    pub fn singleton(handler: impl Handler + 'static) -> Self {
        Self::Singleton(Arc::new(handler))
    }

    /// Wrap a closure as a shared handler.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&InvocationContext<'_>, Vec<Value>) -> anyhow::Result<Outcome>
            + Send
            + Sync
            + 'static,
    {
        Self::Singleton(Arc::new(FnHandler(f)))
    }

    /// Construct a new handler per call with `factory`.
    pub fn per_call(factory: impl HandlerFactory + 'static) -> Self {
        Self::PerCall(Arc::new(factory))
    }

    /// Construct a new handler per call with a closure.
    pub fn per_call_fn<F>(f: F) -> Self
    where
        F: Fn() -> anyhow::Result<Box<dyn Handler>> + Send + Sync + 'static,
    {
        Self::PerCall(Arc::new(f))
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        match self {
            HandlerTarget::Singleton(_) => Lifecycle::Singleton,
            HandlerTarget::PerCall(_) => Lifecycle::PerCall,
        }
    }
}

impl fmt::Debug for HandlerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HandlerTarget").field(&self.lifecycle()).finish()
    }
}
