//! Typed handlers.
//!
//! A typed handler receives its arguments deserialized into a Rust type and
//! returns a serializable response, so business code never touches
//! [`serde_json::Value`] directly.
//!
//! ```rust
//! use actionrouter::action::{typed, HandlerTarget};
//!
//! let target: HandlerTarget = typed(|(a, b): (i64, i64)| Ok(a + b));
//! ```

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

use super::handler::{Handler, HandlerTarget, Outcome};
use crate::dispatcher::InvocationContext;

/// Handler adapter deserializing the argument list into `Req`.
///
/// The converted arguments are presented as a JSON array, which serde maps
/// onto tuples and onto structs (fields in declaration order).
pub struct TypedHandler<F, Req, Resp> {
    f: F,
    _types: PhantomData<fn(Req) -> Resp>,
}

impl<F, Req, Resp> TypedHandler<F, Req, Resp>
where
    F: Fn(Req) -> anyhow::Result<Resp> + Send + Sync,
    Req: DeserializeOwned,
    Resp: Serialize,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _types: PhantomData,
        }
    }
}

impl<F, Req, Resp> Handler for TypedHandler<F, Req, Resp>
where
    F: Fn(Req) -> anyhow::Result<Resp> + Send + Sync,
    Req: DeserializeOwned,
    Resp: Serialize,
{
    fn handle(&self, ctx: &InvocationContext<'_>, args: Vec<Value>) -> anyhow::Result<Outcome> {
        let req: Req = serde_json::from_value(Value::Array(args)).with_context(|| {
            format!(
                "arguments for '{}' do not fit {}",
                ctx.descriptor().path(),
                std::any::type_name::<Req>()
            )
        })?;
        let resp = (self.f)(req)?;
        Ok(Outcome::new(serde_json::to_value(resp)?))
    }
}

/// Wrap a typed closure as a shared handler.
pub fn typed<F, Req, Resp>(f: F) -> HandlerTarget
where
    F: Fn(Req) -> anyhow::Result<Resp> + Send + Sync + 'static,
    Req: DeserializeOwned + 'static,
    Resp: Serialize + 'static,
{
    HandlerTarget::singleton(TypedHandler::new(f))
}
