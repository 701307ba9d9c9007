use serde_json::{json, Value};

use super::handler::{Handler, Outcome};
use crate::dispatcher::InvocationContext;

/// Handler that echoes back what it was invoked with.
///
/// Stands in for handler types a manifest names but nothing provides, so a
/// route table can be exercised before the real handlers exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl Handler for EchoHandler {
    fn handle(&self, ctx: &InvocationContext<'_>, args: Vec<Value>) -> anyhow::Result<Outcome> {
        let params: serde_json::Map<String, Value> = ctx
            .path_params()
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();

        Ok(Outcome::new(json!({
            "invocation_id": ctx.id().to_string(),
            "path": ctx.path(),
            "pattern": ctx.descriptor().path(),
            "params": params,
            "args": args,
        })))
    }
}
