use serde_json::{json, Map, Value};

use super::core::ResultType;
use crate::action::ResultDescriptor;
use crate::dispatcher::InvocationContext;
use crate::error::{Result, RouterError};

/// `none`: the raw handler value is the final value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneResult;

impl ResultType for NoneResult {
    fn apply(
        &self,
        _ctx: &mut InvocationContext<'_>,
        _result: &ResultDescriptor,
        value: Value,
    ) -> Result<Value> {
        Ok(value)
    }
}

/// `forward`: re-dispatch to `location` with the original parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardResult;

impl ResultType for ForwardResult {
    fn apply(
        &self,
        ctx: &mut InvocationContext<'_>,
        result: &ResultDescriptor,
        _value: Value,
    ) -> Result<Value> {
        ctx.forward(&result.location)
    }
}

/// `render`: render the template named by `location`.
///
/// The template sees `value` (the handler's return value), `params` (path
/// captures by name) and `path`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderResult;

impl ResultType for RenderResult {
    fn apply(
        &self,
        ctx: &mut InvocationContext<'_>,
        result: &ResultDescriptor,
        value: Value,
    ) -> Result<Value> {
        let params: Map<String, Value> = ctx
            .path_params()
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();
        let context = json!({
            "value": value,
            "params": params,
            "path": ctx.path(),
        });
        let rendered = ctx.router().results().render(&result.location, &context)?;
        Ok(Value::String(rendered))
    }
}

/// `json`: serialize the value to JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResult;

impl ResultType for JsonResult {
    fn apply(
        &self,
        _ctx: &mut InvocationContext<'_>,
        result: &ResultDescriptor,
        value: Value,
    ) -> Result<Value> {
        serde_json::to_string(&value)
            .map(Value::String)
            .map_err(|e| RouterError::invocation(format!("result '{}'", result.name), e))
    }
}
