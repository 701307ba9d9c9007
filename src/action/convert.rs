//! Parameter conversion.
//!
//! The pipeline never interprets call arguments itself. It hands the raw
//! arguments, the path captures and the handler's declared shape to a
//! [`ParamConverter`] and invokes the handler with whatever comes back.

use anyhow::{anyhow, bail};
use serde_json::{Number, Value};

use super::types::{HandlerDescriptor, ParamKind, ParamSpec};
use crate::router::ParamVec;

/// Turns raw call arguments into the argument list a handler expects.
pub trait ParamConverter: Send + Sync {
    fn convert(
        &self,
        descriptor: &HandlerDescriptor,
        args: &[Value],
        path_params: &ParamVec,
    ) -> anyhow::Result<Vec<Value>>;
}

/// Shape-driven converter with lenient scalar coercion.
///
/// - An empty shape passes the arguments through untouched.
/// - Each [`ParamSpec`] takes the path capture of the same name if there is
///   one, otherwise the next positional argument.
/// - Strings are coerced to the declared scalar kind (`"42"` → `42`); JSON
///   text is accepted for arrays and objects.
/// - Positional arguments left over after the shape are appended unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultParamConverter;

impl ParamConverter for DefaultParamConverter {
    fn convert(
        &self,
        descriptor: &HandlerDescriptor,
        args: &[Value],
        path_params: &ParamVec,
    ) -> anyhow::Result<Vec<Value>> {
        let shape = descriptor.params();
        if shape.is_empty() {
            return Ok(args.to_vec());
        }

        let mut positional = args.iter();
        let mut out = Vec::with_capacity(shape.len().max(args.len()));

        for spec in shape {
            let captured = path_params
                .iter()
                .rfind(|(k, _)| k.as_ref() == spec.name)
                .map(|(_, v)| Value::String(v.clone()));
            let raw = captured.or_else(|| positional.next().cloned());
            out.push(coerce(spec, raw)?);
        }

        out.extend(positional.cloned());
        Ok(out)
    }
}

fn coerce(spec: &ParamSpec, raw: Option<Value>) -> anyhow::Result<Value> {
    let value = match raw {
        None | Some(Value::Null) if spec.required => {
            bail!("missing required parameter '{}'", spec.name)
        }
        None | Some(Value::Null) => return Ok(Value::Null),
        Some(v) => v,
    };

    let mismatch = |v: &Value| anyhow!("parameter '{}' expects {}, got {}", spec.name, spec.kind, v);

    match (spec.kind, value) {
        (ParamKind::Any, v) => Ok(v),

        (ParamKind::String, Value::String(s)) => Ok(Value::String(s)),
        (ParamKind::String, v @ (Value::Number(_) | Value::Bool(_))) => {
            Ok(Value::String(v.to_string()))
        }

        (ParamKind::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => {
            Ok(Value::Number(n))
        }
        (ParamKind::Integer, Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| mismatch(&Value::String(s))),

        (ParamKind::Number, Value::Number(n)) => Ok(Value::Number(n)),
        (ParamKind::Number, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| mismatch(&Value::String(s))),

        (ParamKind::Boolean, Value::Bool(b)) => Ok(Value::Bool(b)),
        (ParamKind::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Value::Bool(true)),
            "false" | "0" | "no" => Ok(Value::Bool(false)),
            _ => Err(mismatch(&Value::String(s))),
        },

        (ParamKind::Array, v @ Value::Array(_)) | (ParamKind::Object, v @ Value::Object(_)) => {
            Ok(v)
        }
        (kind @ (ParamKind::Array | ParamKind::Object), Value::String(s)) => {
            let parsed: Value = serde_json::from_str(&s).map_err(|_| mismatch(&Value::String(s)))?;
            match (kind, &parsed) {
                (ParamKind::Array, Value::Array(_)) | (ParamKind::Object, Value::Object(_)) => {
                    Ok(parsed)
                }
                _ => Err(mismatch(&parsed)),
            }
        }

        (_, v) => Err(mismatch(&v)),
    }
}
