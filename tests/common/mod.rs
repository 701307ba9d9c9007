#![allow(dead_code)]

use actionrouter::action::{HandlerRegistration, HandlerTarget, Outcome};
use actionrouter::dispatcher::InvocationContext;
use actionrouter::interceptor::{Interceptor, Next};
use actionrouter::{ActionRouter, Result};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared log of interceptor and handler activity, in call order.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

/// Interceptor that records `>name` before and `<name` after the inner chain.
pub struct Recording {
    pub name: &'static str,
    pub log: CallLog,
}

impl Interceptor for Recording {
    fn intercept(&self, ctx: &mut InvocationContext<'_>, next: Next<'_>) -> Result<Outcome> {
        self.log.push(format!(">{}", self.name));
        let out = next.run(ctx);
        self.log.push(format!("<{}", self.name));
        out
    }
}

/// Register one recording interceptor per name.
pub fn register_recorders(router: &mut ActionRouter, log: &CallLog, names: &[&'static str]) {
    for &name in names {
        router
            .register_interceptor(
                name,
                Recording {
                    name,
                    log: log.clone(),
                },
            )
            .unwrap();
    }
}

/// Handler returning `{"handler": name, "params": <captures>, "args": args}`.
pub fn named_handler(name: &'static str) -> HandlerTarget {
    HandlerTarget::from_fn(move |ctx, args| {
        let params: serde_json::Map<String, Value> = ctx
            .path_params()
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();
        Ok(Outcome::new(json!({
            "handler": name,
            "params": params,
            "args": args,
        })))
    })
}

/// Handler that logs `handler` and returns `value`.
pub fn logging_handler(log: &CallLog, value: Value) -> HandlerTarget {
    let log = log.clone();
    HandlerTarget::from_fn(move |_, _| {
        log.push("handler");
        Ok(Outcome::new(value.clone()))
    })
}

pub fn register(router: &mut ActionRouter, pattern: &str, target: HandlerTarget) {
    router
        .register_handler(HandlerRegistration::new(pattern, target))
        .unwrap();
}

/// Name of the handler that served `path`.
pub fn served_by(router: &ActionRouter, path: &str) -> String {
    router.dispatch(path, vec![]).unwrap()["handler"]
        .as_str()
        .unwrap()
        .to_string()
}
