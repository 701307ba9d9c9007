use minijinja::Environment;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::builtin::{ForwardResult, JsonResult, NoneResult, RenderResult};
use crate::action::{HandlerDescriptor, Outcome, ResultDescriptor, WILDCARD_RESULT};
use crate::dispatcher::InvocationContext;
use crate::error::{Result, RouterError};

/// Post-processing bound to a result type tag.
pub trait ResultType: Send + Sync {
    fn apply(
        &self,
        ctx: &mut InvocationContext<'_>,
        result: &ResultDescriptor,
        value: Value,
    ) -> Result<Value>;
}

impl<F> ResultType for F
where
    F: Fn(&mut InvocationContext<'_>, &ResultDescriptor, Value) -> Result<Value> + Send + Sync,
{
    fn apply(
        &self,
        ctx: &mut InvocationContext<'_>,
        result: &ResultDescriptor,
        value: Value,
    ) -> Result<Value> {
        self(ctx, result, value)
    }
}

/// Maps a handler outcome to a result descriptor and runs its result type.
pub struct ResultDispatcher {
    types: HashMap<String, Arc<dyn ResultType>>,
    global: HashMap<String, ResultDescriptor>,
    templates: BTreeMap<String, String>,
    default_result: String,
}

impl ResultDispatcher {
    /// Dispatcher with the built-in `none`, `forward`, `render` and `json`
    /// types registered.
    pub fn new(default_result: impl Into<String>) -> Self {
        Self {
            types: Self::builtin_types(),
            global: HashMap::new(),
            templates: BTreeMap::new(),
            default_result: default_result.into(),
        }
    }

    fn builtin_types() -> HashMap<String, Arc<dyn ResultType>> {
        let mut types: HashMap<String, Arc<dyn ResultType>> = HashMap::new();
        types.insert("none".to_string(), Arc::new(NoneResult));
        types.insert("forward".to_string(), Arc::new(ForwardResult));
        types.insert("render".to_string(), Arc::new(RenderResult));
        types.insert("json".to_string(), Arc::new(JsonResult));
        types
    }

    /// Register a result type under `tag`; `*` registers the catch-all type.
    ///
    /// # Errors
    ///
    /// [`RouterError::DuplicateName`] when `tag` is taken, built-ins
    /// included.
    pub fn register_type(
        &mut self,
        tag: impl Into<String>,
        ty: Arc<dyn ResultType>,
    ) -> Result<()> {
        let tag = tag.into();
        if self.types.contains_key(&tag) {
            warn!(result_type = %tag, "Duplicate result type rejected");
            return Err(RouterError::DuplicateName {
                kind: "result type",
                name: tag,
            });
        }
        info!(result_type = %tag, "Result type registered");
        self.types.insert(tag, ty);
        Ok(())
    }

    /// Register a result every handler can select.
    ///
    /// # Errors
    ///
    /// [`RouterError::DuplicateName`] when a global result of that name exists.
    pub fn register_global(&mut self, result: ResultDescriptor) -> Result<()> {
        if self.global.contains_key(&result.name) {
            return Err(RouterError::DuplicateName {
                kind: "global result",
                name: result.name,
            });
        }
        info!(
            result = %result.name,
            result_type = %result.result_type,
            "Global result registered"
        );
        self.global.insert(result.name.clone(), result);
        Ok(())
    }

    /// Register template `source` under `name` for `render` results.
    ///
    /// # Errors
    ///
    /// [`RouterError::DuplicateName`] when `name` is taken.
    pub fn register_template(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<()> {
        let name = name.into();
        if self.templates.contains_key(&name) {
            return Err(RouterError::DuplicateName {
                kind: "template",
                name,
            });
        }
        debug!(template = %name, "Template registered");
        self.templates.insert(name, source.into());
        Ok(())
    }

    /// Result name assumed when a handler selects none.
    #[must_use]
    pub fn default_result(&self) -> &str {
        &self.default_result
    }

    pub fn set_default_result(&mut self, name: impl Into<String>) {
        self.default_result = name.into();
    }

    #[must_use]
    pub fn global_results(&self) -> &HashMap<String, ResultDescriptor> {
        &self.global
    }

    /// Pick the result descriptor for `outcome`.
    ///
    /// The name is the outcome's explicit selection, else the value itself
    /// when it is a string naming a declared result, else the default result
    /// name. Exact names are tried before catch-alls: handler table, global
    /// results, handler `*`, global `*`.
    ///
    /// `Ok(None)` means the raw value should be returned: either no results
    /// are declared anywhere, or the name was inferred and nothing fits it.
    ///
    /// # Errors
    ///
    /// [`RouterError::ResultNotFound`] when an explicitly selected name fits
    /// no declared result.
    pub fn select<'a>(
        &'a self,
        descriptor: &'a HandlerDescriptor,
        outcome: &Outcome,
    ) -> Result<Option<&'a ResultDescriptor>> {
        let table = descriptor.results();
        if table.is_empty() && self.global.is_empty() {
            return Ok(None);
        }

        let declared = |name: &str| table.contains_key(name) || self.global.contains_key(name);
        let name = match (&outcome.result, &outcome.value) {
            (Some(explicit), _) => explicit.as_str(),
            (None, Value::String(s)) if declared(s) => s.as_str(),
            (None, _) => self.default_result.as_str(),
        };

        let found = table
            .get(name)
            .or_else(|| self.global.get(name))
            .or_else(|| table.get(WILDCARD_RESULT))
            .or_else(|| self.global.get(WILDCARD_RESULT));

        match found {
            Some(result) => Ok(Some(result)),
            None if outcome.result.is_none() => Ok(None),
            None => Err(RouterError::ResultNotFound {
                pattern: descriptor.path().to_string(),
                result: name.to_string(),
            }),
        }
    }

    /// Apply the selected result to `outcome` and return the final value.
    ///
    /// # Errors
    ///
    /// - [`RouterError::ResultNotFound`] from [`select`](Self::select)
    /// - [`RouterError::UnknownResultType`] when the descriptor's type tag is
    ///   unregistered and no `*` type exists
    /// - whatever the result type fails with
    pub fn apply(&self, ctx: &mut InvocationContext<'_>, outcome: Outcome) -> Result<Value> {
        let selected = self.select(ctx.descriptor(), &outcome)?.cloned();
        let Some(result) = selected else {
            return Ok(outcome.value);
        };

        let ty = self
            .types
            .get(&result.result_type)
            .or_else(|| self.types.get(WILDCARD_RESULT))
            .map(Arc::clone)
            .ok_or_else(|| RouterError::UnknownResultType {
                result_type: result.result_type.clone(),
            })?;

        debug!(
            invocation_id = %ctx.id(),
            pattern = %ctx.descriptor().path(),
            result = %result.name,
            result_type = %result.result_type,
            location = %result.location,
            "Applying result"
        );
        ty.apply(ctx, &result, outcome.value)
    }

    /// Render template `name` with `context`.
    ///
    /// # Errors
    ///
    /// [`RouterError::Invocation`] when the template is unknown or fails.
    pub fn render(&self, name: &str, context: &Value) -> Result<String> {
        let target = || format!("template '{name}'");
        let mut env = Environment::new();
        for (tpl_name, source) in &self.templates {
            env.add_template(tpl_name, source)
                .map_err(|e| RouterError::invocation(target(), e))?;
        }
        let tmpl = env
            .get_template(name)
            .map_err(|e| RouterError::invocation(target(), e))?;
        tmpl.render(context)
            .map_err(|e| RouterError::invocation(target(), e))
    }

    /// Drop global results, templates and custom result types. Built-in
    /// types stay registered.
    pub fn clear(&mut self) {
        self.types = Self::builtin_types();
        self.global.clear();
        self.templates.clear();
    }
}

impl Default for ResultDispatcher {
    fn default() -> Self {
        Self::new(crate::runtime_config::DEFAULT_RESULT)
    }
}
