use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

use super::handler::{HandlerTarget, Lifecycle};
use crate::router::PathPattern;

/// Catch-all result name.
pub const WILDCARD_RESULT: &str = "*";

/// A named post-processing step declared by a handler (or globally).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResultDescriptor {
    /// Result name the handler selects, or `*`
    pub name: String,
    /// Result type tag, e.g. `none`, `forward`, `render`, `json`
    #[serde(rename = "type")]
    pub result_type: String,
    /// Forward target path or view identifier
    #[serde(default)]
    pub location: String,
}

impl ResultDescriptor {
    pub fn new(
        name: impl Into<String>,
        result_type: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            result_type: result_type.into(),
            location: location.into(),
        }
    }

    /// `forward` result re-dispatching to `location`.
    pub fn forward(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self::new(name, "forward", location)
    }

    /// `none` result returning the raw value.
    pub fn none(name: impl Into<String>) -> Self {
        Self::new(name, "none", "")
    }
}

/// Interceptor declaration: a named stack and/or explicit interceptor names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InterceptorRef {
    /// Stack to start from
    pub stack: Option<String>,
    /// Extra interceptors (or stacks), appended after the stack
    pub interceptors: Vec<String>,
}

impl InterceptorRef {
    /// Whether anything is declared at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_none() && self.interceptors.is_empty()
    }
}

/// Groups handlers under a path prefix with shared interceptor defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamespaceDescriptor {
    pub name: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(flatten)]
    pub interceptors: InterceptorRef,
}

impl NamespaceDescriptor {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            interceptors: InterceptorRef::default(),
        }
    }

    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.interceptors.stack = Some(stack.into());
        self
    }

    #[must_use]
    pub fn with_interceptor(mut self, name: impl Into<String>) -> Self {
        self.interceptors.interceptors.push(name.into());
        self
    }
}

/// Expected JSON kind of a converted parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    #[default]
    Any,
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamKind::Any => "any",
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
            ParamKind::Array => "array",
            ParamKind::Object => "object",
        };
        write!(f, "{s}")
    }
}

fn default_required() -> bool {
    true
}

/// One entry of a handler's parameter shape.
///
/// A parameter named like a `{param}` segment of the pattern takes the
/// captured value; all others consume positional call arguments in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(default)]
    pub kind: ParamKind,
    #[serde(default = "default_required")]
    pub required: bool,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// What the discovery side hands to the router for one handler.
#[derive(Debug, Clone)]
pub struct HandlerRegistration {
    pub pattern: String,
    pub target: HandlerTarget,
    pub results: Vec<ResultDescriptor>,
    pub interceptors: InterceptorRef,
    pub namespace: Option<String>,
    pub params: Vec<ParamSpec>,
}

impl HandlerRegistration {
    pub fn new(pattern: impl Into<String>, target: HandlerTarget) -> Self {
        Self {
            pattern: pattern.into(),
            target,
            results: Vec::new(),
            interceptors: InterceptorRef::default(),
            namespace: None,
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn result(mut self, result: ResultDescriptor) -> Self {
        self.results.push(result);
        self
    }

    #[must_use]
    pub fn stack(mut self, stack: impl Into<String>) -> Self {
        self.interceptors.stack = Some(stack.into());
        self
    }

    #[must_use]
    pub fn interceptor(mut self, name: impl Into<String>) -> Self {
        self.interceptors.interceptors.push(name.into());
        self
    }

    #[must_use]
    pub fn namespace(mut self, name: impl Into<String>) -> Self {
        self.namespace = Some(name.into());
        self
    }

    #[must_use]
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }
}

/// Immutable description of a registered handler.
#[derive(Debug)]
pub struct HandlerDescriptor {
    pattern: PathPattern,
    pattern_text: String,
    target: HandlerTarget,
    results: HashMap<String, ResultDescriptor>,
    interceptors: InterceptorRef,
    namespace: Option<String>,
    params: Vec<ParamSpec>,
}

impl HandlerDescriptor {
    /// Build a descriptor from a registration whose pattern has already been
    /// parsed (and prefixed with its namespace).
    ///
    /// Later result entries with the same name replace earlier ones.
    #[must_use]
    pub fn from_registration(pattern: PathPattern, reg: HandlerRegistration) -> Self {
        let results = reg
            .results
            .into_iter()
            .map(|r| (r.name.clone(), r))
            .collect();
        Self {
            pattern_text: pattern.to_string(),
            pattern,
            target: reg.target,
            results,
            interceptors: reg.interceptors,
            namespace: reg.namespace,
            params: reg.params,
        }
    }

    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Canonical pattern text, used for glob filters and logging.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.pattern_text
    }

    #[must_use]
    pub fn target(&self) -> &HandlerTarget {
        &self.target
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.target.lifecycle()
    }

    #[must_use]
    pub fn results(&self) -> &HashMap<String, ResultDescriptor> {
        &self.results
    }

    #[must_use]
    pub fn interceptors(&self) -> &InterceptorRef {
        &self.interceptors
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    #[must_use]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }
}
