use serde::Deserialize;
use std::collections::BTreeMap;

use crate::action::{InterceptorRef, Lifecycle, NamespaceDescriptor, ParamSpec, ResultDescriptor};
use crate::interceptor::{AopRule, InterceptorStackDescriptor};
use crate::runtime_config::RouterConfig;

/// Declarative router description.
///
/// Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Router settings; only used when building a fresh router
    pub settings: Option<RouterConfig>,
    pub interceptors: Vec<InterceptorDecl>,
    pub stacks: Vec<InterceptorStackDescriptor>,
    pub aop: Vec<AopRule>,
    pub namespaces: Vec<NamespaceDescriptor>,
    pub global_results: Vec<ResultDescriptor>,
    /// Template name → template source for `render` results
    pub templates: BTreeMap<String, String>,
    pub actions: Vec<ActionDecl>,
}

/// An interceptor instance to construct by type name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InterceptorDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// One handler entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionDecl {
    /// Pattern, relative to the namespace prefix when a namespace is given
    pub path: String,
    /// Handler type name handed to the object factory
    pub handler: String,
    #[serde(default)]
    pub lifecycle: Lifecycle,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(flatten)]
    pub interceptors: InterceptorRef,
    #[serde(default)]
    pub results: Vec<ResultDescriptor>,
    #[serde(default)]
    pub params: Vec<ParamSpec>,
}
