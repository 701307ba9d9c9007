use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::action::{
    DefaultParamConverter, HandlerDescriptor, HandlerRegistration, NamespaceDescriptor,
    ParamConverter, ResultDescriptor,
};
use crate::dispatcher::InvocationPipeline;
use crate::error::{Result, RouterError};
use crate::ids::InvocationId;
use crate::interceptor::{
    AopRule, Interceptor, InterceptorRegistry, InterceptorStackDescriptor, NamedInterceptor,
};
use crate::result::{ResultDispatcher, ResultType};
use crate::router::{join_prefix, PathPattern, RouteMatch, RouteTrie};
use crate::runtime_config::RouterConfig;

/// The router: registration surface plus invocation surface.
///
/// Registration takes `&mut self` and is meant for a single-writer setup
/// phase. Afterwards the router is only read, so it can be shared behind an
/// `Arc` (or a [`SharedRouter`](super::SharedRouter)) and dispatched from
/// any number of threads without locking.
pub struct ActionRouter {
    config: RouterConfig,
    trie: RouteTrie,
    interceptors: InterceptorRegistry,
    results: ResultDispatcher,
    namespaces: HashMap<String, NamespaceDescriptor>,
    converter: Arc<dyn ParamConverter>,
}

impl ActionRouter {
    /// Router with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Router configured from `ACTR_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_config(RouterConfig::from_env())
    }

    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        let trie = RouteTrie::new(config.separator)
            .with_slow_threshold(Duration::from_micros(config.slow_resolve_threshold_us));
        Self {
            trie,
            interceptors: InterceptorRegistry::new(config.separator),
            results: ResultDispatcher::new(config.default_result.clone()),
            namespaces: HashMap::new(),
            converter: Arc::new(DefaultParamConverter),
            config,
        }
    }

    /// Replace the parameter conversion collaborator.
    #[must_use]
    pub fn with_param_converter(mut self, converter: Arc<dyn ParamConverter>) -> Self {
        self.converter = converter;
        self
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Register a namespace handlers can join by name.
    ///
    /// # Errors
    ///
    /// [`RouterError::DuplicateName`] when the name is taken.
    pub fn register_namespace(&mut self, namespace: NamespaceDescriptor) -> Result<()> {
        if self.namespaces.contains_key(&namespace.name) {
            warn!(namespace = %namespace.name, "Duplicate namespace rejected");
            return Err(RouterError::DuplicateName {
                kind: "namespace",
                name: namespace.name,
            });
        }
        info!(
            namespace = %namespace.name,
            prefix = %namespace.prefix,
            "Namespace registered"
        );
        self.namespaces.insert(namespace.name.clone(), namespace);
        Ok(())
    }

    /// Register a handler, prefixing its pattern with its namespace's prefix.
    ///
    /// # Errors
    ///
    /// - [`RouterError::UnknownReference`] for an unregistered namespace
    /// - [`RouterError::InvalidPattern`] when the pattern does not parse
    /// - [`RouterError::DuplicatePath`] when the normalized pattern is taken;
    ///   the existing handler stays resolvable
    pub fn register_handler(
        &mut self,
        registration: HandlerRegistration,
    ) -> Result<Arc<HandlerDescriptor>> {
        let separator = self.config.separator;
        let full_pattern = match registration.namespace.as_deref() {
            Some(name) => {
                let namespace =
                    self.namespaces
                        .get(name)
                        .ok_or_else(|| RouterError::UnknownReference {
                            kind: "namespace",
                            name: name.to_string(),
                        })?;
                join_prefix(&namespace.prefix, &registration.pattern, separator)
            }
            None => registration.pattern.clone(),
        };

        let pattern = PathPattern::parse(&full_pattern, separator)?;
        let descriptor = Arc::new(HandlerDescriptor::from_registration(pattern, registration));
        self.trie.register(Arc::clone(&descriptor))?;
        Ok(descriptor)
    }

    /// Register an interceptor instance under `name`.
    ///
    /// # Errors
    ///
    /// [`RouterError::DuplicateName`] when an interceptor or stack uses `name`.
    pub fn register_interceptor(
        &mut self,
        name: impl Into<String>,
        interceptor: impl Interceptor + 'static,
    ) -> Result<()> {
        self.interceptors.register(name, Arc::new(interceptor))
    }

    /// [`register_interceptor`](Self::register_interceptor) for an instance
    /// the caller keeps a handle to (e.g. to read metrics).
    pub fn register_shared_interceptor(
        &mut self,
        name: impl Into<String>,
        interceptor: Arc<dyn Interceptor>,
    ) -> Result<()> {
        self.interceptors.register(name, interceptor)
    }

    /// # Errors
    ///
    /// See [`InterceptorRegistry::register_stack`].
    pub fn register_interceptor_stack(&mut self, stack: InterceptorStackDescriptor) -> Result<()> {
        self.interceptors.register_stack(stack)
    }

    /// # Errors
    ///
    /// See [`InterceptorRegistry::add_aop_rule`].
    pub fn add_aop_rule(&mut self, rule: AopRule) -> Result<()> {
        self.interceptors.add_aop_rule(rule)
    }

    /// # Errors
    ///
    /// See [`ResultDispatcher::register_type`].
    pub fn register_result_type(
        &mut self,
        tag: impl Into<String>,
        result_type: impl ResultType + 'static,
    ) -> Result<()> {
        self.results.register_type(tag, Arc::new(result_type))
    }

    /// # Errors
    ///
    /// See [`ResultDispatcher::register_global`].
    pub fn register_global_result(&mut self, result: ResultDescriptor) -> Result<()> {
        self.results.register_global(result)
    }

    /// # Errors
    ///
    /// See [`ResultDispatcher::register_template`].
    pub fn register_template(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<()> {
        self.results.register_template(name, source)
    }

    /// Stack applied when neither a handler nor its namespace declare one.
    pub fn set_default_stack(&mut self, stack: Option<String>) {
        self.config.default_stack = stack;
    }

    /// Result name assumed when a handler selects none.
    pub fn set_default_result(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.results.set_default_result(name.clone());
        self.config.default_result = name;
    }

    /// Release every registration. Safe to call on an already clear router.
    pub fn clear(&mut self) {
        info!(
            routes = self.trie.len(),
            namespaces = self.namespaces.len(),
            "Clearing router"
        );
        self.trie.clear();
        self.interceptors.clear();
        self.results.clear();
        self.namespaces.clear();
        self.config.default_stack = None;
    }

    /// Resolve `path` to its most specific handler.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        self.trie.resolve(path)
    }

    /// Effective interceptor chain for `descriptor`, outermost first.
    ///
    /// # Errors
    ///
    /// [`RouterError::UnknownReference`] when a declared stack, interceptor
    /// or namespace does not exist.
    pub fn chain_for(&self, descriptor: &HandlerDescriptor) -> Result<Vec<NamedInterceptor>> {
        let namespace = match descriptor.namespace() {
            Some(name) => Some(self.namespaces.get(name).ok_or_else(|| {
                RouterError::UnknownReference {
                    kind: "namespace",
                    name: name.to_string(),
                }
            })?),
            None => None,
        };
        self.interceptors
            .chain_for(descriptor, namespace, self.config.default_stack.as_deref())
    }

    /// All registered handlers.
    #[must_use]
    pub fn handlers(&self) -> Vec<Arc<HandlerDescriptor>> {
        self.trie.descriptors()
    }

    #[must_use]
    pub fn namespace(&self, name: &str) -> Option<&NamespaceDescriptor> {
        self.namespaces.get(name)
    }

    #[must_use]
    pub fn interceptors(&self) -> &InterceptorRegistry {
        &self.interceptors
    }

    #[must_use]
    pub fn results(&self) -> &ResultDispatcher {
        &self.results
    }

    #[must_use]
    pub fn param_converter(&self) -> &dyn ParamConverter {
        self.converter.as_ref()
    }

    /// Resolve `path`, run the interceptor chain and handler, apply the
    /// result.
    ///
    /// # Errors
    ///
    /// See [`InvocationPipeline::dispatch`].
    pub fn dispatch(&self, path: &str, params: Vec<Value>) -> Result<Value> {
        InvocationPipeline::new(self).dispatch(path, params)
    }

    /// [`dispatch`](Self::dispatch) under a caller-supplied invocation id.
    pub fn dispatch_with_id(
        &self,
        id: InvocationId,
        path: &str,
        params: Vec<Value>,
    ) -> Result<Value> {
        InvocationPipeline::new(self).dispatch_with_id(id, path, params)
    }

    /// Invoke the handler for `path` with no interceptors.
    ///
    /// # Errors
    ///
    /// See [`InvocationPipeline::invoke_handler_only`].
    pub fn invoke_handler_only(&self, path: &str, params: Vec<Value>) -> Result<Value> {
        InvocationPipeline::new(self).invoke_handler_only(path, params)
    }
}

impl Default for ActionRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ActionRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRouter")
            .field("config", &self.config)
            .field("routes", &self.trie.len())
            .field("namespaces", &self.namespaces.len())
            .field("aop_rules", &self.interceptors.rule_count())
            .finish()
    }
}
