//! Object construction by type name.
//!
//! Declarative sources (such as a manifest) refer to handlers and
//! interceptors by type name. An [`ObjectFactory`] turns those names into
//! instances; the router only ever sees the result.

use anyhow::anyhow;
use std::collections::HashMap;
use std::sync::Arc;

use super::echo::EchoHandler;
use super::handler::{Handler, HandlerFactory};
use crate::interceptor::{Interceptor, MetricsInterceptor, TracingInterceptor};

/// Builds handlers and interceptors from a type identity.
pub trait ObjectFactory: Send + Sync {
    fn create_handler(&self, type_name: &str) -> anyhow::Result<Box<dyn Handler>>;
    fn create_interceptor(&self, type_name: &str) -> anyhow::Result<Box<dyn Interceptor>>;
}

type HandlerCtor = Arc<dyn Fn() -> anyhow::Result<Box<dyn Handler>> + Send + Sync>;
type InterceptorCtor = Arc<dyn Fn() -> anyhow::Result<Box<dyn Interceptor>> + Send + Sync>;

/// Name → constructor table implementing [`ObjectFactory`].
#[derive(Clone, Default)]
pub struct ObjectCatalog {
    handlers: HashMap<String, HandlerCtor>,
    interceptors: HashMap<String, InterceptorCtor>,
    echo_fallback: bool,
}

impl ObjectCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unknown handler types resolve to [`EchoHandler`] instead of failing.
    #[must_use]
    pub fn with_echo_fallback(mut self) -> Self {
        self.echo_fallback = true;
        self
    }

    /// Make the built-in interceptors available as `tracing` and `metrics`.
    #[must_use]
    pub fn with_builtin_interceptors(mut self) -> Self {
        self.interceptor("tracing", || Ok(Box::new(TracingInterceptor)));
        self.interceptor("metrics", || Ok(Box::new(MetricsInterceptor::new())));
        self
    }

    /// Register a handler constructor under `type_name`.
    pub fn handler<F>(&mut self, type_name: impl Into<String>, ctor: F) -> &mut Self
    where
        F: Fn() -> anyhow::Result<Box<dyn Handler>> + Send + Sync + 'static,
    {
        self.handlers.insert(type_name.into(), Arc::new(ctor));
        self
    }

    /// Register an interceptor constructor under `type_name`.
    pub fn interceptor<F>(&mut self, type_name: impl Into<String>, ctor: F) -> &mut Self
    where
        F: Fn() -> anyhow::Result<Box<dyn Interceptor>> + Send + Sync + 'static,
    {
        self.interceptors.insert(type_name.into(), Arc::new(ctor));
        self
    }
}

impl ObjectFactory for ObjectCatalog {
    fn create_handler(&self, type_name: &str) -> anyhow::Result<Box<dyn Handler>> {
        match self.handlers.get(type_name) {
            Some(ctor) => ctor(),
            None if self.echo_fallback => Ok(Box::new(EchoHandler)),
            None => Err(anyhow!("no handler type '{type_name}' in catalog")),
        }
    }

    fn create_interceptor(&self, type_name: &str) -> anyhow::Result<Box<dyn Interceptor>> {
        match self.interceptors.get(type_name) {
            Some(ctor) => ctor(),
            None => Err(anyhow!("no interceptor type '{type_name}' in catalog")),
        }
    }
}

/// [`HandlerFactory`] constructing `type_name` through an [`ObjectFactory`]
/// on every call.
pub struct TypeFactory {
    factory: Arc<dyn ObjectFactory>,
    type_name: String,
}

impl TypeFactory {
    pub fn new(factory: Arc<dyn ObjectFactory>, type_name: impl Into<String>) -> Self {
        Self {
            factory,
            type_name: type_name.into(),
        }
    }
}

impl HandlerFactory for TypeFactory {
    fn create(&self) -> anyhow::Result<Box<dyn Handler>> {
        self.factory.create_handler(&self.type_name)
    }
}
