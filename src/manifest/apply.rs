use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use super::types::{ActionDecl, Manifest};
use crate::action::{
    HandlerRegistration, HandlerTarget, Lifecycle, ObjectFactory, TypeFactory,
};
use crate::error::RouterError;
use crate::service::ActionRouter;

impl Manifest {
    /// Build a router from `settings` and register everything declared.
    pub fn into_router(self, factory: Arc<dyn ObjectFactory>) -> anyhow::Result<ActionRouter> {
        let mut router = ActionRouter::with_config(self.settings.clone().unwrap_or_default());
        self.apply(&mut router, factory)?;
        Ok(router)
    }

    /// Register everything declared onto an existing router.
    ///
    /// Sections are applied in dependency order: interceptors, stacks, AOP
    /// rules, namespaces, global results, templates, actions. `settings` is
    /// ignored here. Returns the number of actions registered.
    pub fn apply(
        &self,
        router: &mut ActionRouter,
        factory: Arc<dyn ObjectFactory>,
    ) -> anyhow::Result<usize> {
        for decl in &self.interceptors {
            let instance = factory
                .create_interceptor(&decl.type_name)
                .map_err(|source| RouterError::Instantiation {
                    target: decl.type_name.clone(),
                    source,
                })
                .with_context(|| format!("interceptor '{}'", decl.name))?;
            router
                .register_shared_interceptor(decl.name.clone(), Arc::from(instance))
                .with_context(|| format!("interceptor '{}'", decl.name))?;
        }

        for stack in &self.stacks {
            router
                .register_interceptor_stack(stack.clone())
                .with_context(|| format!("stack '{}'", stack.name))?;
        }

        for rule in &self.aop {
            router
                .add_aop_rule(rule.clone())
                .with_context(|| format!("aop rule '{}'", rule.matches))?;
        }

        for namespace in &self.namespaces {
            router
                .register_namespace(namespace.clone())
                .with_context(|| format!("namespace '{}'", namespace.name))?;
        }

        for result in &self.global_results {
            router
                .register_global_result(result.clone())
                .with_context(|| format!("global result '{}'", result.name))?;
        }

        for (name, source) in &self.templates {
            router
                .register_template(name.clone(), source.clone())
                .with_context(|| format!("template '{name}'"))?;
        }

        for action in &self.actions {
            let registration = action_registration(action, &factory)?;
            router
                .register_handler(registration)
                .with_context(|| format!("action '{}'", action.path))?;
        }

        info!(
            actions = self.actions.len(),
            interceptors = self.interceptors.len(),
            stacks = self.stacks.len(),
            "Manifest applied"
        );
        Ok(self.actions.len())
    }
}

fn action_registration(
    action: &ActionDecl,
    factory: &Arc<dyn ObjectFactory>,
) -> anyhow::Result<HandlerRegistration> {
    let target = match action.lifecycle {
        Lifecycle::Singleton => {
            let handler = factory
                .create_handler(&action.handler)
                .map_err(|source| RouterError::Instantiation {
                    target: action.handler.clone(),
                    source,
                })
                .with_context(|| format!("action '{}'", action.path))?;
            HandlerTarget::Singleton(Arc::from(handler))
        }
        Lifecycle::PerCall => {
            HandlerTarget::per_call(TypeFactory::new(Arc::clone(factory), action.handler.clone()))
        }
    };

    Ok(HandlerRegistration {
        pattern: action.path.clone(),
        target,
        results: action.results.clone(),
        interceptors: action.interceptors.clone(),
        namespace: action.namespace.clone(),
        params: action.params.clone(),
    })
}
