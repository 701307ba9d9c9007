use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::core::{Interceptor, NamedInterceptor};
use crate::action::{HandlerDescriptor, NamespaceDescriptor};
use crate::error::{Result, RouterError};
use crate::matcher::PathMatcher;

/// Named, ordered, reusable list of interceptor references.
///
/// A stack with `include` and/or `exclude` globs is additionally applied to
/// every handler whose pattern passes the filters, after the handler's own
/// chain, ordered by ascending `order`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InterceptorStackDescriptor {
    pub name: String,
    /// Interceptor or previously registered stack names
    #[serde(default)]
    pub interceptors: Vec<String>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub order: i32,
}

impl InterceptorStackDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interceptors: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            order: 0,
        }
    }

    #[must_use]
    pub fn with(mut self, interceptor: impl Into<String>) -> Self {
        self.interceptors.push(interceptor.into());
        self
    }

    #[must_use]
    pub fn include(mut self, glob: impl Into<String>) -> Self {
        self.include.push(glob.into());
        self
    }

    #[must_use]
    pub fn exclude(mut self, glob: impl Into<String>) -> Self {
        self.exclude.push(glob.into());
        self
    }

    #[must_use]
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Whether the stack applies itself by path filter.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.include.is_empty() || !self.exclude.is_empty()
    }
}

/// How an AOP rule changes a matching handler's chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AopOperation {
    /// Prepend the rule's interceptors
    AddBefore,
    /// Append the rule's interceptors
    AddAfter,
    /// Replace the chain built so far
    Override,
}

/// Declarative rule adding or overriding interceptors for every handler whose
/// pattern matches a glob.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AopRule {
    pub matches: String,
    pub operation: AopOperation,
    #[serde(default)]
    pub interceptors: Vec<String>,
    /// Rules apply in ascending order; equal orders apply in registration
    /// order, so the last registered rule has the final say.
    #[serde(default)]
    pub order: i32,
}

impl AopRule {
    pub fn new(matches: impl Into<String>, operation: AopOperation) -> Self {
        Self {
            matches: matches.into(),
            operation,
            interceptors: Vec::new(),
            order: 0,
        }
    }

    pub fn add_before(matches: impl Into<String>) -> Self {
        Self::new(matches, AopOperation::AddBefore)
    }

    pub fn add_after(matches: impl Into<String>) -> Self {
        Self::new(matches, AopOperation::AddAfter)
    }

    pub fn override_with(matches: impl Into<String>) -> Self {
        Self::new(matches, AopOperation::Override)
    }

    #[must_use]
    pub fn with(mut self, interceptor: impl Into<String>) -> Self {
        self.interceptors.push(interceptor.into());
        self
    }

    #[must_use]
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

enum Entry {
    Interceptor(Arc<dyn Interceptor>),
    Stack(Vec<NamedInterceptor>),
}

struct FilteredStack {
    name: String,
    include: Vec<String>,
    exclude: Vec<String>,
    order: i32,
    seq: u64,
    chain: Vec<NamedInterceptor>,
}

impl FilteredStack {
    fn applies(&self, matcher: &PathMatcher, path: &str) -> bool {
        let included =
            self.include.is_empty() || self.include.iter().any(|g| matcher.matches(g, path));
        included && !self.exclude.iter().any(|g| matcher.matches(g, path))
    }
}

struct ResolvedRule {
    rule: AopRule,
    seq: u64,
    chain: Vec<NamedInterceptor>,
}

/// Owns interceptor and stack definitions and composes per-handler chains.
///
/// Interceptors and stacks share one name space. Stack references are
/// flattened when the stack is registered, so a stack can only refer to
/// names that already exist.
pub struct InterceptorRegistry {
    entries: HashMap<String, Entry>,
    stacks: Vec<InterceptorStackDescriptor>,
    filtered: Vec<FilteredStack>,
    rules: Vec<ResolvedRule>,
    seq: u64,
    matcher: PathMatcher,
}

impl InterceptorRegistry {
    /// Create an empty registry whose globs split on `separator`.
    #[must_use]
    pub fn new(separator: char) -> Self {
        Self {
            entries: HashMap::new(),
            stacks: Vec::new(),
            filtered: Vec::new(),
            rules: Vec::new(),
            seq: 0,
            matcher: PathMatcher::new(separator),
        }
    }

    /// Register a single interceptor under `name`.
    ///
    /// # Errors
    ///
    /// [`RouterError::DuplicateName`] when an interceptor or stack already
    /// uses `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        interceptor: Arc<dyn Interceptor>,
    ) -> Result<()> {
        let name = name.into();
        self.ensure_free(&name)?;
        info!(interceptor = %name, "Interceptor registered");
        self.entries.insert(name, Entry::Interceptor(interceptor));
        Ok(())
    }

    /// Register a stack, flattening the references it names.
    ///
    /// # Errors
    ///
    /// - [`RouterError::DuplicateName`] when the name is taken
    /// - [`RouterError::UnknownReference`] when a referenced name does not
    ///   exist
    pub fn register_stack(&mut self, stack: InterceptorStackDescriptor) -> Result<()> {
        self.ensure_free(&stack.name)?;
        let chain = self.resolve_refs(&stack.interceptors)?;

        self.seq += 1;
        if stack.is_filtered() {
            self.filtered.push(FilteredStack {
                name: stack.name.clone(),
                include: stack.include.clone(),
                exclude: stack.exclude.clone(),
                order: stack.order,
                seq: self.seq,
                chain: chain.clone(),
            });
            self.filtered.sort_by_key(|f| (f.order, f.seq));
        }

        info!(
            stack = %stack.name,
            interceptors = chain.len(),
            filtered = stack.is_filtered(),
            order = stack.order,
            "Interceptor stack registered"
        );
        self.entries.insert(stack.name.clone(), Entry::Stack(chain));
        self.stacks.push(stack);
        Ok(())
    }

    /// Add an AOP rule.
    ///
    /// # Errors
    ///
    /// [`RouterError::UnknownReference`] when the rule names an interceptor
    /// or stack that does not exist.
    pub fn add_aop_rule(&mut self, rule: AopRule) -> Result<()> {
        let chain = self.resolve_refs(&rule.interceptors)?;
        self.seq += 1;
        info!(
            matches = %rule.matches,
            operation = ?rule.operation,
            interceptors = chain.len(),
            order = rule.order,
            "AOP rule added"
        );
        self.rules.push(ResolvedRule {
            rule,
            seq: self.seq,
            chain,
        });
        self.rules.sort_by_key(|r| (r.rule.order, r.seq));
        Ok(())
    }

    /// Compose the effective chain for `descriptor`, outermost first.
    ///
    /// 1. Base: the handler's stack, else its namespace's declaration, else
    ///    `default_stack`.
    /// 2. Handler-level interceptor names are appended.
    /// 3. Filtered stacks whose globs pass the handler's pattern.
    /// 4. AOP rules whose `matches` glob passes the pattern.
    ///
    /// Duplicates are kept.
    ///
    /// # Errors
    ///
    /// [`RouterError::UnknownReference`] when the handler, its namespace or
    /// the default refer to a name that was never registered.
    pub fn chain_for(
        &self,
        descriptor: &HandlerDescriptor,
        namespace: Option<&NamespaceDescriptor>,
        default_stack: Option<&str>,
    ) -> Result<Vec<NamedInterceptor>> {
        let own = descriptor.interceptors();
        let path = descriptor.path();
        let mut chain = Vec::new();

        if let Some(stack) = &own.stack {
            chain.extend(self.resolve_ref(stack)?);
        } else if let Some(ns) = namespace.filter(|ns| !ns.interceptors.is_empty()) {
            if let Some(stack) = &ns.interceptors.stack {
                chain.extend(self.resolve_ref(stack)?);
            }
            chain.extend(self.resolve_refs(&ns.interceptors.interceptors)?);
        } else if let Some(stack) = default_stack {
            chain.extend(self.resolve_ref(stack)?);
        }
        chain.extend(self.resolve_refs(&own.interceptors)?);

        for stack in &self.filtered {
            if stack.applies(&self.matcher, path) {
                debug!(pattern = %path, stack = %stack.name, "Filtered stack applied");
                chain.extend(stack.chain.iter().cloned());
            }
        }

        for resolved in &self.rules {
            if !self.matcher.matches(&resolved.rule.matches, path) {
                continue;
            }
            debug!(
                pattern = %path,
                matches = %resolved.rule.matches,
                operation = ?resolved.rule.operation,
                "AOP rule applied"
            );
            match resolved.rule.operation {
                AopOperation::AddBefore => {
                    let mut prefixed = resolved.chain.clone();
                    prefixed.append(&mut chain);
                    chain = prefixed;
                }
                AopOperation::AddAfter => chain.extend(resolved.chain.iter().cloned()),
                AopOperation::Override => chain = resolved.chain.clone(),
            }
        }

        Ok(chain)
    }

    /// Whether an interceptor or stack is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Flattened members of stack `name`.
    #[must_use]
    pub fn stack(&self, name: &str) -> Option<&[NamedInterceptor]> {
        match self.entries.get(name) {
            Some(Entry::Stack(chain)) => Some(chain),
            _ => None,
        }
    }

    /// Registered stack declarations, in registration order.
    #[must_use]
    pub fn stacks(&self) -> &[InterceptorStackDescriptor] {
        &self.stacks
    }

    /// Number of AOP rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Drop every interceptor, stack and rule. Safe to call repeatedly.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() || !self.rules.is_empty() {
            warn!(
                entries = self.entries.len(),
                rules = self.rules.len(),
                "Clearing interceptor registry"
            );
        }
        self.entries.clear();
        self.stacks.clear();
        self.filtered.clear();
        self.rules.clear();
        self.seq = 0;
    }

    fn ensure_free(&self, name: &str) -> Result<()> {
        if self.entries.contains_key(name) {
            warn!(name = %name, "Duplicate interceptor name rejected");
            return Err(RouterError::DuplicateName {
                kind: "interceptor",
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn resolve_ref(&self, name: &str) -> Result<Vec<NamedInterceptor>> {
        match self.entries.get(name) {
            Some(Entry::Interceptor(i)) => Ok(vec![NamedInterceptor::new(name, Arc::clone(i))]),
            Some(Entry::Stack(chain)) => Ok(chain.clone()),
            None => Err(RouterError::UnknownReference {
                kind: "interceptor",
                name: name.to_string(),
            }),
        }
    }

    fn resolve_refs(&self, names: &[String]) -> Result<Vec<NamedInterceptor>> {
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            out.extend(self.resolve_ref(name)?);
        }
        Ok(out)
    }
}

impl Default for InterceptorRegistry {
    fn default() -> Self {
        Self::new('/')
    }
}
