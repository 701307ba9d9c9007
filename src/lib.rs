//! # actionrouter
//!
//! **actionrouter** is an in-process request router and invocation pipeline.
//! It resolves an abstract path (any separator-delimited string key, not
//! necessarily HTTP) to a registered handler ("action"), wraps it in an
//! ordered chain of interceptors, runs the chain, and hands the handler's
//! return value to a named result ("none", "forward", "render", ...).
//!
//! Any front-end that can produce a path and a parameter list (an HTTP
//! binding, an RPC layer, a CLI) can sit on top of it.
//!
//! ## Architecture
//!
//! - **[`matcher`]** - Stateless glob matching (`?`, `*`, `**`)
//! - **[`router`]** - Pattern parsing and the resolution trie with
//!   literal > param > `*` > `**` precedence
//! - **[`interceptor`]** - Interceptors, stacks, path-filtered stacks and AOP
//!   rules composed into per-handler chains
//! - **[`dispatcher`]** - The per-call pipeline and invocation context
//! - **[`result`]** - Result selection and result types, including
//!   forwarding
//! - **[`action`]** - Handler capability, descriptors, parameter conversion
//!   and object construction
//! - **[`service`]** - [`ActionRouter`], the facade over everything above
//! - **[`manifest`]** - YAML/JSON router descriptions
//! - **[`runtime_config`]** / **[`logging`]** - Environment-driven settings
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Pipeline as InvocationPipeline
//!     participant Trie as RouteTrie
//!     participant Registry as InterceptorRegistry
//!     participant Handler
//!     participant Results as ResultDispatcher
//!
//!     Caller->>Pipeline: dispatch(path, params)
//!     Pipeline->>Trie: resolve(path)
//!     Trie-->>Pipeline: descriptor + captures
//!     Pipeline->>Registry: chain_for(descriptor)
//!     Registry-->>Pipeline: [interceptors]
//!     Pipeline->>Handler: next.run() ... handle(ctx, args)
//!     Handler-->>Pipeline: Outcome
//!     Pipeline->>Results: apply(ctx, outcome)
//!     Results-->>Pipeline: final value (or forward → dispatch)
//!     Pipeline-->>Caller: Result<Value, RouterError>
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use actionrouter::action::{HandlerRegistration, HandlerTarget, Outcome, ResultDescriptor};
//! use actionrouter::interceptor::{interceptor_fn, InterceptorStackDescriptor};
//! use actionrouter::ActionRouter;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), actionrouter::RouterError> {
//! let mut router = ActionRouter::new();
//!
//! router.register_interceptor("audit", interceptor_fn(|ctx, next| {
//!     ctx.set_attribute("audited", json!(true));
//!     next.run(ctx)
//! }))?;
//! router.register_interceptor_stack(InterceptorStackDescriptor::new("default").with("audit"))?;
//!
//! router.register_handler(
//!     HandlerRegistration::new(
//!         "/users/{id}",
//!         HandlerTarget::from_fn(|ctx, _args| {
//!             let id = ctx.path_param("id").unwrap_or_default().to_string();
//!             Ok(Outcome::new(json!({ "id": id })))
//!         }),
//!     )
//!     .stack("default")
//!     .result(ResultDescriptor::none("success")),
//! )?;
//!
//! assert_eq!(router.dispatch("/users/42", vec![])?, json!({ "id": "42" }));
//! assert!(router.dispatch("/nope", vec![]).unwrap_err().is_not_found());
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Registration (`&mut self`) happens in a single-writer setup phase.
//! Afterwards the router is immutable and `Send + Sync`; `resolve`,
//! `chain_for` and `dispatch` take no locks. Everything runs synchronously
//! on the caller's thread.
//!
//! ## Error Handling
//!
//! Every failure is a [`RouterError`]. [`RouterError::kind`] separates "no
//! such path" from "handler failed" from "misconfigured" so bindings can
//! choose a recovery policy.

pub mod action;
pub mod cli;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod interceptor;
pub mod logging;
pub mod manifest;
pub mod matcher;
pub mod result;
pub mod router;
pub mod runtime_config;
pub mod service;

pub use error::{ErrorKind, Result, RouterError};
pub use service::{ActionRouter, SharedRouter};
