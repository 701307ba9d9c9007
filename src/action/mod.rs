//! # Action Module
//!
//! Everything describing a handler ("action") before it is invoked: the
//! [`Handler`] capability itself, its lifecycle, the immutable
//! [`HandlerDescriptor`] the router stores, and the collaborators the
//! pipeline consults around a call (parameter conversion, object
//! construction).
//!
//! Handlers are plain trait objects or closures:
//!
//! ```rust
//! use actionrouter::action::{HandlerRegistration, HandlerTarget, Outcome, ResultDescriptor};
//! use serde_json::json;
//!
//! let reg = HandlerRegistration::new(
//!     "/greet/{name}",
//!     HandlerTarget::from_fn(|ctx, _args| {
//!         let name = ctx.path_param("name").unwrap_or("stranger");
//!         Ok(Outcome::new(json!(format!("hello {name}"))))
//!     }),
//! )
//! .result(ResultDescriptor::none("success"));
//! ```

mod convert;
mod echo;
mod factory;
mod handler;
mod typed;
mod types;

pub use convert::{DefaultParamConverter, ParamConverter};
pub use echo::EchoHandler;
pub use factory::{ObjectCatalog, ObjectFactory, TypeFactory};
pub use handler::{FnHandler, Handler, HandlerFactory, HandlerTarget, Lifecycle, Outcome};
pub use typed::{typed, TypedHandler};
pub use types::{
    HandlerDescriptor, HandlerRegistration, InterceptorRef, NamespaceDescriptor, ParamKind,
    ParamSpec, ResultDescriptor, WILDCARD_RESULT,
};
