//! # Result Module
//!
//! Post-processing of handler outcomes. A handler returns an [`Outcome`]
//! (value plus optional result name); the [`ResultDispatcher`] picks the
//! matching [`ResultDescriptor`] and runs the [`ResultType`] registered for
//! its type tag.
//!
//! ## Selection
//!
//! 1. Name: the outcome's explicit result, else the value when it is a
//!    string naming a declared result, else the router's default result
//!    (`success` unless configured)
//! 2. Lookup: handler table, handler `*`, global results, global `*`
//! 3. Nothing declared anywhere: the raw value is returned unchanged
//!
//! ## Built-in Types
//!
//! | Tag       | Behavior                                             |
//! |-----------|------------------------------------------------------|
//! | `none`    | raw value                                            |
//! | `forward` | re-dispatch to `location` with the same parameters   |
//! | `render`  | render template `location` with `value`/`params`/`path` |
//! | `json`    | serialize the value to a JSON string                 |
//!
//! [`Outcome`]: crate::action::Outcome
//! [`ResultDescriptor`]: crate::action::ResultDescriptor

mod builtin;
mod core;

pub use builtin::{ForwardResult, JsonResult, NoneResult, RenderResult};
pub use core::{ResultDispatcher, ResultType};
