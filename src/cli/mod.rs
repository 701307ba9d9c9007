//! # CLI Module
//!
//! Command-line access to the matcher and to routers described by a
//! manifest.
//!
//! ## Commands
//!
//! ### `match`
//!
//! ```bash
//! actionrouter match '/abc/**' /abc/1/2
//! actionrouter match --prefix '/abc/*/def' /abc/x
//! ```
//!
//! ### `routes`
//!
//! List every registered pattern with its lifecycle and interceptor chain:
//!
//! ```bash
//! actionrouter routes --manifest router.yaml
//! ```
//!
//! ### `resolve`
//!
//! ```bash
//! actionrouter resolve --manifest router.yaml /users/42
//! ```
//!
//! ### `dispatch`
//!
//! Run the full pipeline. Handler types are answered by the echo handler,
//! so results, forwards and renders can be checked before real handlers
//! exist:
//!
//! ```bash
//! actionrouter dispatch --manifest router.yaml /users/42 --arg '{"verbose":true}'
//! ```
//!
//! Logging is configured through `ACTR_LOG_*` (see [`crate::logging`]).

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands};
