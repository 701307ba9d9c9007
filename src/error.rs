//! Error types shared by every layer of the router.
//!
//! Handler, interceptor and collaborator code reports failures with
//! [`anyhow::Error`]; the core wraps those into [`RouterError`] so callers can
//! tell "no such path" apart from "handler failed" and "misconfigured".

use thiserror::Error;

/// Coarse classification of a [`RouterError`].
///
/// Transport bindings use this to pick a recovery policy, e.g. a 404-style
/// response for [`ErrorKind::NotFound`] and a 500-style response otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No handler or result matched.
    NotFound,
    /// A handler, interceptor, result type or collaborator failed at call time.
    Invocation,
    /// A registration was rejected or references something that does not exist.
    Misconfiguration,
}

/// Every failure the router can surface.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The normalized pattern already has a handler.
    #[error("path pattern '{pattern}' is already registered (existing: '{existing}')")]
    DuplicatePath {
        /// Pattern that was being registered.
        pattern: String,
        /// Pattern of the handler already occupying the slot.
        existing: String,
    },

    /// An interceptor, stack, namespace or result type name is already taken.
    #[error("{kind} '{name}' is already registered")]
    DuplicateName {
        /// What kind of registration collided.
        kind: &'static str,
        /// The colliding name.
        name: String,
    },

    /// The pattern text could not be parsed.
    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Offending pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A registration references a name that was never registered.
    #[error("unknown {kind} '{name}'")]
    UnknownReference {
        /// What kind of object was referenced.
        kind: &'static str,
        /// The missing name.
        name: String,
    },

    /// No registered pattern matches the path.
    #[error("no handler registered for path '{path}'")]
    NotFound {
        /// The path as requested.
        path: String,
    },

    /// The handler selected a result name that neither its own table nor the
    /// global results declare.
    #[error("result '{result}' is not declared for '{pattern}'")]
    ResultNotFound {
        /// Pattern of the handler that produced the outcome.
        pattern: String,
        /// Result name that could not be found.
        result: String,
    },

    /// A result descriptor names a result type nobody registered.
    #[error("no result type registered for '{result_type}'")]
    UnknownResultType {
        /// The result type tag.
        result_type: String,
    },

    /// The parameter converter rejected the call arguments.
    #[error("parameter conversion failed for '{pattern}'")]
    ParameterConversion {
        /// Pattern of the target handler.
        pattern: String,
        /// Converter failure.
        #[source]
        source: anyhow::Error,
    },

    /// An object factory failed to build a handler or interceptor.
    #[error("failed to instantiate '{target}'")]
    Instantiation {
        /// Type name or pattern that was being constructed.
        target: String,
        /// Factory failure.
        #[source]
        source: anyhow::Error,
    },

    /// Handler, interceptor or result type code failed.
    #[error("invocation of '{target}' failed")]
    Invocation {
        /// Which unit failed (pattern, interceptor name or result type).
        target: String,
        /// Original failure.
        #[source]
        source: anyhow::Error,
    },
}

impl RouterError {
    /// Wrap a failure raised by handler or interceptor code.
    pub fn invocation(target: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Invocation {
            target: target.into(),
            source: source.into(),
        }
    }

    /// Classify the error for transport bindings.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouterError::NotFound { .. } | RouterError::ResultNotFound { .. } => ErrorKind::NotFound,
            RouterError::DuplicatePath { .. }
            | RouterError::DuplicateName { .. }
            | RouterError::InvalidPattern { .. }
            | RouterError::UnknownReference { .. }
            | RouterError::UnknownResultType { .. } => ErrorKind::Misconfiguration,
            RouterError::ParameterConversion { .. }
            | RouterError::Instantiation { .. }
            | RouterError::Invocation { .. } => ErrorKind::Invocation,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = RouterError> = std::result::Result<T, E>;
