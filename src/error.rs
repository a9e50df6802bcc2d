//! Error definitions for the build and dispatch phases.
//!
//! # Design Decisions
//! - Registration errors are fatal and stop startup
//! - Dispatch errors never cross `Dispatcher::dispatch`; they are folded into
//!   a result envelope carrying [`ErrorKind`]
//! - Handler failures keep the handler's own error as the source

use std::fmt;

use thiserror::Error;

use crate::handler::HandlerError;

/// Errors raised while building the handler registry.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The candidate declared no member-level route.
    #[error("handler [{handler}] declares no route")]
    MissingRoute { handler: String },

    /// The effective path template is empty.
    #[error("handler [{handler}] resolves to an empty path template")]
    EmptyPathTemplate { handler: String },

    /// The same callable was registered twice for the same route.
    #[error("handler [{handler}] is already registered for {route}")]
    Duplicate { handler: String, route: String },
}

/// Errors raised while serving a single dispatch call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The dispatcher cannot serve requests (e.g. nothing was registered).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Path or verb missing or unparseable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No registered template matches the path and verb.
    #[error("no handler found for url:[{path}] method:[{verb}]")]
    NoRouteFound { path: String, verb: String },

    /// A required argument is absent and has no default.
    #[error("remote call url:[{route}] method:[{verb}] parameter:[{name}] is missing")]
    MissingParameter {
        route: String,
        verb: String,
        name: String,
    },

    /// A raw argument could not be converted to its declared type.
    #[error("failed to convert to [{target}]: {cause}")]
    Conversion { target: String, cause: String },

    /// The handler itself failed.
    #[error("{0}")]
    HandlerInvocation(#[source] HandlerError),

    /// Best-match bookkeeping lost track of the selected definition.
    #[error("best match [{template}] for url:[{path}] method:[{verb}] has no handler")]
    InternalConsistency {
        path: String,
        verb: String,
        template: String,
    },
}

impl DispatchError {
    /// Stable classification used by envelopes, logs and metrics.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::Configuration(_) => ErrorKind::Configuration,
            DispatchError::InvalidInput(_) => ErrorKind::InvalidInput,
            DispatchError::NoRouteFound { .. } => ErrorKind::NoRouteFound,
            DispatchError::MissingParameter { .. } => ErrorKind::MissingParameter,
            DispatchError::Conversion { .. } => ErrorKind::Conversion,
            DispatchError::HandlerInvocation(_) => ErrorKind::HandlerInvocation,
            DispatchError::InternalConsistency { .. } => ErrorKind::InternalConsistency,
        }
    }
}

/// Failure classification exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    InvalidInput,
    NoRouteFound,
    MissingParameter,
    Conversion,
    HandlerInvocation,
    InternalConsistency,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "CONFIGURATION_ERROR",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::NoRouteFound => "NO_ROUTE_FOUND",
            ErrorKind::MissingParameter => "MISSING_PARAMETER",
            ErrorKind::Conversion => "CONVERSION_ERROR",
            ErrorKind::HandlerInvocation => "HANDLER_INVOCATION_ERROR",
            ErrorKind::InternalConsistency => "INTERNAL_CONSISTENCY_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
