//! In-process remote call dispatcher.
//!
//! Handlers are registered once at startup with a path template, an optional
//! verb and a parameter plan. Each call supplies a path, a verb and a flat map
//! of string arguments; the dispatcher picks the most specific matching
//! handler, binds the arguments onto typed parameters, invokes it and returns
//! a serialized result (or a serialized failure envelope).

// Routing and binding
pub mod binding;
pub mod routing;

// Handlers and their sources
pub mod codec;
pub mod handler;
pub mod registration;

// Call path
pub mod dispatch;
pub mod error;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use binding::{ArgMap, ArgValue, Args, ParamDecl, TypeTag};
pub use codec::{JsonCodec, StructuredCodec};
pub use config::DispatchConfig;
pub use dispatch::{Dispatcher, ResultEnvelope};
pub use error::{DispatchError, ErrorKind, RegistrationError};
pub use handler::{handler_fn, HandlerFn, HandlerResult, Output};
pub use lifecycle::build_dispatcher;
pub use registration::{HandlerCandidate, RegistrationSource};
pub use routing::{HandlerRegistry, RouteSpec, Verb};
