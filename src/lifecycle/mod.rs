//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     DispatchConfig + RegistrationSource
//!     → RegistryBuilder (base path, candidates)
//!     → HandlerRegistry (frozen)
//!     → Dispatcher (codec, envelope, observability settings)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then registry, then dispatcher
//! - Fail fast: any registration error aborts startup
//! - Nothing to shut down; a dispatcher holds no threads or sockets

pub mod startup;

pub use startup::build_dispatcher;
