//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     HandlerCandidate (group route + member route)
//!     → route.rs (combine, normalize trailing separator)
//!     → pattern.rs (compile template once)
//!     → registry.rs (reject empty / duplicate, freeze)
//!
//! Lookup (per call):
//!     (path, verb)
//!     → registry.rs (exact scan, then pattern scan)
//!     → pattern.rs (specificity order, variable extraction)
//! ```
//!
//! # Design Decisions
//! - Registry is immutable after build and scanned linearly in registration order
//! - Literal templates short-circuit pattern evaluation
//! - Specificity is a total order, so selection is deterministic
//! - No regex: templates compile to a small token matcher

pub mod pattern;
pub mod registry;
pub mod route;

pub use pattern::PathPattern;
pub use registry::{HandlerDefinition, HandlerRegistry, RegistryBuilder};
pub use route::{RouteSpec, Verb};
