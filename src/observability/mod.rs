//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Build phase and every dispatch produce:
//!     → logging.rs (structured log events, one span per call)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout: pretty, compact or JSON)
//!     → Whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Request ID (UUID v4) attached to each dispatch span
//! - Metrics are cheap and can be switched off in config

pub mod logging;
pub mod metrics;
