//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file. Every
//! section has defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the dispatcher.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DispatchConfig {
    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Failure envelope settings.
    pub envelope: EnvelopeConfig,

    /// Registration-time routing settings.
    pub routing: RoutingConfig,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format (pretty, json, compact).
    pub log_format: String,

    /// Log the raw argument map of every call at debug level.
    pub log_arguments: bool,

    /// Record dispatch counters and latency histograms.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            log_arguments: true,
            metrics_enabled: true,
        }
    }
}

/// Result envelope configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Code carried by success envelopes.
    pub success_code: String,

    /// Message carried by success envelopes.
    pub success_message: String,

    /// Code carried by every failure envelope.
    pub failure_code: String,

    /// Add the failure kind (e.g. `NO_ROUTE_FOUND`) to failure envelopes.
    pub include_error_kind: bool,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            success_code: "000000".to_string(),
            success_message: "success".to_string(),
            failure_code: "999999".to_string(),
            include_error_kind: true,
        }
    }
}

/// Routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RoutingConfig {
    /// Group prefix for handlers that declare no group route.
    pub base_path: String,
}
