//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate enumerated values (log level, log format)
//! - Check envelope codes are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DispatchConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::DispatchConfig;
use crate::observability::logging::LogFormat;
use crate::routing::pattern::SEPARATOR;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown log level [{0}]")]
    UnknownLogLevel(String),

    #[error("unknown log format [{0}]")]
    UnknownLogFormat(String),

    #[error("envelope {0} must not be empty")]
    EmptyCode(&'static str),

    #[error("envelope success and failure codes are both [{0}]")]
    IndistinctCodes(String),

    #[error("routing base_path [{0}] must start with '/'")]
    RelativeBasePath(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DispatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if LogFormat::parse(&config.observability.log_format).is_none() {
        errors.push(ValidationError::UnknownLogFormat(
            config.observability.log_format.clone(),
        ));
    }

    let envelope = &config.envelope;
    if envelope.success_code.is_empty() {
        errors.push(ValidationError::EmptyCode("success_code"));
    }
    if envelope.failure_code.is_empty() {
        errors.push(ValidationError::EmptyCode("failure_code"));
    }
    if !envelope.success_code.is_empty() && envelope.success_code == envelope.failure_code {
        errors.push(ValidationError::IndistinctCodes(envelope.success_code.clone()));
    }

    let base_path = &config.routing.base_path;
    if !base_path.is_empty() && !base_path.starts_with(SEPARATOR) {
        errors.push(ValidationError::RelativeBasePath(base_path.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
