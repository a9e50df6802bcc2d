//! Result envelopes.
//!
//! Failures never escape `dispatch` as errors; they are folded into a
//! [`ResultEnvelope`] and returned as its serialized form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EnvelopeConfig;
use crate::error::DispatchError;

/// Uniform result body returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ResultEnvelope {
    /// Success envelope carrying `data`.
    pub fn ok(config: &EnvelopeConfig, data: Option<Value>) -> Self {
        Self {
            code: config.success_code.clone(),
            message: config.success_message.clone(),
            kind: None,
            data,
        }
    }

    /// Failure envelope describing `error`.
    pub fn failed(config: &EnvelopeConfig, error: &DispatchError) -> Self {
        Self {
            code: config.failure_code.clone(),
            message: error.to_string(),
            kind: config
                .include_error_kind
                .then(|| error.kind().as_str().to_string()),
            data: None,
        }
    }

    /// Read back an envelope from a dispatch result.
    ///
    /// Returns `None` when `body` is not an envelope (e.g. a plain handler
    /// result).
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    pub fn is_success(&self, config: &EnvelopeConfig) -> bool {
        self.code == config.success_code
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_envelope_shape() {
        let config = EnvelopeConfig::default();
        let err = DispatchError::NoRouteFound {
            path: "/x".into(),
            verb: "GET".into(),
        };
        let envelope = ResultEnvelope::failed(&config, &err);
        assert_eq!(envelope.code, "999999");
        assert_eq!(envelope.kind.as_deref(), Some("NO_ROUTE_FOUND"));
        assert!(!envelope.is_success(&config));

        let value = envelope.to_value();
        assert_eq!(value["message"], "no handler found for url:[/x] method:[GET]");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_kind_can_be_omitted() {
        let config = EnvelopeConfig {
            include_error_kind: false,
            ..EnvelopeConfig::default()
        };
        let envelope = ResultEnvelope::failed(&config, &DispatchError::InvalidInput("x".into()));
        assert_eq!(envelope.kind, None);
        assert!(envelope.to_value().get("kind").is_none());
    }

    #[test]
    fn test_ok_and_parse() {
        let config = EnvelopeConfig::default();
        let envelope = ResultEnvelope::ok(&config, Some(serde_json::json!({"id": 1})));
        let body = serde_json::to_string(&envelope).unwrap();
        let parsed = ResultEnvelope::parse(&body).unwrap();
        assert_eq!(parsed, envelope);
        assert!(parsed.is_success(&config));

        assert!(ResultEnvelope::parse("plain text").is_none());
        assert!(ResultEnvelope::parse(r#"{"id": 1}"#).is_none());
    }
}
