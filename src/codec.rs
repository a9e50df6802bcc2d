//! Structured value codec.
//!
//! The dispatcher never touches a wire format directly. User-defined argument
//! types are decoded, and non-text handler results encoded, through a
//! [`StructuredCodec`]. [`JsonCodec`] is the default.

use serde_json::Value;
use thiserror::Error;

/// Codec failure.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("cannot encode value: {0}")]
    Encode(String),
}

/// Encoder/decoder between strings and structured values.
pub trait StructuredCodec: Send + Sync + std::fmt::Debug {
    fn encode(&self, value: &Value) -> Result<String, CodecError>;

    fn decode(&self, raw: &str) -> Result<Value, CodecError>;
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl StructuredCodec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<String, CodecError> {
        serde_json::to_string(value).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, raw: &str) -> Result<Value, CodecError> {
        serde_json::from_str(raw).map_err(|e| CodecError::Malformed(e.to_string()))
    }
}
