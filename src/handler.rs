//! Handler callables.
//!
//! A handler is bound once at registration as a shared closure taking the
//! positional [`Args`] produced by the binder. No type introspection happens
//! at dispatch time.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::binding::Args;

/// Failure raised by a handler; reported to callers verbatim.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a handler invocation.
pub type HandlerResult = Result<Output, HandlerError>;

/// Shared, thread-safe handler reference.
pub type HandlerFn = Arc<dyn Fn(Args) -> HandlerResult + Send + Sync>;

/// Wrap a closure as a [`HandlerFn`].
pub fn handler_fn<F>(f: F) -> HandlerFn
where
    F: Fn(Args) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Value returned by a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Returned to the caller unchanged.
    Text(String),
    /// Encoded by the structured codec before it is returned.
    Structured(Value),
}

impl Output {
    /// Serialize any value into a structured output.
    pub fn json<T: Serialize>(value: &T) -> HandlerResult {
        Ok(Output::Structured(serde_json::to_value(value)?))
    }

    /// A handler with nothing to return.
    pub fn empty() -> Self {
        Output::Structured(Value::Null)
    }
}

impl From<String> for Output {
    fn from(text: String) -> Self {
        Output::Text(text)
    }
}

impl From<&str> for Output {
    fn from(text: &str) -> Self {
        Output::Text(text.to_string())
    }
}

impl From<Value> for Output {
    fn from(value: Value) -> Self {
        Output::Structured(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Receipt {
        id: u32,
        paid: bool,
    }

    #[test]
    fn test_json_output() {
        let out = Output::json(&Receipt { id: 7, paid: true }).unwrap();
        assert_eq!(out, Output::Structured(serde_json::json!({"id": 7, "paid": true})));
    }

    #[test]
    fn test_text_conversions() {
        assert_eq!(Output::from("ok"), Output::Text("ok".into()));
        assert_eq!(Output::empty(), Output::Structured(Value::Null));
    }

    #[test]
    fn test_handler_fn_is_shared() {
        let handler = handler_fn(|_args| Ok(Output::from("pong")));
        let clone = handler.clone();
        assert!(Arc::ptr_eq(&handler, &clone));
        assert_eq!(clone(Args::default()).unwrap(), Output::from("pong"));
    }
}
