//! Raw string to typed value conversion.

use serde_json::{Map, Value};

use crate::binding::param::{StructType, TypeTag};
use crate::binding::{ArgMap, ArgValue};
use crate::codec::StructuredCodec;
use crate::error::DispatchError;

fn conversion_error(ty: &TypeTag, cause: impl ToString) -> DispatchError {
    DispatchError::Conversion {
        target: ty.name().to_string(),
        cause: cause.to_string(),
    }
}

/// Convert one raw argument into its declared type.
pub fn convert(raw: &str, ty: &TypeTag, codec: &dyn StructuredCodec) -> Result<ArgValue, DispatchError> {
    match ty {
        TypeTag::Text => Ok(ArgValue::Text(raw.to_string())),
        TypeTag::Bool | TypeTag::Integer | TypeTag::Float => convert_scalar(raw, ty, codec),
        TypeTag::Enum(enum_type) => {
            if raw.is_empty() {
                return Ok(ArgValue::Absent);
            }
            enum_type
                .resolve(raw.trim())
                .map(ArgValue::Typed)
                .map_err(|e| conversion_error(ty, e))
        }
        TypeTag::Opaque => Ok(ArgValue::Opaque(Value::String(raw.to_string()))),
        TypeTag::Structured(struct_type) => {
            let value = codec.decode(raw).map_err(|e| conversion_error(ty, e))?;
            struct_type
                .decode(value)
                .map(ArgValue::Typed)
                .map_err(|e| conversion_error(ty, e))
        }
    }
}

fn convert_scalar(raw: &str, ty: &TypeTag, codec: &dyn StructuredCodec) -> Result<ArgValue, DispatchError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(ArgValue::Absent);
    }
    let value = codec.decode(raw).map_err(|e| conversion_error(ty, e))?;
    let converted = match ty {
        TypeTag::Bool => serde_json::from_value(value).map(ArgValue::Bool),
        TypeTag::Integer => serde_json::from_value(value).map(ArgValue::Integer),
        _ => serde_json::from_value(value).map(ArgValue::Float),
    };
    converted.map_err(|e| conversion_error(ty, e))
}

/// Convert the entire argument map into one structured value.
///
/// Values are first offered as strings. If the target rejects that shape,
/// numeric and boolean looking values are re-read as scalars and decoding is
/// retried once; the first error is reported when both attempts fail.
pub fn convert_whole_map(
    args: &ArgMap,
    struct_type: &StructType,
    codec: &dyn StructuredCodec,
) -> Result<ArgValue, DispatchError> {
    let as_strings: Map<String, Value> = args
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    let first_error = match struct_type.decode(Value::Object(as_strings)) {
        Ok(value) => return Ok(ArgValue::Typed(value)),
        Err(e) => e,
    };

    let coerced: Map<String, Value> = args
        .iter()
        .map(|(k, v)| (k.clone(), coerce_scalar(v, codec)))
        .collect();

    struct_type
        .decode(Value::Object(coerced))
        .map(ArgValue::Typed)
        .map_err(|_| DispatchError::Conversion {
            target: struct_type.name().to_string(),
            cause: first_error.to_string(),
        })
}

fn coerce_scalar(raw: &str, codec: &dyn StructuredCodec) -> Value {
    match codec.decode(raw.trim()) {
        Ok(value @ (Value::Number(_) | Value::Bool(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "UPPERCASE")]
    enum Status {
        Active,
        Inactive,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Label {
        code: String,
    }

    fn typed<T: 'static>(value: ArgValue) -> T {
        match value {
            ArgValue::Typed(boxed) => *boxed.downcast::<T>().unwrap(),
            other => panic!("expected typed value, got {:?}", other),
        }
    }

    #[test]
    fn test_text_is_verbatim() {
        let value = convert("  spaced  ", &TypeTag::Text, &JsonCodec).unwrap();
        assert_eq!(value, ArgValue::Text("  spaced  ".into()));
    }

    #[test]
    fn test_scalars() {
        assert_eq!(convert("42", &TypeTag::Integer, &JsonCodec).unwrap(), ArgValue::Integer(42));
        assert_eq!(convert("2.5", &TypeTag::Float, &JsonCodec).unwrap(), ArgValue::Float(2.5));
        assert_eq!(convert("true", &TypeTag::Bool, &JsonCodec).unwrap(), ArgValue::Bool(true));
        assert_eq!(convert("", &TypeTag::Integer, &JsonCodec).unwrap(), ArgValue::Absent);

        let err = convert("forty", &TypeTag::Integer, &JsonCodec).unwrap_err();
        assert!(matches!(err, DispatchError::Conversion { ref target, .. } if target == "integer"));
        assert!(convert("1.5", &TypeTag::Integer, &JsonCodec).is_err());
    }

    #[test]
    fn test_enum_conversion() {
        let tag = TypeTag::enumeration::<Status>();
        assert_eq!(typed::<Status>(convert("ACTIVE", &tag, &JsonCodec).unwrap()), Status::Active);
        assert_eq!(typed::<Status>(convert(" INACTIVE ", &tag, &JsonCodec).unwrap()), Status::Inactive);
        assert_eq!(convert("", &tag, &JsonCodec).unwrap(), ArgValue::Absent);

        let err = convert("BOGUS", &tag, &JsonCodec).unwrap_err();
        match err {
            DispatchError::Conversion { target, cause } => {
                assert!(target.ends_with("Status"));
                assert!(cause.contains("BOGUS"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_opaque_passthrough() {
        let value = convert("{not json", &TypeTag::Opaque, &JsonCodec).unwrap();
        assert_eq!(value, ArgValue::Opaque(Value::String("{not json".into())));
    }

    #[test]
    fn test_structured_single_value() {
        let tag = TypeTag::structured::<Point>();
        let point = typed::<Point>(convert(r#"{"x":1,"y":2}"#, &tag, &JsonCodec).unwrap());
        assert_eq!(point, Point { x: 1, y: 2 });

        assert!(matches!(
            convert("{broken", &tag, &JsonCodec),
            Err(DispatchError::Conversion { .. })
        ));
        assert!(matches!(
            convert(r#"{"x":"a"}"#, &tag, &JsonCodec),
            Err(DispatchError::Conversion { .. })
        ));
    }

    #[test]
    fn test_whole_map_retries_with_scalars() {
        let args: ArgMap = [("x", "1"), ("y", "2")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let point = typed::<Point>(
            convert_whole_map(&args, &StructType::of::<Point>(), &JsonCodec).unwrap(),
        );
        assert_eq!(point, Point { x: 1, y: 2 });
    }

    #[test]
    fn test_whole_map_keeps_numeric_looking_strings() {
        let args: ArgMap = [("code".to_string(), "007".to_string())].into_iter().collect();
        let label = typed::<Label>(
            convert_whole_map(&args, &StructType::of::<Label>(), &JsonCodec).unwrap(),
        );
        assert_eq!(label.code, "007");
    }

    #[test]
    fn test_whole_map_reports_first_error() {
        let args: ArgMap = [("x".to_string(), "one".to_string())].into_iter().collect();
        let err = convert_whole_map(&args, &StructType::of::<Point>(), &JsonCodec).unwrap_err();
        assert!(matches!(err, DispatchError::Conversion { .. }));
    }
}
