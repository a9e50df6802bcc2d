//! Parameter binding subsystem.
//!
//! # Data Flow
//! ```text
//! ArgMap (raw strings + extracted path variables)
//!     → ParameterBinder (per ParamSpec, in index order)
//!         → required / default resolution
//!         → convert.rs (TypeTag switch or whole-map decode)
//!     → Args (positional, typed)
//!     → handler
//! ```
//!
//! # Design Decisions
//! - The binder never mutates the argument map
//! - Whole-map parameters ignore their own name and default
//! - Conversion failures are never coerced away; they surface as
//!   `ConversionError` naming the target type

pub mod convert;
pub mod param;

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::codec::StructuredCodec;
use crate::error::DispatchError;
use crate::routing::registry::HandlerDefinition;

pub use param::{AnyValue, EnumType, ParamBinding, ParamDecl, ParamSpec, StructType, TypeTag};

/// Raw request arguments, keyed by argument or path-variable name.
pub type ArgMap = HashMap<String, String>;

/// A bound argument value.
pub enum ArgValue {
    /// No value and no default.
    Absent,
    Text(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    Opaque(Value),
    /// Decoded enum or structured value.
    Typed(AnyValue),
}

impl fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Absent => f.write_str("Absent"),
            ArgValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            ArgValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            ArgValue::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            ArgValue::Float(x) => f.debug_tuple("Float").field(x).finish(),
            ArgValue::Opaque(v) => f.debug_tuple("Opaque").field(v).finish(),
            ArgValue::Typed(_) => f.write_str("Typed(..)"),
        }
    }
}

// Typed values are opaque and never compare equal.
impl PartialEq for ArgValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ArgValue::Absent, ArgValue::Absent) => true,
            (ArgValue::Text(a), ArgValue::Text(b)) => a == b,
            (ArgValue::Bool(a), ArgValue::Bool(b)) => a == b,
            (ArgValue::Integer(a), ArgValue::Integer(b)) => a == b,
            (ArgValue::Float(a), ArgValue::Float(b)) => a == b,
            (ArgValue::Opaque(a), ArgValue::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

/// Positional arguments handed to a handler.
#[derive(Debug, Default)]
pub struct Args {
    values: Vec<ArgValue>,
}

impl Args {
    pub fn new(values: Vec<ArgValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ArgValue> {
        self.values.get(index)
    }

    pub fn is_absent(&self, index: usize) -> bool {
        matches!(self.values.get(index), None | Some(ArgValue::Absent))
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        match self.values.get(index)? {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn boolean(&self, index: usize) -> Option<bool> {
        match self.values.get(index)? {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn integer(&self, index: usize) -> Option<i64> {
        match self.values.get(index)? {
            ArgValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn float(&self, index: usize) -> Option<f64> {
        match self.values.get(index)? {
            ArgValue::Float(x) => Some(*x),
            ArgValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn opaque(&self, index: usize) -> Option<&Value> {
        match self.values.get(index)? {
            ArgValue::Opaque(v) => Some(v),
            _ => None,
        }
    }

    /// Move a decoded enum or structured value out of the argument list.
    ///
    /// Returns `None` (and leaves the slot untouched) on a type mismatch.
    pub fn take<T: 'static>(&mut self, index: usize) -> Option<T> {
        let slot = self.values.get_mut(index)?;
        match std::mem::replace(slot, ArgValue::Absent) {
            ArgValue::Typed(boxed) => match boxed.downcast::<T>() {
                Ok(value) => Some(*value),
                Err(boxed) => {
                    *slot = ArgValue::Typed(boxed);
                    None
                }
            },
            other => {
                *slot = other;
                None
            }
        }
    }
}

/// Binds an argument map onto a handler's parameter plan.
#[derive(Debug, Clone, Copy)]
pub struct ParameterBinder<'a> {
    codec: &'a dyn StructuredCodec,
}

impl<'a> ParameterBinder<'a> {
    pub fn new(codec: &'a dyn StructuredCodec) -> Self {
        Self { codec }
    }

    /// Bind every parameter of `definition` in index order.
    pub fn bind_all(&self, definition: &HandlerDefinition, args: &ArgMap) -> Result<Args, DispatchError> {
        definition
            .params()
            .iter()
            .map(|spec| self.bind(definition, spec, args))
            .collect::<Result<Vec<_>, _>>()
            .map(Args::new)
    }

    /// Bind a single parameter.
    pub fn bind(
        &self,
        definition: &HandlerDefinition,
        spec: &ParamSpec,
        args: &ArgMap,
    ) -> Result<ArgValue, DispatchError> {
        let raw = args.get(&spec.name);

        if spec.required && raw.is_none() && spec.default_value.is_none() {
            let route = definition.route();
            tracing::debug!(
                route = %route.path_template(),
                verb = route.verb_label(),
                param = %spec.name,
                "Required parameter missing"
            );
            return Err(DispatchError::MissingParameter {
                route: route.path_template().to_string(),
                verb: route.verb_label().to_string(),
                name: spec.name.clone(),
            });
        }

        if spec.whole_map {
            if let TypeTag::Structured(struct_type) = &spec.ty {
                return convert::convert_whole_map(args, struct_type, self.codec);
            }
        }

        match raw.or(spec.default_value.as_ref()) {
            Some(raw) => convert::convert(raw, &spec.ty, self.codec),
            None => Ok(ArgValue::Absent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use crate::handler::{handler_fn, Output};
    use crate::routing::route::RouteSpec;

    fn definition(params: Vec<ParamDecl>) -> HandlerDefinition {
        HandlerDefinition::new(
            "orders::search",
            RouteSpec::get("/orders"),
            handler_fn(|_| Ok(Output::empty())),
            ParamSpec::plan(&params),
        )
    }

    fn args(pairs: &[(&str, &str)]) -> ArgMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_required_without_default_fails() {
        let def = definition(vec![ParamDecl::new("amount", TypeTag::Integer).required()]);
        let err = ParameterBinder::new(&JsonCodec)
            .bind_all(&def, &ArgMap::new())
            .unwrap_err();
        match err {
            DispatchError::MissingParameter { route, verb, name } => {
                assert_eq!(route, "/orders");
                assert_eq!(verb, "GET");
                assert_eq!(name, "amount");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_required_with_default_uses_default() {
        let def = definition(vec![ParamDecl::new("page", TypeTag::Integer)
            .required()
            .with_default("1")]);
        let bound = ParameterBinder::new(&JsonCodec)
            .bind_all(&def, &ArgMap::new())
            .unwrap();
        assert_eq!(bound.integer(0), Some(1));
    }

    #[test]
    fn test_present_value_beats_default() {
        let def = definition(vec![ParamDecl::new("page", TypeTag::Integer).with_default("1")]);
        let bound = ParameterBinder::new(&JsonCodec)
            .bind_all(&def, &args(&[("page", "3")]))
            .unwrap();
        assert_eq!(bound.integer(0), Some(3));
    }

    #[test]
    fn test_optional_absent_binds_absent() {
        let def = definition(vec![
            ParamDecl::new("q", TypeTag::Text).named(),
            ParamDecl::new("free", TypeTag::Text),
        ]);
        let bound = ParameterBinder::new(&JsonCodec)
            .bind_all(&def, &ArgMap::new())
            .unwrap();
        assert_eq!(bound.len(), 2);
        assert!(bound.is_absent(0));
        assert!(bound.is_absent(1));
    }

    #[test]
    fn test_binder_leaves_map_untouched() {
        let def = definition(vec![ParamDecl::new("q", TypeTag::Text).named()]);
        let map = args(&[("q", "shoes"), ("extra", "x")]);
        let before = map.clone();
        let bound = ParameterBinder::new(&JsonCodec).bind_all(&def, &map).unwrap();
        assert_eq!(bound.text(0), Some("shoes"));
        assert_eq!(map, before);
    }

    #[test]
    fn test_take_typed_value() {
        let mut bound = Args::new(vec![ArgValue::Typed(Box::new(5u8)), ArgValue::Text("t".into())]);
        assert_eq!(bound.take::<String>(0), None);
        assert_eq!(bound.take::<u8>(0), Some(5));
        assert!(bound.is_absent(0));
        assert_eq!(bound.take::<String>(1), None);
        assert_eq!(bound.text(1), Some("t"));
        assert_eq!(bound.take::<u8>(9), None);
    }
}
