//! Parameter declarations and binding plans.
//!
//! # Responsibilities
//! - Describe the declared type of a handler parameter ([`TypeTag`])
//! - Carry per-parameter name / required / default metadata ([`ParamDecl`])
//! - Compile declarations into the registration-time plan ([`ParamSpec`])
//!
//! # Design Decisions
//! - Type classification is a closed enum computed once at registration
//! - Enum and structured types carry a monomorphized decoder, so the
//!   dispatcher never inspects types at call time
//! - Only structured types without binding metadata bind the whole map

use std::any::{type_name, Any};
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Type-erased decoded value.
pub type AnyValue = Box<dyn Any + Send>;

type Decoder = fn(Value) -> Result<AnyValue, serde_json::Error>;

fn decode_into<T>(value: Value) -> Result<AnyValue, serde_json::Error>
where
    T: DeserializeOwned + Send + 'static,
{
    serde_json::from_value::<T>(value).map(|v| Box::new(v) as AnyValue)
}

/// A user-defined enum resolved by case name.
#[derive(Clone, Copy)]
pub struct EnumType {
    name: &'static str,
    decode: Decoder,
}

impl EnumType {
    /// Describe a unit-variant enum deserializable from its case name.
    pub fn of<E>() -> Self
    where
        E: DeserializeOwned + Send + 'static,
    {
        Self {
            name: type_name::<E>(),
            decode: decode_into::<E>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn resolve(&self, case: &str) -> Result<AnyValue, serde_json::Error> {
        (self.decode)(Value::String(case.to_string()))
    }
}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumType").field(&self.name).finish()
    }
}

/// A user-defined aggregate decoded from structured data.
#[derive(Clone, Copy)]
pub struct StructType {
    name: &'static str,
    decode: Decoder,
}

impl StructType {
    pub fn of<T>() -> Self
    where
        T: DeserializeOwned + Send + 'static,
    {
        Self {
            name: type_name::<T>(),
            decode: decode_into::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn decode(&self, value: Value) -> Result<AnyValue, serde_json::Error> {
        (self.decode)(value)
    }
}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StructType").field(&self.name).finish()
    }
}

/// Declared type of a handler parameter.
#[derive(Debug, Clone, Copy)]
pub enum TypeTag {
    /// Bound verbatim.
    Text,
    Bool,
    Integer,
    Float,
    Enum(EnumType),
    /// Untyped; the raw string is passed through as a structured scalar.
    Opaque,
    Structured(StructType),
}

impl TypeTag {
    pub fn enumeration<E>() -> Self
    where
        E: DeserializeOwned + Send + 'static,
    {
        TypeTag::Enum(EnumType::of::<E>())
    }

    pub fn structured<T>() -> Self
    where
        T: DeserializeOwned + Send + 'static,
    {
        TypeTag::Structured(StructType::of::<T>())
    }

    /// Whether the type lies outside the built-in type set.
    pub fn is_user_defined(&self) -> bool {
        matches!(self, TypeTag::Enum(_) | TypeTag::Structured(_))
    }

    /// Type name used in conversion errors.
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Text => "string",
            TypeTag::Bool => "bool",
            TypeTag::Integer => "integer",
            TypeTag::Float => "float",
            TypeTag::Enum(e) => e.name(),
            TypeTag::Opaque => "opaque",
            TypeTag::Structured(s) => s.name(),
        }
    }
}

/// Named-binding metadata attached to a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParamBinding {
    pub required: bool,
    pub default_value: Option<String>,
}

/// A parameter as declared by a registration source.
#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeTag,
    /// `None` when the parameter carries no named-binding metadata.
    pub binding: Option<ParamBinding>,
}

impl ParamDecl {
    /// A parameter without binding metadata.
    pub fn new(name: &str, ty: TypeTag) -> Self {
        Self {
            name: name.to_string(),
            ty,
            binding: None,
        }
    }

    /// Mark as a named, optional parameter.
    pub fn named(mut self) -> Self {
        self.binding.get_or_insert_with(ParamBinding::default);
        self
    }

    /// Mark as a named parameter that must be present.
    pub fn required(mut self) -> Self {
        self.binding.get_or_insert_with(ParamBinding::default).required = true;
        self
    }

    /// Value used when the argument is absent.
    pub fn with_default(mut self, value: &str) -> Self {
        self.binding
            .get_or_insert_with(ParamBinding::default)
            .default_value = Some(value.to_string());
        self
    }
}

/// Registration-time binding plan of one parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub index: usize,
    pub name: String,
    pub ty: TypeTag,
    pub required: bool,
    pub default_value: Option<String>,
    /// Convert the entire argument map into this parameter.
    pub whole_map: bool,
}

impl ParamSpec {
    pub fn from_decl(index: usize, decl: &ParamDecl) -> Self {
        let (required, default_value, whole_map) = match &decl.binding {
            Some(binding) => (binding.required, binding.default_value.clone(), false),
            None => (false, None, matches!(decl.ty, TypeTag::Structured(_))),
        };
        Self {
            index,
            name: decl.name.clone(),
            ty: decl.ty,
            required,
            default_value,
            whole_map,
        }
    }

    /// Compile a declaration list into a plan indexed `0..n`.
    pub fn plan(decls: &[ParamDecl]) -> Vec<ParamSpec> {
        decls
            .iter()
            .enumerate()
            .map(|(index, decl)| ParamSpec::from_decl(index, decl))
            .collect()
    }
}
