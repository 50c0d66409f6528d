//! Declared shapes of field values.
//!
//! A [`TypeShape`] is the schema compiler's answer to "what may this field
//! hold". Shapes are checked eagerly on assignment and on decode; the encoder
//! walks them again to emit nested records in table order.

use std::fmt;
use std::sync::Arc;

use crate::table::FieldTable;
use crate::value::{Value, ValueKind};

/// Scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    /// Integer subtype only.
    Integer,
    /// Float subtype only; an integer literal does not qualify.
    Float,
    /// Either numeric subtype, kept as received.
    Number,
    String,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Number => "number",
            Self::String => "string",
        }
    }

    pub fn accepts(self, kind: ValueKind) -> bool {
        matches!(
            (self, kind),
            (Self::Bool, ValueKind::Bool)
                | (Self::Integer, ValueKind::Integer)
                | (Self::Float, ValueKind::Float)
                | (Self::Number, ValueKind::Integer | ValueKind::Float)
                | (Self::String, ValueKind::Str)
        )
    }
}

#[derive(Clone)]
pub enum TypeShape {
    Primitive(PrimitiveKind),
    /// A nested record decoded against its own table.
    Record(Arc<FieldTable>),
    ArrayOf(Box<TypeShape>),
    /// Fixed-length array, one shape per position.
    TupleOf(Vec<TypeShape>),
    /// Object with arbitrary keys and uniformly shaped values.
    MapOf(Box<TypeShape>),
    /// First matching alternative wins.
    OneOf(Vec<TypeShape>),
    /// Closed set of constants; the numeric subtype must match too.
    Enum(Vec<Value>),
    /// Accepts every value.
    Any,
}

impl TypeShape {
    pub fn bool() -> Self {
        Self::Primitive(PrimitiveKind::Bool)
    }

    pub fn integer() -> Self {
        Self::Primitive(PrimitiveKind::Integer)
    }

    pub fn float() -> Self {
        Self::Primitive(PrimitiveKind::Float)
    }

    pub fn number() -> Self {
        Self::Primitive(PrimitiveKind::Number)
    }

    pub fn string() -> Self {
        Self::Primitive(PrimitiveKind::String)
    }

    pub fn enum_of(values: Vec<Value>) -> Self {
        Self::Enum(values)
    }

    pub fn any() -> Self {
        Self::Any
    }

    pub fn record(table: &Arc<FieldTable>) -> Self {
        Self::Record(Arc::clone(table))
    }

    pub fn array_of(item: TypeShape) -> Self {
        Self::ArrayOf(Box::new(item))
    }

    pub fn tuple_of(items: Vec<TypeShape>) -> Self {
        Self::TupleOf(items)
    }

    pub fn map_of(value: TypeShape) -> Self {
        Self::MapOf(Box::new(value))
    }

    pub fn one_of(alternatives: Vec<TypeShape>) -> Self {
        Self::OneOf(alternatives)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Record(_) => "record",
            Self::ArrayOf(_) => "array",
            Self::TupleOf(_) => "tuple",
            Self::MapOf(_) => "map",
            Self::OneOf(_) => "oneOf",
            Self::Enum(_) => "enum",
            Self::Any => "any",
        }
    }

    /// Structural match of `value` against this shape.
    ///
    /// Null matches every shape. Nested records only check their declared
    /// keys and the overflow shape; key order is not considered.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            Self::Any => true,
            Self::Primitive(kind) => kind.accepts(value.kind()),
            Self::Record(table) => match value {
                Value::Object(obj) => obj.iter().all(|(key, v)| {
                    match table.descriptor_by_wire_key(key) {
                        Some(desc) => desc.shape.accepts(v),
                        None => table.overflow_shape().accepts(v),
                    }
                }),
                _ => false,
            },
            Self::ArrayOf(item) => match value {
                Value::Array(items) => items.iter().all(|v| item.accepts(v)),
                _ => false,
            },
            Self::TupleOf(shapes) => match value {
                Value::Array(items) => {
                    items.len() == shapes.len()
                        && items.iter().zip(shapes).all(|(v, s)| s.accepts(v))
                }
                _ => false,
            },
            Self::MapOf(shape) => match value {
                Value::Object(obj) => obj.values().all(|v| shape.accepts(v)),
                _ => false,
            },
            Self::OneOf(alternatives) => alternatives.iter().any(|s| s.accepts(value)),
            Self::Enum(values) => values.contains(value),
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => f.write_str(kind.as_str()),
            Self::Record(table) => write!(f, "record `{}`", table.name()),
            Self::ArrayOf(item) => write!(f, "array of {item}"),
            Self::TupleOf(shapes) => {
                f.write_str("tuple [")?;
                for (i, s) in shapes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{s}")?;
                }
                f.write_str("]")
            }
            Self::MapOf(shape) => write!(f, "map of {shape}"),
            Self::OneOf(alternatives) => {
                f.write_str("one of (")?;
                for (i, s) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{s}")?;
                }
                f.write_str(")")
            }
            Self::Enum(values) => {
                f.write_str("one of the values [")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match serde_json::to_string(v) {
                        Ok(json) => f.write_str(&json)?,
                        Err(_) => write!(f, "{v:?}")?,
                    }
                }
                f.write_str("]")
            }
            Self::Any => f.write_str("any"),
        }
    }
}

// Nested tables print by name only.
impl fmt::Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => f.debug_tuple("Primitive").field(kind).finish(),
            Self::Record(table) => f.debug_tuple("Record").field(&table.name()).finish(),
            Self::ArrayOf(item) => f.debug_tuple("ArrayOf").field(item).finish(),
            Self::TupleOf(shapes) => f.debug_tuple("TupleOf").field(shapes).finish(),
            Self::MapOf(shape) => f.debug_tuple("MapOf").field(shape).finish(),
            Self::OneOf(alternatives) => f.debug_tuple("OneOf").field(alternatives).finish(),
            Self::Enum(values) => f.debug_tuple("Enum").field(values).finish(),
            Self::Any => f.write_str("Any"),
        }
    }
}
