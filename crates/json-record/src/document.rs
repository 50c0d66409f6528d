//! Schema documents: the serialized form of compiled field tables.
//!
//! ```json
//! {"records": [
//!   {"name": "NestedObject", "fields": [{"name": "test", "shape": "string"}]},
//!   {"name": "Address", "fields": [
//!     {"name": "streetName", "key": "street_name", "shape": "string"},
//!     {"name": "nestedObject", "shape": {"record": "NestedObject"}, "optional": true}
//!   ]}
//! ]}
//! ```
//!
//! Records may only reference records declared before them.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RecordError, Result};
use crate::shape::TypeShape;
use crate::table::{FieldDescriptor, FieldTable};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub records: Vec<RecordDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDoc {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDoc>,
    /// Overflow value shape; any value when omitted.
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<ShapeDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDoc {
    /// Internal identifier.
    pub name: String,
    /// Wire key; defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub shape: ShapeDoc,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeDoc {
    String,
    Integer,
    Float,
    Number,
    Boolean,
    Any,
    Array(Box<ShapeDoc>),
    Tuple(Vec<ShapeDoc>),
    Map(Box<ShapeDoc>),
    OneOf(Vec<ShapeDoc>),
    /// Allowed constants.
    Enum(Vec<Value>),
    /// Name of an earlier record in the same document.
    Record(String),
}

impl ShapeDoc {
    fn compile(&self, known: &IndexMap<String, Arc<FieldTable>>) -> Result<TypeShape> {
        Ok(match self {
            Self::String => TypeShape::string(),
            Self::Integer => TypeShape::integer(),
            Self::Float => TypeShape::float(),
            Self::Number => TypeShape::number(),
            Self::Boolean => TypeShape::bool(),
            Self::Any => TypeShape::any(),
            Self::Array(item) => TypeShape::array_of(item.compile(known)?),
            Self::Tuple(items) => TypeShape::tuple_of(compile_all(items, known)?),
            Self::Map(value) => TypeShape::map_of(value.compile(known)?),
            Self::OneOf(alternatives) => TypeShape::one_of(compile_all(alternatives, known)?),
            Self::Enum(values) => TypeShape::enum_of(values.clone()),
            Self::Record(name) => match known.get(name) {
                Some(table) => TypeShape::record(table),
                None => return Err(RecordError::UnknownRecord(name.clone())),
            },
        })
    }
}

fn compile_all(
    shapes: &[ShapeDoc],
    known: &IndexMap<String, Arc<FieldTable>>,
) -> Result<Vec<TypeShape>> {
    shapes.iter().map(|s| s.compile(known)).collect()
}

/// Compiled tables by record name, in document order.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: IndexMap<String, Arc<FieldTable>>,
}

impl SchemaRegistry {
    pub fn from_document(doc: &SchemaDocument) -> Result<Self> {
        let mut tables: IndexMap<String, Arc<FieldTable>> = IndexMap::new();
        for record in &doc.records {
            if tables.contains_key(&record.name) {
                return Err(RecordError::DuplicateKey {
                    record: record.name.clone(),
                    key: record.name.clone(),
                    what: "record",
                });
            }
            let mut builder = FieldTable::builder(record.name.as_str());
            for field in &record.fields {
                let shape = field.shape.compile(&tables)?;
                let key = field.key.as_deref().unwrap_or(&field.name);
                builder = builder.descriptor(if field.optional {
                    FieldDescriptor::optional(field.name.as_str(), key, shape)
                } else {
                    FieldDescriptor::new(field.name.as_str(), key, shape)
                });
            }
            if let Some(shape) = &record.additional_properties {
                builder = builder.overflow(shape.compile(&tables)?);
            }
            let table = builder.build()?;
            debug!(
                target: "json_record::schema",
                record = table.name(),
                fields = table.len(),
                "compiled record table"
            );
            tables.insert(record.name.clone(), table);
        }
        Ok(Self { tables })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: SchemaDocument = serde_json::from_str(json)?;
        Self::from_document(&doc)
    }

    pub fn get(&self, name: &str) -> Result<&Arc<FieldTable>> {
        self.tables
            .get(name)
            .ok_or_else(|| RecordError::UnknownRecord(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<FieldTable>)> + '_ {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }
}
