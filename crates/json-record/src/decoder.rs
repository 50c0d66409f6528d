//! [`Decoder`]: flat value tree to [`Record`].
//!
//! Every input entry is routed either to the declared field whose wire key it
//! carries or to the record's overflow map. Declared values are coerced
//! strictly into their shape; the first mismatch aborts the whole decode.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::encoder::Encoder;
use crate::error::{RecordError, Result};
use crate::options::CodecOptions;
use crate::record::Record;
use crate::shape::TypeShape;
use crate::table::{FieldDescriptor, FieldTable};
use crate::text;
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct Decoder {
    opts: CodecOptions,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(opts: CodecOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.opts
    }

    /// Decodes an object value against `table`.
    pub fn decode(&self, input: &Value, table: &Arc<FieldTable>) -> Result<Record> {
        let record = decode_record(input, table, &Site::root(table), &mut Vec::new(), &self.opts)?;
        debug!(
            target: "json_record::decode",
            record = table.name(),
            overflow = record.overflow_len(),
            "decoded record"
        );
        Ok(record)
    }

    /// Parses JSON text, then decodes it.
    pub fn decode_str(&self, json: &str, table: &Arc<FieldTable>) -> Result<Record> {
        let value = text::parse(json)?;
        self.decode(&value, table)
    }
}

/// Where a value sits in the schema, for mismatch reports.
pub(crate) struct Site<'a> {
    record: &'a str,
    field: &'a str,
    wire_key: &'a str,
}

impl<'a> Site<'a> {
    pub(crate) fn root(table: &'a FieldTable) -> Self {
        Self {
            record: table.name(),
            field: "",
            wire_key: "",
        }
    }

    pub(crate) fn field(table: &'a FieldTable, desc: &'a FieldDescriptor) -> Self {
        Self {
            record: table.name(),
            field: &desc.identifier,
            wire_key: &desc.wire_key,
        }
    }

    /// Overflow entries are named by their wire key.
    pub(crate) fn overflow(table: &'a FieldTable, key: &'a str) -> Self {
        Self {
            record: table.name(),
            field: key,
            wire_key: key,
        }
    }
}

fn decode_record(
    input: &Value,
    table: &Arc<FieldTable>,
    site: &Site<'_>,
    path: &mut Vec<String>,
    opts: &CodecOptions,
) -> Result<Record> {
    let Value::Object(obj) = input else {
        return Err(mismatch(site, path, format!("record `{}`", table.name()), input));
    };

    let mut record = Record::new(table);
    for (key, value) in obj {
        path.push(key.clone());
        match table.index_of_wire_key(key) {
            Some(index) => {
                let desc = &table.fields()[index];
                let value = conform(value, &desc.shape, &Site::field(table, desc), path, opts)?;
                record.put_slot(index, value);
            }
            None if opts.capture_overflow => {
                record.overflow().check_key(key)?;
                let site = Site::overflow(table, key);
                let value = conform(value, table.overflow_shape(), &site, path, opts)?;
                trace!(
                    target: "json_record::decode",
                    record = table.name(),
                    key = %key,
                    "captured overflow entry"
                );
                record.overflow_mut().insert_checked(key.clone(), value);
            }
            None => {
                debug!(
                    target: "json_record::decode",
                    record = table.name(),
                    key = %key,
                    "dropped undeclared key"
                );
            }
        }
        path.pop();
    }
    Ok(record)
}

/// Checks `value` against `shape` and returns its canonical form.
///
/// Nested records come back re-encoded in table order with their own
/// overflow entries last; every other shape returns the value unchanged.
pub(crate) fn conform(
    value: &Value,
    shape: &TypeShape,
    site: &Site<'_>,
    path: &mut Vec<String>,
    opts: &CodecOptions,
) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    match shape {
        TypeShape::Any => Ok(value.clone()),
        TypeShape::Primitive(kind) => {
            if kind.accepts(value.kind()) {
                Ok(value.clone())
            } else {
                Err(mismatch(site, path, shape.to_string(), value))
            }
        }
        TypeShape::Record(table) => {
            let record = decode_record(value, table, site, path, opts)?;
            Ok(Encoder::new().encode(&record))
        }
        TypeShape::ArrayOf(item) => {
            let Value::Array(items) = value else {
                return Err(mismatch(site, path, shape.to_string(), value));
            };
            let mut out = Vec::with_capacity(items.len());
            for (i, v) in items.iter().enumerate() {
                path.push(i.to_string());
                out.push(conform(v, item, site, path, opts)?);
                path.pop();
            }
            Ok(Value::Array(out))
        }
        TypeShape::TupleOf(shapes) => {
            let items = match value {
                Value::Array(items) if items.len() == shapes.len() => items,
                _ => return Err(mismatch(site, path, shape.to_string(), value)),
            };
            let mut out = Vec::with_capacity(items.len());
            for (i, (v, s)) in items.iter().zip(shapes).enumerate() {
                path.push(i.to_string());
                out.push(conform(v, s, site, path, opts)?);
                path.pop();
            }
            Ok(Value::Array(out))
        }
        TypeShape::MapOf(item) => {
            let Value::Object(obj) = value else {
                return Err(mismatch(site, path, shape.to_string(), value));
            };
            let mut out = crate::value::Object::with_capacity(obj.len());
            for (k, v) in obj {
                path.push(k.clone());
                out.insert(k.clone(), conform(v, item, site, path, opts)?);
                path.pop();
            }
            Ok(Value::Object(out))
        }
        TypeShape::Enum(values) => {
            if values.contains(value) {
                Ok(value.clone())
            } else {
                Err(mismatch(site, path, shape.to_string(), value))
            }
        }
        TypeShape::OneOf(alternatives) => match alternatives.iter().find(|s| s.accepts(value)) {
            Some(alternative) => conform(value, alternative, site, path, opts),
            None => Err(mismatch(site, path, shape.to_string(), value)),
        },
    }
}

fn mismatch(site: &Site<'_>, path: &[String], expected: String, found: &Value) -> RecordError {
    RecordError::TypeMismatch {
        record: site.record.to_string(),
        field: site.field.to_string(),
        wire_key: site.wire_key.to_string(),
        path: pointer(path),
        expected,
        found: found.kind(),
    }
}

/// Renders path segments as a JSON pointer (RFC 6901).
pub(crate) fn pointer(path: &[String]) -> String {
    let mut out = String::new();
    for segment in path {
        out.push('/');
        out.push_str(&segment.replace('~', "~0").replace('/', "~1"));
    }
    out
}
