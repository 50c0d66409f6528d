//! [`Encoder`]: [`Record`] to flat value tree.
//!
//! Declared fields come first, in table order, followed by the overflow
//! entries in their insertion order. Nested records are walked against their
//! own tables so the same layout holds at every depth.

use tracing::trace;

use crate::error::Result;
use crate::options::CodecOptions;
use crate::record::Record;
use crate::shape::TypeShape;
use crate::table::{FieldTable, Inclusion};
use crate::text;
use crate::value::{Object, Value};

#[derive(Debug, Clone, Default)]
pub struct Encoder {
    opts: CodecOptions,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(opts: CodecOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.opts
    }

    /// Encodes `record`. Never fails: every stored value already fits its shape.
    pub fn encode(&self, record: &Record) -> Value {
        let table = record.table();
        let out = self.encode_fields(
            table,
            record.slots().iter().map(Option::as_ref),
            record.overflow().iter(),
        );
        trace!(
            target: "json_record::encode",
            record = table.name(),
            keys = out.len(),
            "encoded record"
        );
        Value::Object(out)
    }

    /// Encodes `record` as compact JSON text.
    pub fn encode_to_string(&self, record: &Record) -> Result<String> {
        text::to_string(&self.encode(record))
    }

    fn encode_fields<'a>(
        &self,
        table: &FieldTable,
        slots: impl Iterator<Item = Option<&'a Value>>,
        overflow: impl Iterator<Item = (&'a String, &'a Value)>,
    ) -> Object {
        let mut out = Object::with_capacity(table.len());
        for (desc, slot) in table.iter().zip(slots) {
            let value = match (slot, desc.inclusion) {
                (None | Some(Value::Null), Inclusion::OmitIfAbsentOrNull) => continue,
                (None | Some(Value::Null), Inclusion::Always) => Value::Null,
                (Some(v), _) => self.encode_value(v, &desc.shape),
            };
            out.insert(desc.wire_key.clone(), value);
        }
        if self.opts.emit_overflow {
            for (key, value) in overflow {
                out.insert(key.clone(), self.encode_value(value, table.overflow_shape()));
            }
        }
        out
    }

    fn encode_value(&self, value: &Value, shape: &TypeShape) -> Value {
        match (shape, value) {
            (TypeShape::Record(table), Value::Object(obj)) => Value::Object(self.encode_fields(
                table,
                table.iter().map(|desc| obj.get(&desc.wire_key)),
                obj.iter().filter(|(key, _)| !table.is_declared(key)),
            )),
            (TypeShape::ArrayOf(item), Value::Array(items)) => {
                Value::Array(items.iter().map(|v| self.encode_value(v, item)).collect())
            }
            (TypeShape::TupleOf(shapes), Value::Array(items)) => Value::Array(
                items
                    .iter()
                    .zip(shapes)
                    .map(|(v, s)| self.encode_value(v, s))
                    .collect(),
            ),
            (TypeShape::MapOf(item), Value::Object(obj)) => Value::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), self.encode_value(v, item)))
                    .collect(),
            ),
            (TypeShape::OneOf(alternatives), _) => {
                match alternatives.iter().find(|s| s.accepts(value)) {
                    Some(alternative) => self.encode_value(value, alternative),
                    None => value.clone(),
                }
            }
            _ => value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::decoder::Decoder;

    fn point() -> Arc<FieldTable> {
        FieldTable::builder("Point")
            .field("x", "x", TypeShape::integer())
            .optional("y", "y", TypeShape::integer())
            .build()
            .unwrap()
    }

    fn line() -> Arc<FieldTable> {
        FieldTable::builder("Line")
            .field("label", "label", TypeShape::string())
            .optional("points", "points", TypeShape::array_of(TypeShape::record(&point())))
            .build()
            .unwrap()
    }

    #[test]
    fn unset_fields_follow_inclusion_policy() {
        let record = Record::new(&point());
        assert_eq!(Encoder::new().encode_to_string(&record).unwrap(), r#"{"x":null}"#);

        let mut record = Record::new(&point());
        record.set("y", Value::Null).unwrap();
        assert_eq!(Encoder::new().encode_to_string(&record).unwrap(), r#"{"x":null}"#);
    }

    #[test]
    fn overflow_follows_declared_fields() {
        let record = Decoder::new()
            .decode_str(r#"{"z":true,"y":2,"x":1}"#, &point())
            .unwrap();
        assert_eq!(
            Encoder::new().encode_to_string(&record).unwrap(),
            r#"{"x":1,"y":2,"z":true}"#
        );
    }

    #[test]
    fn emit_overflow_off_reaches_nested_records() {
        let record = Decoder::new()
            .decode_str(
                r#"{"points":[{"x":1,"extra":1}],"label":"l","top":0}"#,
                &line(),
            )
            .unwrap();
        let strict = Encoder::with_options(CodecOptions {
            emit_overflow: false,
            ..Default::default()
        });
        assert_eq!(
            strict.encode_to_string(&record).unwrap(),
            r#"{"label":"l","points":[{"x":1}]}"#
        );
        assert_eq!(
            Encoder::new().encode_to_string(&record).unwrap(),
            r#"{"label":"l","points":[{"x":1,"extra":1}],"top":0}"#
        );
    }
}
