//! [`Record`]: one populated instance of a [`FieldTable`].
//!
//! Slots hold canonical values: every assignment is checked against the
//! declared shape, and nested records are stored re-encoded so their keys
//! follow the nested table.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::decoder::{conform, pointer, Decoder, Site};
use crate::encoder::Encoder;
use crate::error::{RecordError, Result};
use crate::extension::{ExtensionFields, OverflowKeys};
use crate::options::CodecOptions;
use crate::shape::TypeShape;
use crate::table::{FieldDescriptor, FieldTable};
use crate::value::{Value, ValueKind};

#[derive(Clone)]
pub struct Record {
    table: Arc<FieldTable>,
    slots: Vec<Option<Value>>,
    overflow: ExtensionFields,
}

impl Record {
    /// Empty record: every slot unset, no overflow.
    pub fn new(table: &Arc<FieldTable>) -> Self {
        Self {
            table: Arc::clone(table),
            slots: vec![None; table.len()],
            overflow: ExtensionFields::new(table),
        }
    }

    pub fn table(&self) -> &Arc<FieldTable> {
        &self.table
    }

    pub fn name(&self) -> &str {
        self.table.name()
    }

    fn index(&self, identifier: &str) -> Result<usize> {
        self.table
            .index_of(identifier)
            .ok_or_else(|| RecordError::UnknownField {
                record: self.table.name().to_string(),
                identifier: identifier.to_string(),
            })
    }

    /// Current slot value; `None` when unset.
    pub fn get(&self, identifier: &str) -> Result<Option<&Value>> {
        let index = self.index(identifier)?;
        Ok(self.slots[index].as_ref())
    }

    /// Assigns a slot, failing with `TypeMismatch` if `value` does not fit
    /// the declared shape. Null is always accepted.
    pub fn set(&mut self, identifier: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.index(identifier)?;
        let value: Value = value.into();
        let desc = &self.table.fields()[index];
        let value = conform(
            &value,
            &desc.shape,
            &Site::field(&self.table, desc),
            &mut vec![desc.wire_key.clone()],
            &CodecOptions::default(),
        )?;
        self.slots[index] = Some(value);
        Ok(())
    }

    /// Clears a slot, returning what it held.
    pub fn unset(&mut self, identifier: &str) -> Result<Option<Value>> {
        let index = self.index(identifier)?;
        Ok(self.slots[index].take())
    }

    pub fn is_set(&self, identifier: &str) -> Result<bool> {
        let index = self.index(identifier)?;
        Ok(self.slots[index].is_some())
    }

    pub fn get_str(&self, identifier: &str) -> Result<Option<&str>> {
        Ok(self.get(identifier)?.and_then(Value::as_str))
    }

    pub fn get_bool(&self, identifier: &str) -> Result<Option<bool>> {
        Ok(self.get(identifier)?.and_then(Value::as_bool))
    }

    pub fn get_i64(&self, identifier: &str) -> Result<Option<i64>> {
        Ok(self.get(identifier)?.and_then(Value::as_i64))
    }

    /// Integer slots widen to `f64`.
    pub fn get_f64(&self, identifier: &str) -> Result<Option<f64>> {
        Ok(self.get(identifier)?.and_then(Value::as_f64))
    }

    pub fn get_array(&self, identifier: &str) -> Result<Option<&[Value]>> {
        Ok(self.get(identifier)?.and_then(Value::as_array))
    }

    /// Materializes a nested record slot, overflow included.
    ///
    /// Returns `None` when the slot is unset, null, or not declared with a
    /// record shape.
    pub fn get_record(&self, identifier: &str) -> Result<Option<Record>> {
        let index = self.index(identifier)?;
        let TypeShape::Record(nested) = &self.table.fields()[index].shape else {
            return Ok(None);
        };
        match &self.slots[index] {
            Some(value @ Value::Object(_)) => Decoder::new().decode(value, nested).map(Some),
            _ => Ok(None),
        }
    }

    /// Stores `record` in a slot declared with a record shape of the same name.
    ///
    /// The encoded record is checked against the declared table like any
    /// other assignment.
    pub fn set_record(&mut self, identifier: &str, record: &Record) -> Result<()> {
        let index = self.index(identifier)?;
        let desc = &self.table.fields()[index];
        match &desc.shape {
            TypeShape::Record(nested) if nested.name() == record.name() => {}
            shape => {
                return Err(RecordError::TypeMismatch {
                    record: self.table.name().to_string(),
                    field: desc.identifier.clone(),
                    wire_key: desc.wire_key.clone(),
                    path: pointer(&[desc.wire_key.clone()]),
                    expected: shape.to_string(),
                    found: ValueKind::Object,
                });
            }
        }
        // Same name is not same table; the fields still have to fit.
        self.set(identifier, Encoder::new().encode(record))
    }

    pub fn get_overflow(&self, key: &str) -> Result<Option<&Value>> {
        self.overflow.get(key)
    }

    /// Inserts or replaces an overflow entry; see [`ExtensionFields::insert`].
    pub fn set_overflow(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        self.overflow.insert(key, value)
    }

    pub fn remove_overflow(&mut self, key: &str) -> Result<Option<Value>> {
        self.overflow.remove(key)
    }

    pub fn overflow_keys(&self) -> OverflowKeys<'_> {
        self.overflow.keys()
    }

    pub fn overflow(&self) -> &ExtensionFields {
        &self.overflow
    }

    pub fn overflow_len(&self) -> usize {
        self.overflow.len()
    }

    /// Declared fields in table order with their slot values.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, Option<&Value>)> + '_ {
        self.table
            .iter()
            .zip(self.slots.iter().map(Option::as_ref))
    }

    pub(crate) fn slots(&self) -> &[Option<Value>] {
        &self.slots
    }

    /// Stores an already conformed value.
    pub(crate) fn put_slot(&mut self, index: usize, value: Value) {
        self.slots[index] = Some(value);
    }

    pub(crate) fn overflow_mut(&mut self) -> &mut ExtensionFields {
        &mut self.overflow
    }

    /// Encodes with default options.
    pub fn encode(&self) -> Value {
        Encoder::new().encode(self)
    }

    /// Decodes with default options.
    pub fn decode(input: &Value, table: &Arc<FieldTable>) -> Result<Self> {
        Decoder::new().decode(input, table)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Encoder::new().encode_to_string(self)
    }

    pub fn from_json_str(json: &str, table: &Arc<FieldTable>) -> Result<Self> {
        Decoder::new().decode_str(json, table)
    }
}

/// Unset and null slots compare equal; they encode to the same wire state.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        fn normalized(slot: &Option<Value>) -> Option<&Value> {
            slot.as_ref().filter(|v| !v.is_null())
        }

        self.table.name() == other.table.name()
            && self.slots.len() == other.slots.len()
            && self
                .slots
                .iter()
                .zip(&other.slots)
                .all(|(a, b)| normalized(a) == normalized(b))
            && self.overflow == other.overflow
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.table.name());
        for (desc, slot) in self.fields() {
            if let Some(value) = slot {
                s.field(&desc.identifier, value);
            }
        }
        if !self.overflow.is_empty() {
            s.field("overflow", &self.overflow);
        }
        s.finish()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.encode().serialize(serializer)
    }
}
