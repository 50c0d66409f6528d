//! Field descriptor tables.
//!
//! A [`FieldTable`] is what the schema compiler emits for one record: the
//! declared fields in order, each with its internal identifier, wire key,
//! shape and inclusion policy. Tables are immutable once built and shared
//! through `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{RecordError, Result};
use crate::shape::TypeShape;
use crate::OVERFLOW_CONTAINER;

/// When a field appears in encoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Inclusion {
    /// Always written; an unset slot is written as `null`.
    #[default]
    Always,
    /// Skipped when the slot is unset or holds null.
    OmitIfAbsentOrNull,
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub identifier: String,
    pub wire_key: String,
    pub shape: TypeShape,
    pub inclusion: Inclusion,
}

impl FieldDescriptor {
    pub fn new(identifier: impl Into<String>, wire_key: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            identifier: identifier.into(),
            wire_key: wire_key.into(),
            shape,
            inclusion: Inclusion::Always,
        }
    }

    pub fn optional(
        identifier: impl Into<String>,
        wire_key: impl Into<String>,
        shape: TypeShape,
    ) -> Self {
        Self {
            inclusion: Inclusion::OmitIfAbsentOrNull,
            ..Self::new(identifier, wire_key, shape)
        }
    }

    pub fn is_optional(&self) -> bool {
        self.inclusion == Inclusion::OmitIfAbsentOrNull
    }
}

#[derive(Debug)]
pub struct FieldTable {
    name: String,
    fields: Vec<FieldDescriptor>,
    by_identifier: HashMap<String, usize>,
    by_wire_key: HashMap<String, usize>,
    overflow: TypeShape,
}

impl FieldTable {
    pub fn builder(name: impl Into<String>) -> FieldTableBuilder {
        FieldTableBuilder {
            name: name.into(),
            fields: Vec::new(),
            overflow: TypeShape::Any,
        }
    }

    /// Record name, as given by the schema.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Descriptors in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn get(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    /// Slot index of `identifier`.
    pub fn index_of(&self, identifier: &str) -> Option<usize> {
        self.by_identifier.get(identifier).copied()
    }

    /// Slot index of the field written under `wire_key`.
    pub fn index_of_wire_key(&self, wire_key: &str) -> Option<usize> {
        self.by_wire_key.get(wire_key).copied()
    }

    pub fn descriptor(&self, identifier: &str) -> Option<&FieldDescriptor> {
        self.index_of(identifier).map(|i| &self.fields[i])
    }

    pub fn descriptor_by_wire_key(&self, wire_key: &str) -> Option<&FieldDescriptor> {
        self.index_of_wire_key(wire_key).map(|i| &self.fields[i])
    }

    pub fn is_declared(&self, wire_key: &str) -> bool {
        self.by_wire_key.contains_key(wire_key)
    }

    /// Shape every overflow value must match.
    pub fn overflow_shape(&self) -> &TypeShape {
        &self.overflow
    }
}

impl<'a> IntoIterator for &'a FieldTable {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Fluent constructor for [`FieldTable`].
#[derive(Debug, Clone)]
pub struct FieldTableBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    overflow: TypeShape,
}

impl FieldTableBuilder {
    /// Adds an always-written field.
    pub fn field(
        mut self,
        identifier: impl Into<String>,
        wire_key: impl Into<String>,
        shape: TypeShape,
    ) -> Self {
        self.fields.push(FieldDescriptor::new(identifier, wire_key, shape));
        self
    }

    /// Adds a field omitted from output when absent or null.
    pub fn optional(
        mut self,
        identifier: impl Into<String>,
        wire_key: impl Into<String>,
        shape: TypeShape,
    ) -> Self {
        self.fields
            .push(FieldDescriptor::optional(identifier, wire_key, shape));
        self
    }

    pub fn descriptor(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Constrains overflow values (`additionalProperties: {schema}`).
    pub fn overflow(mut self, shape: TypeShape) -> Self {
        self.overflow = shape;
        self
    }

    pub fn build(self) -> Result<Arc<FieldTable>> {
        let mut by_identifier = HashMap::with_capacity(self.fields.len());
        let mut by_wire_key = HashMap::with_capacity(self.fields.len());
        for (i, field) in self.fields.iter().enumerate() {
            if field.wire_key == OVERFLOW_CONTAINER {
                return Err(RecordError::KeyCollision {
                    record: self.name,
                    key: field.wire_key.clone(),
                });
            }
            if by_identifier.insert(field.identifier.clone(), i).is_some() {
                return Err(RecordError::DuplicateKey {
                    record: self.name,
                    key: field.identifier.clone(),
                    what: "identifier",
                });
            }
            if by_wire_key.insert(field.wire_key.clone(), i).is_some() {
                return Err(RecordError::DuplicateKey {
                    record: self.name,
                    key: field.wire_key.clone(),
                    what: "wire key",
                });
            }
        }
        Ok(Arc::new(FieldTable {
            name: self.name,
            fields: self.fields,
            by_identifier,
            by_wire_key,
            overflow: self.overflow,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Arc<FieldTable> {
        FieldTable::builder("Address")
            .field("streetName", "street_name", TypeShape::string())
            .field("houseNumber", "house_number", TypeShape::float())
            .optional("marriage", "marriage", TypeShape::bool())
            .build()
            .unwrap()
    }

    #[test]
    fn lookups_by_identifier_and_wire_key() {
        let t = table();
        assert_eq!(t.len(), 3);
        assert_eq!(t.index_of("houseNumber"), Some(1));
        assert_eq!(t.index_of_wire_key("house_number"), Some(1));
        assert!(t.index_of("house_number").is_none());
        assert!(t.is_declared("street_name"));
        assert!(!t.is_declared("streetName"));
        assert!(t.descriptor("marriage").unwrap().is_optional());
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let binding = table();
        let keys: Vec<&str> = binding.iter().map(|d| d.wire_key.as_str()).collect();
        assert_eq!(keys, ["street_name", "house_number", "marriage"]);
    }

    #[test]
    fn duplicate_wire_key_is_rejected() {
        let err = FieldTable::builder("T")
            .field("a", "k", TypeShape::any())
            .field("b", "k", TypeShape::any())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::DuplicateKey { ref key, what: "wire key", .. } if key == "k"
        ));
    }

    #[test]
    fn container_name_cannot_be_a_wire_key() {
        let err = FieldTable::builder("T")
            .field("extra", OVERFLOW_CONTAINER, TypeShape::any())
            .build()
            .unwrap_err();
        assert!(err.is_key_collision());
    }

    #[test]
    fn duplicate_identifier_is_rejected() {
        let err = FieldTable::builder("T")
            .field("a", "k1", TypeShape::any())
            .field("a", "k2", TypeShape::any())
            .build()
            .unwrap_err();
        assert!(matches!(err, RecordError::DuplicateKey { what: "identifier", .. }));
    }
}
