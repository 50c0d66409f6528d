//! [`ExtensionFields`]: the overflow map of a record.
//!
//! Holds wire entries that match no declared field, in the order they were
//! first seen. The map is bound to its record's table so that a key can never
//! shadow a declared wire key: every mutation checks it. The container name
//! itself is reserved as well, so it never shows up as a flattened key.

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::decoder::{conform, Site};
use crate::error::{RecordError, Result};
use crate::options::CodecOptions;
use crate::table::FieldTable;
use crate::value::Value;
use crate::OVERFLOW_CONTAINER;

#[derive(Clone)]
pub struct ExtensionFields {
    table: Arc<FieldTable>,
    entries: IndexMap<String, Value>,
}

impl ExtensionFields {
    pub fn new(table: &Arc<FieldTable>) -> Self {
        Self {
            table: Arc::clone(table),
            entries: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Result<Option<&Value>> {
        self.check_key(key)?;
        Ok(self.entries.get(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts or replaces `key`. A replaced entry keeps its position.
    ///
    /// Fails with `KeyCollision` for declared wire keys and with
    /// `TypeMismatch` when `value` does not fit the table's overflow shape.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<Option<Value>> {
        let key = key.into();
        self.check_key(&key)?;
        let value: Value = value.into();
        let site = Site::overflow(&self.table, &key);
        let value = conform(
            &value,
            self.table.overflow_shape(),
            &site,
            &mut vec![key.clone()],
            &CodecOptions::default(),
        )?;
        Ok(self.entries.insert(key, value))
    }

    /// Removes `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        self.check_key(key)?;
        Ok(self.entries.shift_remove(key))
    }

    /// Keys in insertion order. Call again, or clone the iterator, to restart.
    pub fn keys(&self) -> OverflowKeys<'_> {
        OverflowKeys {
            inner: self.entries.keys(),
        }
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Insert an entry the decoder has already checked.
    pub(crate) fn insert_checked(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    /// Declared wire keys and the reserved container name are refused.
    pub(crate) fn check_key(&self, key: &str) -> Result<()> {
        if self.table.is_declared(key) || key == OVERFLOW_CONTAINER {
            return Err(RecordError::KeyCollision {
                record: self.table.name().to_string(),
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

/// Entries compare in order; the bound table is not compared.
impl PartialEq for ExtensionFields {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| a == b)
    }
}

impl fmt::Debug for ExtensionFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a ExtensionFields {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Lazy sequence of overflow keys.
#[derive(Clone)]
pub struct OverflowKeys<'a> {
    inner: indexmap::map::Keys<'a, String, Value>,
}

impl<'a> Iterator for OverflowKeys<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(String::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for OverflowKeys<'_> {}

impl FusedIterator for OverflowKeys<'_> {}

impl fmt::Debug for OverflowKeys<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::TypeShape;

    fn table() -> Arc<FieldTable> {
        FieldTable::builder("Tagged")
            .field("name", "name", TypeShape::string())
            .overflow(TypeShape::string())
            .build()
            .unwrap()
    }

    #[test]
    fn declared_keys_collide() {
        let mut ext = ExtensionFields::new(&table());
        assert!(ext.insert("name", "x").unwrap_err().is_key_collision());
        assert!(ext.get("name").unwrap_err().is_key_collision());
        assert!(ext.remove("name").unwrap_err().is_key_collision());
        assert!(ext.is_empty());
    }

    #[test]
    fn container_name_is_reserved() {
        let mut ext = ExtensionFields::new(&table());
        let err = ext.insert(OVERFLOW_CONTAINER, "x").unwrap_err();
        assert!(matches!(
            err,
            RecordError::KeyCollision { ref key, .. } if key == OVERFLOW_CONTAINER
        ));
        assert!(ext.is_empty());
        assert!(ext.get(OVERFLOW_CONTAINER).unwrap_err().is_key_collision());
    }

    #[test]
    fn overflow_shape_is_enforced() {
        let mut ext = ExtensionFields::new(&table());
        ext.insert("color", "red").unwrap();
        let err = ext.insert("size", 3).unwrap_err();
        assert!(err.is_type_mismatch());
        assert_eq!(err.wire_key(), Some("size"));
    }

    #[test]
    fn replacement_keeps_position_and_removal_keeps_order() {
        let mut ext = ExtensionFields::new(&table());
        for k in ["a", "b", "c"] {
            ext.insert(k, k).unwrap();
        }
        assert_eq!(ext.insert("a", "z").unwrap(), Some(Value::from("a")));
        assert_eq!(ext.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
        ext.remove("b").unwrap();
        assert_eq!(ext.keys().collect::<Vec<_>>(), ["a", "c"]);
    }

    #[test]
    fn keys_restart_by_clone() {
        let mut ext = ExtensionFields::new(&table());
        ext.insert("x", "1").unwrap();
        ext.insert("y", "2").unwrap();
        let mut keys = ext.keys();
        let again = keys.clone();
        assert_eq!(keys.next(), Some("x"));
        assert_eq!(again.len(), 2);
        assert_eq!(again.collect::<Vec<_>>(), ["x", "y"]);
    }
}
