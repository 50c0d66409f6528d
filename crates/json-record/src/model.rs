//! Typed models over record tables.
//!
//! Generated model types implement [`Model`] to move between their Rust
//! fields and a [`Record`]; the provided methods reach the wire through it.

use std::sync::Arc;

use crate::error::Result;
use crate::record::Record;
use crate::table::FieldTable;
use crate::value::Value;

pub trait Model: Sized {
    /// The shared table every instance encodes against.
    fn table() -> Arc<FieldTable>;

    fn to_record(&self) -> Result<Record>;

    fn from_record(record: &Record) -> Result<Self>;

    fn encode(&self) -> Result<Value> {
        Ok(self.to_record()?.encode())
    }

    fn decode(input: &Value) -> Result<Self> {
        Self::from_record(&Record::decode(input, &Self::table())?)
    }

    fn to_json_string(&self) -> Result<String> {
        self.to_record()?.to_json_string()
    }

    fn from_json_str(json: &str) -> Result<Self> {
        Self::from_record(&Record::from_json_str(json, &Self::table())?)
    }
}
