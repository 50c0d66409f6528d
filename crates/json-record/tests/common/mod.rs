//! Address model as a schema compiler would emit it.

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use json_record::{FieldTable, Model, Object, Record, Result, TypeShape, Value};

pub const CANONICAL: &str = r#"{"street_name":"Test address 2","house_number":2.0,"marriage":true,"members":2,"array_type":[2,"test"],"nestedObject":{"test":"test"}}"#;

pub fn nested_object_table() -> Arc<FieldTable> {
    static TABLE: OnceLock<Arc<FieldTable>> = OnceLock::new();
    TABLE
        .get_or_init(|| {
            FieldTable::builder("NestedObject")
                .field("test", "test", TypeShape::string())
                .build()
                .expect("NestedObject table")
        })
        .clone()
}

pub fn address_table() -> Arc<FieldTable> {
    static TABLE: OnceLock<Arc<FieldTable>> = OnceLock::new();
    TABLE
        .get_or_init(|| {
            FieldTable::builder("Address")
                .field("streetName", "street_name", TypeShape::string())
                .field("houseNumber", "house_number", TypeShape::float())
                .optional("marriage", "marriage", TypeShape::bool())
                .optional("members", "members", TypeShape::any())
                .field("arrayType", "array_type", TypeShape::array_of(TypeShape::any()))
                .optional(
                    "nestedObject",
                    "nestedObject",
                    TypeShape::record(&nested_object_table()),
                )
                .build()
                .expect("Address table")
        })
        .clone()
}

#[derive(Debug, Clone, PartialEq)]
pub struct NestedObject {
    pub test: String,
}

impl Model for NestedObject {
    fn table() -> Arc<FieldTable> {
        nested_object_table()
    }

    fn to_record(&self) -> Result<Record> {
        let mut record = Record::new(&Self::table());
        record.set("test", self.test.as_str())?;
        Ok(record)
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            test: record.get_str("test")?.unwrap_or_default().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub street_name: String,
    pub house_number: f64,
    pub marriage: Option<bool>,
    pub members: Option<Value>,
    pub array_type: Vec<Value>,
    pub nested_object: Option<NestedObject>,
    pub additional_properties: Object,
}

impl Model for Address {
    fn table() -> Arc<FieldTable> {
        address_table()
    }

    fn to_record(&self) -> Result<Record> {
        let mut record = Record::new(&Self::table());
        record.set("streetName", self.street_name.as_str())?;
        record.set("houseNumber", self.house_number)?;
        record.set("marriage", self.marriage)?;
        record.set("members", self.members.clone())?;
        record.set("arrayType", self.array_type.clone())?;
        if let Some(nested) = &self.nested_object {
            record.set_record("nestedObject", &nested.to_record()?)?;
        }
        for (key, value) in &self.additional_properties {
            record.set_overflow(key.as_str(), value.clone())?;
        }
        Ok(record)
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            street_name: record.get_str("streetName")?.unwrap_or_default().to_string(),
            house_number: record.get_f64("houseNumber")?.unwrap_or_default(),
            marriage: record.get_bool("marriage")?,
            members: record.get("members")?.filter(|v| !v.is_null()).cloned(),
            array_type: record.get_array("arrayType")?.unwrap_or_default().to_vec(),
            nested_object: record
                .get_record("nestedObject")?
                .map(|r| NestedObject::from_record(&r))
                .transpose()?,
            additional_properties: record
                .overflow()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }
}

pub fn sample_address() -> Address {
    Address {
        street_name: "Test address 2".to_string(),
        house_number: 2.0,
        marriage: Some(true),
        members: Some(Value::Integer(2)),
        array_type: vec![Value::Integer(2), Value::from("test")],
        nested_object: Some(NestedObject {
            test: "test".to_string(),
        }),
        additional_properties: Object::new(),
    }
}
