//! Schema-driven record models over a flat JSON wire format.
//!
//! A [`FieldTable`] describes one record: declared fields with wire keys,
//! shapes and inclusion policies. [`Decoder`] turns a JSON object into a
//! [`Record`], routing every key the table does not declare into the record's
//! overflow map; [`Encoder`] writes the declared fields back in table order
//! followed by the overflow entries at the same level.
//!
//! ```
//! use json_record::{FieldTable, Record, TypeShape};
//!
//! let table = FieldTable::builder("Point")
//!     .field("x", "x", TypeShape::integer())
//!     .build()
//!     .unwrap();
//! let record = Record::from_json_str(r#"{"x":1,"label":"a"}"#, &table).unwrap();
//! assert_eq!(record.get_i64("x").unwrap(), Some(1));
//! assert_eq!(record.overflow_keys().collect::<Vec<_>>(), ["label"]);
//! assert_eq!(record.to_json_string().unwrap(), r#"{"x":1,"label":"a"}"#);
//! ```

pub mod cli;
pub mod decoder;
pub mod document;
pub mod encoder;
pub mod error;
pub mod extension;
pub mod model;
pub mod options;
pub mod record;
pub mod shape;
pub mod table;
pub mod text;
pub mod value;

pub use decoder::Decoder;
pub use document::{SchemaDocument, SchemaRegistry, ShapeDoc};
pub use encoder::Encoder;
pub use error::{RecordError, Result};
pub use extension::{ExtensionFields, OverflowKeys};
pub use model::Model;
pub use options::CodecOptions;
pub use record::Record;
pub use shape::{PrimitiveKind, TypeShape};
pub use table::{FieldDescriptor, FieldTable, FieldTableBuilder, Inclusion};
pub use value::{Object, Value, ValueKind};

/// Name the overflow map goes by in schema documents. It is reserved: tables,
/// overflow maps and decoded input cannot use it as a key, so it never
/// appears in encoded output.
pub const OVERFLOW_CONTAINER: &str = "additionalProperties";
