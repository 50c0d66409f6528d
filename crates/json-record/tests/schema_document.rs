mod common;

use json_record::{
    CodecOptions, Decoder, Encoder, Record, RecordError, SchemaRegistry, TypeShape, Value,
};

use common::CANONICAL;

const ADDRESS_SCHEMA: &str = r#"{
  "records": [
    {"name": "NestedObject", "fields": [{"name": "test", "shape": "string"}]},
    {"name": "Address", "fields": [
      {"name": "streetName", "key": "street_name", "shape": "string"},
      {"name": "houseNumber", "key": "house_number", "shape": "float"},
      {"name": "marriage", "shape": "boolean", "optional": true},
      {"name": "members", "shape": "any", "optional": true},
      {"name": "arrayType", "key": "array_type", "shape": {"array": "any"}},
      {"name": "nestedObject", "shape": {"record": "NestedObject"}, "optional": true}
    ]}
  ]
}"#;

#[test]
fn compiled_address_matches_handwritten_table() {
    let registry = SchemaRegistry::from_json_str(ADDRESS_SCHEMA).unwrap();
    let table = registry.get("Address").unwrap();
    let expected = common::address_table();

    assert_eq!(table.len(), expected.len());
    for (a, b) in table.iter().zip(expected.iter()) {
        assert_eq!(a.identifier, b.identifier);
        assert_eq!(a.wire_key, b.wire_key);
        assert_eq!(a.inclusion, b.inclusion);
        assert_eq!(a.shape.to_string(), b.shape.to_string());
    }

    let record = Record::from_json_str(CANONICAL, table).unwrap();
    assert_eq!(record.to_json_string().unwrap(), CANONICAL);
}

#[test]
fn typed_overflow_rejects_other_kinds() {
    let registry = SchemaRegistry::from_json_str(
        r#"{"records":[{"name":"Labels","fields":[{"name":"id","shape":"integer"}],
            "additionalProperties":"string"}]}"#,
    )
    .unwrap();
    let table = registry.get("Labels").unwrap();
    assert_eq!(table.overflow_shape().to_string(), TypeShape::string().to_string());

    let record = Record::from_json_str(r#"{"id":1,"en":"one","de":"eins"}"#, table).unwrap();
    assert_eq!(record.overflow_keys().collect::<Vec<_>>(), ["en", "de"]);

    let err = Record::from_json_str(r#"{"id":1,"n":1}"#, table).unwrap_err();
    assert!(matches!(err, RecordError::TypeMismatch { ref path, .. } if path == "/n"));
}

#[test]
fn strict_codec_drops_undeclared_keys() {
    let registry = SchemaRegistry::from_json_str(ADDRESS_SCHEMA).unwrap();
    let table = registry.get("Address").unwrap();
    let input = CANONICAL.replacen('{', r#"{"extra":[1,2],"#, 1);

    let record = Decoder::with_options(CodecOptions::strict())
        .decode_str(&input, table)
        .unwrap();
    assert_eq!(record.overflow_len(), 0);
    assert_eq!(record.to_json_string().unwrap(), CANONICAL);

    let lenient = Decoder::new().decode_str(&input, table).unwrap();
    assert_eq!(
        lenient.get_overflow("extra").unwrap(),
        Some(&Value::Array(vec![Value::Integer(1), Value::Integer(2)]))
    );
    assert_eq!(
        Encoder::with_options(CodecOptions::strict())
            .encode_to_string(&lenient)
            .unwrap(),
        CANONICAL
    );
}

#[test]
fn malformed_document_is_a_json_error() {
    let err = SchemaRegistry::from_json_str(r#"{"records":[{"name":"A","fields":[{"name":"x","shape":"decimal"}]}]}"#)
        .unwrap_err();
    assert!(matches!(err, RecordError::Json(_)));
}
