//! Schema declaration and record lifecycle tests.
//!
//! Covers registry collection (inheritance, override, name inference), the
//! fresh-vs-wrapped record lifecycle, default non-persistence, the aliasing
//! contract, and raw map-like access alongside typed access.

use docmap::prelude::*;
use serde_json::json;

fn person() -> SchemaDescriptor {
    SchemaDescriptor::builder("person")
        .field("name", Field::text())
        .field("age", Field::integer().default_value(0))
        .build()
}

#[test]
fn fresh_record_materializes_defaults_without_persisting() {
    let record = Schema::construct(&person(), Values::new()).unwrap();
    assert_eq!(record.get("age").unwrap(), Some(TypedValue::Int(0)));
    assert_eq!(record.get("name").unwrap(), None);
    // Nothing was written to the backing document.
    assert!(record.unwrap().is_empty());
}

#[test]
fn typed_set_persists_converted_value() {
    let record = Schema::construct(&person(), Values::new()).unwrap();
    record.set("name", "Ann").unwrap();
    let data = record.unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data.get("name"), Some(RawValue::String("Ann".into())));
}

#[test]
fn construct_applies_supplied_values_through_setters() {
    let record = Schema::construct(&person(), Values::new().with("age", 7)).unwrap();
    assert_eq!(record.unwrap().get("age"), Some(RawValue::Int(7)));
    assert_eq!(record.get("age").unwrap(), Some(TypedValue::Int(7)));
}

#[test]
fn wrap_applies_no_defaulting() {
    let data = RawDocument::from_json(json!({ "age": 5 })).unwrap();
    let record = Schema::wrap(&person(), data);
    assert_eq!(record.get("age").unwrap(), Some(TypedValue::Int(5)));
    assert_eq!(record.get("name").unwrap(), None);
    assert_eq!(record.len(), 1);
}

#[test]
fn wrapped_records_alias_their_backing_document() {
    let raw = RawDocument::new();
    let a = Schema::wrap(&person(), raw.clone());
    let b = Schema::wrap(&person(), raw.clone());

    a.set_raw("note", RawValue::String("shared".into()));
    assert_eq!(b.get_raw("note"), Some(RawValue::String("shared".into())));
    assert!(a.unwrap().ptr_eq(&raw));
}

#[test]
fn raw_access_round_trips_undeclared_keys() {
    let record = Schema::construct(&person(), Values::new()).unwrap();
    record.set_raw("extra", RawValue::Bool(true));
    assert!(record.contains_key("extra"));
    assert_eq!(record.get_raw("extra"), Some(RawValue::Bool(true)));
    assert_eq!(record.keys(), vec!["extra".to_string()]);
    assert_eq!(record.remove_raw("extra"), Some(RawValue::Bool(true)));
    assert!(record.is_empty());
}

#[test]
fn field_name_is_inferred_from_attribute() {
    let descriptor = SchemaDescriptor::builder("post")
        .field("title", Field::text())
        .build();
    assert_eq!(descriptor.field("title").unwrap().name(), Some("title"));
}

#[test]
fn explicit_field_name_wins_over_attribute() {
    let descriptor = SchemaDescriptor::builder("post")
        .field("title", Field::text().named("postTitle"))
        .build();
    assert_eq!(descriptor.field("title").unwrap().name(), Some("postTitle"));

    // The wire key is the explicit name, not the attribute.
    let record = Schema::construct(&descriptor, Values::new()).unwrap();
    record.set("title", "Foo bar").unwrap();
    assert_eq!(
        record.get_raw("postTitle"),
        Some(RawValue::String("Foo bar".into()))
    );
    assert!(!record.contains_key("title"));
}

#[test]
fn extended_descriptor_inherits_ancestor_fields() {
    let base = person();
    let employee = SchemaDescriptor::builder("employee")
        .extends(&base)
        .field("salary", Field::integer())
        .build();

    assert_eq!(employee.registry().len(), 3);
    assert!(employee.field("name").is_some());
    assert!(employee.field("age").is_some());
    assert!(employee.field("salary").is_some());
}

#[test]
fn own_declaration_overrides_inherited_field() {
    let base = person();
    let strict = SchemaDescriptor::builder("strict-person")
        .extends(&base)
        .field("age", Field::integer().default_value(18))
        .build();

    let record = Schema::construct(&strict, Values::new()).unwrap();
    assert_eq!(record.get("age").unwrap(), Some(TypedValue::Int(18)));
    assert_eq!(strict.registry().len(), 2);
}

#[test]
fn anonymous_descriptor_from_field_table() {
    let author = SchemaDescriptor::from_fields([
        ("name", Field::text()),
        ("email", Field::text()),
    ]);
    assert_eq!(author.name(), None);
    assert_eq!(author.field("name").unwrap().name(), Some("name"));

    let record = Schema::construct(&author, Values::new().with("name", "John Doe")).unwrap();
    assert_eq!(
        record.get("name").unwrap(),
        Some(TypedValue::Text("John Doe".into()))
    );
}

#[test]
fn construct_leaves_unrecognized_values_unconsumed() {
    let values = Values::new().with("name", "Ann").with("id", "person-1");
    let (record, rest) = Schema::construct_partial(&person(), values).unwrap();
    assert_eq!(record.get("name").unwrap(), Some(TypedValue::Text("Ann".into())));
    assert_eq!(rest.len(), 1);
    assert!(rest.contains("id"));
}

#[test]
fn nested_record_field_aliases_the_nested_document() {
    let author = SchemaDescriptor::from_fields([("name", Field::text())]);
    let post = SchemaDescriptor::builder("post")
        .field("title", Field::text())
        .field("author", Field::record(author))
        .build();

    let data = RawDocument::from_json(json!({
        "title": "Foo bar",
        "author": { "name": "John Doe" }
    }))
    .unwrap();
    let record = Schema::wrap(&post, data.clone());

    let nested = record.get("author").unwrap().unwrap();
    let nested = nested.as_record().unwrap();
    assert_eq!(
        nested.get("name").unwrap(),
        Some(TypedValue::Text("John Doe".into()))
    );

    // Writes through the nested record land in the outer document.
    nested.set("name", "Jane").unwrap();
    let outer_author = data.get("author").unwrap();
    assert_eq!(
        outer_author.as_document().unwrap().get("name"),
        Some(RawValue::String("Jane".into()))
    );
}

#[test]
fn nested_record_set_accepts_field_bundle() {
    let author = SchemaDescriptor::from_fields([("name", Field::text())]);
    let post = SchemaDescriptor::builder("post")
        .field("author", Field::record(author))
        .build();

    let record = Schema::construct(&post, Values::new()).unwrap();
    record
        .set("author", Values::new().with("name", "John Doe"))
        .unwrap();
    let stored = record.get_raw("author").unwrap();
    assert_eq!(
        stored.as_document().unwrap().get("name"),
        Some(RawValue::String("John Doe".into()))
    );
}

#[test]
fn malformed_field_fails_only_on_typed_access() {
    let data = RawDocument::from_json(json!({ "age": "not-a-number", "name": "Ann" })).unwrap();
    let record = Schema::wrap(&person(), data);

    // The record is freely usable as long as the bad field is never read.
    assert_eq!(record.get("name").unwrap(), Some(TypedValue::Text("Ann".into())));
    assert_eq!(record.len(), 2);

    let err = record.get("age").unwrap_err();
    assert!(matches!(err, MappingError::MalformedLiteral("integer", _)));
}

#[test]
fn unknown_attribute_access_is_an_error() {
    let record = Schema::construct(&person(), Values::new()).unwrap();
    assert!(matches!(
        record.get("nope").unwrap_err(),
        MappingError::UnknownField(_)
    ));
    assert!(matches!(
        record.set("nope", 1).unwrap_err(),
        MappingError::UnknownField(_)
    ));
}

#[test]
fn set_null_stores_raw_null() {
    let record = Schema::construct(&person(), Values::new()).unwrap();
    record.set_null("name").unwrap();
    assert_eq!(record.get_raw("name"), Some(RawValue::Null));
    assert_eq!(record.get("name").unwrap(), None);
}
