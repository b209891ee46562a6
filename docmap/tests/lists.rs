//! Typed sequence view tests.
//!
//! Covers per-access reconversion, element assignment of the actually
//! supplied value, keyword-bundle appends of nested-record elements, and the
//! delegation of comparisons and the string form to the raw sequence.

use docmap::prelude::*;

fn comment_schema() -> SchemaDescriptor {
    SchemaDescriptor::from_fields([
        ("author", Field::text()),
        ("content", Field::text()),
    ])
}

fn int_proxy(values: &[i64]) -> (RawSequence, ListProxy) {
    let seq: RawSequence = values.iter().map(|v| RawValue::Int(*v)).collect();
    let proxy = ListProxy::new(seq.clone(), Field::integer());
    (seq, proxy)
}

#[test]
fn get_converts_on_every_access() {
    let (seq, proxy) = int_proxy(&[1, 2]);
    assert_eq!(proxy.get(0).unwrap(), Some(TypedValue::Int(1)));

    // Mutate the raw sequence underneath; the proxy sees it immediately.
    seq.set(0, RawValue::Int(9));
    assert_eq!(proxy.get(0).unwrap(), Some(TypedValue::Int(9)));
    assert_eq!(proxy.get(5).unwrap(), None);
}

#[test]
fn set_converts_the_supplied_value() {
    let (seq, proxy) = int_proxy(&[1, 2]);
    proxy.set(0, TypedValue::Float(3.9)).unwrap();
    assert_eq!(seq.get(0), Some(RawValue::Int(3)));

    proxy.set(1, 7).unwrap();
    assert_eq!(seq.get(1), Some(RawValue::Int(7)));
}

#[test]
fn set_out_of_bounds_is_an_error() {
    let (_, proxy) = int_proxy(&[1]);
    assert!(matches!(
        proxy.set(3, 0).unwrap_err(),
        MappingError::OutOfBounds { index: 3, len: 1 }
    ));
}

#[test]
fn push_appends_converted_elements() {
    let (seq, proxy) = int_proxy(&[]);
    proxy.push(1).unwrap();
    proxy.push(TypedValue::Text("2".into())).unwrap();
    assert_eq!(proxy.len(), 2);
    assert_eq!(seq.items(), vec![RawValue::Int(1), RawValue::Int(2)]);
}

#[test]
fn push_fields_appends_a_nested_record_element() {
    let seq = RawSequence::new();
    let proxy = ListProxy::new(seq.clone(), Field::record(comment_schema()));

    proxy
        .push_fields(Values::new().with("author", "myself").with("content", "Bla bla"))
        .unwrap();
    assert_eq!(seq.len(), 1);

    // The appended element's shape equals the nested schema's unwrap of an
    // equivalent freshly constructed record.
    let expected = Schema::construct(
        &comment_schema(),
        Values::new().with("author", "myself").with("content", "Bla bla"),
    )
    .unwrap();
    assert_eq!(
        seq.get(0).unwrap(),
        RawValue::Document(expected.unwrap())
    );
}

#[test]
fn iteration_is_ordered_and_restartable() {
    let (_, proxy) = int_proxy(&[1, 2, 3]);
    let first: Vec<i64> = proxy
        .iter()
        .map(|item| item.unwrap().as_int().unwrap())
        .collect();
    assert_eq!(first, vec![1, 2, 3]);

    // A second pass starts over from the live sequence.
    proxy.push(4).unwrap();
    let second: Vec<i64> = proxy
        .iter()
        .map(|item| item.unwrap().as_int().unwrap())
        .collect();
    assert_eq!(second, vec![1, 2, 3, 4]);
}

#[test]
fn extend_appends_each_element() {
    let (seq, proxy) = int_proxy(&[]);
    proxy.extend([1, 2, 3]).unwrap();
    assert_eq!(seq.len(), 3);
}

#[test]
fn remove_shifts_later_elements() {
    let (seq, proxy) = int_proxy(&[1, 2, 3]);
    assert_eq!(proxy.remove(1), Some(RawValue::Int(2)));
    assert_eq!(seq.items(), vec![RawValue::Int(1), RawValue::Int(3)]);
    assert_eq!(proxy.remove(9), None);
}

#[test]
fn comparisons_delegate_to_the_raw_sequence() {
    let (seq_a, a) = int_proxy(&[1, 2]);
    let (_, b) = int_proxy(&[1, 2]);
    let (_, c) = int_proxy(&[1, 3]);

    assert_eq!(a, b);
    assert!(a == seq_a);
    assert!(a < c);
    assert_eq!(a.to_string(), "[1,2]");
}

#[test]
fn list_field_on_a_schema_wraps_without_copy() {
    let post = SchemaDescriptor::builder("post")
        .field("title", Field::text())
        .field("comments", Field::list(Field::record(comment_schema())))
        .build();

    let record = Schema::construct(&post, Values::new().with("title", "Foo bar")).unwrap();
    record
        .set(
            "comments",
            vec![Values::new().with("author", "myself").with("content", "Bla bla")],
        )
        .unwrap();

    let comments = record.get("comments").unwrap().unwrap();
    let comments = comments.as_sequence().unwrap();
    assert_eq!(comments.len(), 1);

    // The proxy aliases the stored sequence: appends land in the record.
    comments
        .push_fields(Values::new().with("author", "you").with("content", "More"))
        .unwrap();
    let stored = record.get_raw("comments").unwrap();
    assert_eq!(stored.as_sequence().unwrap().len(), 2);

    let first = comments.get(0).unwrap().unwrap();
    assert_eq!(
        first.as_record().unwrap().get("author").unwrap(),
        Some(TypedValue::Text("myself".into()))
    );
}

#[test]
fn unset_list_field_defaults_to_a_fresh_empty_view() {
    let post = SchemaDescriptor::builder("post")
        .field("comments", Field::list(Field::integer()))
        .build();
    let record = Schema::construct(&post, Values::new()).unwrap();

    let first = record.get("comments").unwrap().unwrap();
    let first = first.as_sequence().unwrap();
    assert!(first.is_empty());
    first.push(1).unwrap();

    // The default is produced fresh per read and is not attached to the
    // record; the backing document stays empty until the field is set.
    let second = record.get("comments").unwrap().unwrap();
    assert!(second.as_sequence().unwrap().is_empty());
    assert!(record.unwrap().is_empty());
}
