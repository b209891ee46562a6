//! Scalar field conversion tests.
//!
//! Covers the wire encodings of every scalar field kind: round-trips through
//! `to_raw`/`to_typed`, the documented truncation of sub-second precision,
//! defaulting behavior, and malformed-literal failures.

use chrono::{NaiveDate, NaiveTime};
use docmap::prelude::*;

fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> chrono::DateTime<chrono::Utc> {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
        .and_utc()
}

#[test]
fn text_round_trip() {
    let field = Field::text().named("title");
    let raw = field.to_raw(TypedValue::Text("Foo bar".into())).unwrap();
    assert_eq!(raw, RawValue::String("Foo bar".into()));
    assert_eq!(
        field.to_typed(&raw).unwrap(),
        TypedValue::Text("Foo bar".into())
    );
}

#[test]
fn text_stringifies_scalars() {
    let field = Field::text().named("t");
    assert_eq!(
        field.to_typed(&RawValue::Int(42)).unwrap(),
        TypedValue::Text("42".into())
    );
    assert_eq!(
        field.to_typed(&RawValue::Bool(true)).unwrap(),
        TypedValue::Text("true".into())
    );
    assert!(field.to_typed(&RawValue::Sequence(RawSequence::new())).is_err());
}

#[test]
fn integer_round_trip_and_coercions() {
    let field = Field::integer().named("age");
    assert_eq!(field.to_raw(TypedValue::Int(42)).unwrap(), RawValue::Int(42));
    assert_eq!(
        field.to_typed(&RawValue::Int(42)).unwrap(),
        TypedValue::Int(42)
    );
    // Floats truncate toward zero, numeric strings parse.
    assert_eq!(
        field.to_typed(&RawValue::Float(4.9)).unwrap(),
        TypedValue::Int(4)
    );
    assert_eq!(
        field.to_typed(&RawValue::String("42".into())).unwrap(),
        TypedValue::Int(42)
    );
}

#[test]
fn integer_rejects_malformed_literal() {
    let field = Field::integer().named("age");
    let err = field
        .to_typed(&RawValue::String("forty-two".into()))
        .unwrap_err();
    match err {
        MappingError::MalformedLiteral(kind, literal) => {
            assert_eq!(kind, "integer");
            assert!(literal.contains("forty-two"));
        }
        other => panic!("expected malformed literal, got {other:?}"),
    }
}

#[test]
fn float_round_trip() {
    let field = Field::float().named("score");
    assert_eq!(
        field.to_raw(TypedValue::Float(1.5)).unwrap(),
        RawValue::Float(1.5)
    );
    assert_eq!(
        field.to_typed(&RawValue::Float(1.5)).unwrap(),
        TypedValue::Float(1.5)
    );
    assert_eq!(
        field.to_typed(&RawValue::Int(3)).unwrap(),
        TypedValue::Float(3.0)
    );
}

#[test]
fn boolean_round_trip() {
    let field = Field::boolean().named("flag");
    assert_eq!(
        field.to_raw(TypedValue::Bool(true)).unwrap(),
        RawValue::Bool(true)
    );
    assert_eq!(
        field.to_typed(&RawValue::Bool(false)).unwrap(),
        TypedValue::Bool(false)
    );
    assert!(field.to_typed(&RawValue::String("true".into())).is_err());
}

#[test]
fn decimal_preserves_scale() {
    let field = Field::decimal().named("amount");
    let value: Decimal = "1.10".parse().unwrap();
    let raw = field.to_raw(TypedValue::Decimal(value)).unwrap();
    assert_eq!(raw, RawValue::String("1.10".into()));
    let back = field.to_typed(&raw).unwrap();
    assert_eq!(back.as_decimal().unwrap().to_string(), "1.10");
}

#[test]
fn decimal_widens_integers_and_rejects_junk() {
    let field = Field::decimal().named("amount");
    assert_eq!(
        field.to_typed(&RawValue::Int(5)).unwrap(),
        TypedValue::Decimal("5".parse().unwrap())
    );
    assert!(field.to_typed(&RawValue::String("1.2.3".into())).is_err());
}

#[test]
fn date_round_trip() {
    let field = Field::date().named("day");
    let day = NaiveDate::from_ymd_opt(2007, 4, 1).unwrap();
    let raw = field.to_raw(TypedValue::Date(day)).unwrap();
    assert_eq!(raw, RawValue::String("2007-04-01".into()));
    assert_eq!(field.to_typed(&raw).unwrap(), TypedValue::Date(day));
}

#[test]
fn date_takes_date_part_of_datetime() {
    let field = Field::date().named("day");
    let raw = field
        .to_raw(TypedValue::DateTime(dt(2007, 4, 1, 15, 30, 0)))
        .unwrap();
    assert_eq!(raw, RawValue::String("2007-04-01".into()));
}

#[test]
fn datetime_round_trip_at_second_resolution() {
    let field = Field::datetime().named("added");
    let stamp = dt(2007, 4, 1, 15, 30, 0);
    let raw = field.to_raw(TypedValue::DateTime(stamp)).unwrap();
    assert_eq!(raw, RawValue::String("2007-04-01T15:30:00Z".into()));
    assert_eq!(field.to_typed(&raw).unwrap(), TypedValue::DateTime(stamp));
}

#[test]
fn datetime_truncates_subseconds() {
    let field = Field::datetime().named("added");
    let with_micros = NaiveDate::from_ymd_opt(2007, 4, 1)
        .unwrap()
        .and_hms_micro_opt(15, 30, 0, 987_600)
        .unwrap()
        .and_utc();
    // Truncated, not rounded: .9876 drops entirely.
    assert_eq!(
        field.to_raw(TypedValue::DateTime(with_micros)).unwrap(),
        RawValue::String("2007-04-01T15:30:00Z".into())
    );
    // A fractional part in the stored literal is stripped on parse.
    assert_eq!(
        field
            .to_typed(&RawValue::String("2007-04-01T15:30:00.123456Z".into()))
            .unwrap(),
        TypedValue::DateTime(dt(2007, 4, 1, 15, 30, 0))
    );
}

#[test]
fn datetime_serializes_bare_date_as_midnight_utc() {
    let field = Field::datetime().named("added");
    let raw = field
        .to_raw(TypedValue::Date(NaiveDate::from_ymd_opt(2007, 4, 1).unwrap()))
        .unwrap();
    assert_eq!(raw, RawValue::String("2007-04-01T00:00:00Z".into()));
}

#[test]
fn datetime_normalizes_epoch_seconds() {
    let field = Field::datetime().named("added");
    let raw = field.to_raw(TypedValue::Int(1_175_441_400)).unwrap();
    assert_eq!(raw, RawValue::String("2007-04-01T15:30:00Z".into()));
}

#[test]
fn time_round_trip_and_truncation() {
    let field = Field::time().named("at");
    let t = NaiveTime::from_hms_opt(15, 30, 0).unwrap();
    let raw = field.to_raw(TypedValue::Time(t)).unwrap();
    assert_eq!(raw, RawValue::String("15:30:00".into()));
    assert_eq!(field.to_typed(&raw).unwrap(), TypedValue::Time(t));

    let with_micros = NaiveTime::from_hms_micro_opt(15, 30, 0, 123_456).unwrap();
    assert_eq!(
        field.to_raw(TypedValue::Time(with_micros)).unwrap(),
        RawValue::String("15:30:00".into())
    );
    assert_eq!(
        field
            .to_typed(&RawValue::String("15:30:00.123456".into()))
            .unwrap(),
        TypedValue::Time(t)
    );
}

#[test]
fn time_takes_time_part_of_datetime() {
    let field = Field::time().named("at");
    assert_eq!(
        field
            .to_raw(TypedValue::DateTime(dt(2007, 4, 1, 15, 30, 0)))
            .unwrap(),
        RawValue::String("15:30:00".into())
    );
}

#[test]
fn unset_field_returns_configured_default() {
    let data = RawDocument::new();
    let field = Field::integer().named("age").default_value(0);
    assert_eq!(field.get(&data).unwrap(), Some(TypedValue::Int(0)));
    // Reading the default never writes it back.
    assert!(data.is_empty());
}

#[test]
fn unset_field_without_default_is_absent() {
    let data = RawDocument::new();
    let field = Field::text().named("name");
    assert_eq!(field.get(&data).unwrap(), None);
}

#[test]
fn null_assignment_bypasses_conversion() {
    let data = RawDocument::new();
    let field = Field::integer().named("age");
    field.set(&data, None).unwrap();
    assert_eq!(data.get("age"), Some(RawValue::Null));
    // A stored null reads back as absent (no default configured).
    assert_eq!(field.get(&data).unwrap(), None);
}

#[test]
fn stored_null_falls_back_to_default() {
    let data = RawDocument::new();
    let field = Field::integer().named("age").default_value(7);
    field.set(&data, None).unwrap();
    assert_eq!(field.get(&data).unwrap(), Some(TypedValue::Int(7)));
}

#[test]
fn default_producer_runs_fresh_on_every_read() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    let ticks = Arc::new(AtomicI64::new(0));
    let clock = ticks.clone();
    let field = Field::integer()
        .named("seq")
        .default_with(move || TypedValue::Int(clock.fetch_add(1, Ordering::SeqCst)));

    let data = RawDocument::new();
    assert_eq!(field.get(&data).unwrap(), Some(TypedValue::Int(0)));
    assert_eq!(field.get(&data).unwrap(), Some(TypedValue::Int(1)));
    assert_eq!(ticks.load(Ordering::SeqCst), 2);
}
