//! Field declarations and per-field bidirectional conversion.
//!
//! A [`Field`] is the basic unit of a schema: it binds one attribute to a
//! wire encoding, converts between the raw value stored under its name and a
//! typed value on every access, and computes defaults for reads of unset
//! attributes. Fields are declared on a schema descriptor and collected into
//! its field registry; see [`crate::schema`].
//!
//! # Example
//!
//! ```ignore
//! use docmap::field::Field;
//! use docmap::schema::SchemaDescriptor;
//!
//! let person = SchemaDescriptor::builder("person")
//!     .field("name", Field::text())
//!     .field("age", Field::integer().default_value(0))
//!     .build();
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;

use crate::decimal::Decimal;
use crate::error::{MappingError, MappingResult};
use crate::list::ListProxy;
use crate::raw::{RawDocument, RawSequence, RawValue};
use crate::schema::{Schema, SchemaDescriptor};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const TIME_FORMAT: &str = "%H:%M:%S";

/// A value on the typed side of a field conversion.
///
/// The scalar variants correspond one-to-one to the scalar field kinds. The
/// `Record` and `Sequence` variants are live views over raw containers, while
/// `Items` and `Fields` are input-side bundles: plain values accepted by
/// setters for sequence and nested-record fields without pre-constructing the
/// typed view.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    /// A string.
    Text(String),
    /// An integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// A decimal number.
    Decimal(Decimal),
    /// A calendar date.
    Date(NaiveDate),
    /// A date-time in UTC.
    DateTime(DateTime<Utc>),
    /// A time of day.
    Time(NaiveTime),
    /// A nested record aliased onto its backing raw document.
    Record(Schema),
    /// A live, converting view over a raw sequence.
    Sequence(ListProxy),
    /// A plain sequence of values, accepted by sequence-field setters.
    Items(Vec<TypedValue>),
    /// A bundle of named values, accepted by nested-record setters.
    Fields(Values),
}

impl TypedValue {
    /// A short name for the value's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypedValue::Text(_) => "text",
            TypedValue::Int(_) => "integer",
            TypedValue::Float(_) => "float",
            TypedValue::Bool(_) => "boolean",
            TypedValue::Decimal(_) => "decimal",
            TypedValue::Date(_) => "date",
            TypedValue::DateTime(_) => "date-time",
            TypedValue::Time(_) => "time",
            TypedValue::Record(_) => "record",
            TypedValue::Sequence(_) => "sequence",
            TypedValue::Items(_) => "items",
            TypedValue::Fields(_) => "field bundle",
        }
    }

    /// Returns the string slice if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float if this is a float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            TypedValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the decimal if this is a decimal value.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            TypedValue::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the date if this is a date value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            TypedValue::Date(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the date-time if this is a date-time value.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            TypedValue::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the time if this is a time value.
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            TypedValue::Time(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the nested record if this is a record value.
    pub fn as_record(&self) -> Option<&Schema> {
        match self {
            TypedValue::Record(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the sequence view if this is a sequence value.
    pub fn as_sequence(&self) -> Option<&ListProxy> {
        match self {
            TypedValue::Sequence(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> TypedValue {
        TypedValue::Text(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> TypedValue {
        TypedValue::Text(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> TypedValue {
        TypedValue::Int(value)
    }
}

impl From<i32> for TypedValue {
    fn from(value: i32) -> TypedValue {
        TypedValue::Int(value as i64)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> TypedValue {
        TypedValue::Float(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> TypedValue {
        TypedValue::Bool(value)
    }
}

impl From<Decimal> for TypedValue {
    fn from(value: Decimal) -> TypedValue {
        TypedValue::Decimal(value)
    }
}

impl From<NaiveDate> for TypedValue {
    fn from(value: NaiveDate) -> TypedValue {
        TypedValue::Date(value)
    }
}

impl From<DateTime<Utc>> for TypedValue {
    fn from(value: DateTime<Utc>) -> TypedValue {
        TypedValue::DateTime(value)
    }
}

impl From<NaiveTime> for TypedValue {
    fn from(value: NaiveTime) -> TypedValue {
        TypedValue::Time(value)
    }
}

impl From<Schema> for TypedValue {
    fn from(value: Schema) -> TypedValue {
        TypedValue::Record(value)
    }
}

impl From<ListProxy> for TypedValue {
    fn from(value: ListProxy) -> TypedValue {
        TypedValue::Sequence(value)
    }
}

impl From<Values> for TypedValue {
    fn from(value: Values) -> TypedValue {
        TypedValue::Fields(value)
    }
}

impl<T> From<Vec<T>> for TypedValue
where
    TypedValue: From<T>,
{
    fn from(values: Vec<T>) -> TypedValue {
        TypedValue::Items(values.into_iter().map(TypedValue::from).collect())
    }
}

/// An ordered bundle of named typed values.
///
/// This is the argument form for record construction and nested-record
/// appends: build one with the chainable [`Values::with`], hand it to
/// [`Schema::construct`](crate::schema::Schema::construct) or a setter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Values {
    entries: IndexMap<String, TypedValue>,
}

impl Values {
    /// Creates an empty bundle.
    pub fn new() -> Values {
        Values::default()
    }

    /// Adds a named value and returns the bundle (chainable).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<TypedValue>) -> Values {
        self.insert(name, value);
        self
    }

    /// Adds a named value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<TypedValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Removes and returns the value under `name`, preserving the order of
    /// the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<TypedValue> {
        self.entries.shift_remove(name)
    }

    /// Returns the value under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.entries.get(name)
    }

    /// Returns `true` if a value is present under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The number of entries in the bundle.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bundle has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, TypedValue)> for Values {
    fn from_iter<I: IntoIterator<Item = (String, TypedValue)>>(iter: I) -> Self {
        Values {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Values {
    type Item = (String, TypedValue);
    type IntoIter = indexmap::map::IntoIter<String, TypedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// The wire encoding and conversion rules of a field.
#[derive(Clone, Debug)]
pub enum FieldKind {
    /// String on the wire.
    Text,
    /// Number on the wire.
    Float,
    /// Number on the wire.
    Integer,
    /// Number on the wire.
    Long,
    /// Boolean on the wire.
    Boolean,
    /// Canonical numeral string on the wire.
    Decimal,
    /// `"YYYY-MM-DD"` string on the wire.
    Date,
    /// `"YYYY-MM-DDTHH:MM:SSZ"` string on the wire, UTC, second resolution.
    DateTime,
    /// `"HH:MM:SS"` string on the wire, second resolution.
    Time,
    /// A nested document on the wire, mapped through a nested descriptor.
    Record(SchemaDescriptor),
    /// A sequence on the wire, each element mapped through the element field.
    List(Box<Field>),
}

impl FieldKind {
    /// The kind's name as it appears in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Float => "float",
            FieldKind::Integer => "integer",
            FieldKind::Long => "long integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Decimal => "decimal",
            FieldKind::Date => "date",
            FieldKind::DateTime => "date-time",
            FieldKind::Time => "time",
            FieldKind::Record(_) => "record",
            FieldKind::List(_) => "list",
        }
    }
}

/// The default policy of a field, applied on reads of unset attributes.
#[derive(Clone)]
pub enum FieldDefault {
    /// A fixed value returned as-is.
    Value(TypedValue),
    /// A producer invoked fresh on every defaulted read, never memoized.
    Producer(Arc<dyn Fn() -> TypedValue + Send + Sync>),
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldDefault::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Basic unit for mapping one attribute between its raw wire encoding and a
/// typed value.
///
/// A field carries an optional explicit wire name (inferred from the
/// declaring attribute at registry build time when absent), a [`FieldKind`],
/// and an optional default. Instances are declared on a
/// [`SchemaDescriptor`](crate::schema::SchemaDescriptor) builder.
#[derive(Clone, Debug)]
pub struct Field {
    name: Option<String>,
    kind: FieldKind,
    default: Option<FieldDefault>,
}

impl Field {
    fn of_kind(kind: FieldKind) -> Field {
        Field {
            name: None,
            kind,
            default: None,
        }
    }

    /// A field for string values.
    pub fn text() -> Field {
        Field::of_kind(FieldKind::Text)
    }

    /// A field for float values.
    pub fn float() -> Field {
        Field::of_kind(FieldKind::Float)
    }

    /// A field for integer values.
    pub fn integer() -> Field {
        Field::of_kind(FieldKind::Integer)
    }

    /// A field for long integer values.
    pub fn long() -> Field {
        Field::of_kind(FieldKind::Long)
    }

    /// A field for boolean values.
    pub fn boolean() -> Field {
        Field::of_kind(FieldKind::Boolean)
    }

    /// A field for decimal values, encoded as canonical numeral strings.
    pub fn decimal() -> Field {
        Field::of_kind(FieldKind::Decimal)
    }

    /// A field for calendar dates.
    pub fn date() -> Field {
        Field::of_kind(FieldKind::Date)
    }

    /// A field for date-time values, stored in UTC at second resolution.
    pub fn datetime() -> Field {
        Field::of_kind(FieldKind::DateTime)
    }

    /// A field for time-of-day values, at second resolution.
    pub fn time() -> Field {
        Field::of_kind(FieldKind::Time)
    }

    /// A field holding a nested record mapped through `descriptor`.
    ///
    /// Reads of an unset attribute default to a fresh, empty record.
    pub fn record(descriptor: SchemaDescriptor) -> Field {
        let default = descriptor.clone();
        let mut field = Field::of_kind(FieldKind::Record(descriptor));
        field.default = Some(FieldDefault::Producer(Arc::new(move || {
            TypedValue::Record(Schema::wrap(&default, RawDocument::new()))
        })));
        field
    }

    /// A field holding a typed sequence whose elements are mapped through
    /// `element`.
    ///
    /// Reads of an unset attribute default to a view over a fresh, empty
    /// sequence.
    pub fn list(element: Field) -> Field {
        let default_element = element.clone();
        let mut field = Field::of_kind(FieldKind::List(Box::new(element)));
        field.default = Some(FieldDefault::Producer(Arc::new(move || {
            TypedValue::Sequence(ListProxy::new(RawSequence::new(), default_element.clone()))
        })));
        field
    }

    /// Sets the explicit wire name, overriding attribute-name inference.
    pub fn named(mut self, name: impl Into<String>) -> Field {
        self.name = Some(name.into());
        self
    }

    /// Sets a fixed default value.
    pub fn default_value(mut self, value: impl Into<TypedValue>) -> Field {
        self.default = Some(FieldDefault::Value(value.into()));
        self
    }

    /// Sets a default producer, invoked fresh on every defaulted read.
    pub fn default_with(
        mut self,
        producer: impl Fn() -> TypedValue + Send + Sync + 'static,
    ) -> Field {
        self.default = Some(FieldDefault::Producer(Arc::new(producer)));
        self
    }

    /// The field's wire name, if assigned (explicitly or by a registry build).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The field's kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// The field's default policy, if any.
    pub fn default(&self) -> Option<&FieldDefault> {
        self.default.as_ref()
    }

    /// Assigns the attribute name as the wire name unless one was set
    /// explicitly. Called once, when a registry is built.
    pub(crate) fn resolve_name(&mut self, attr: &str) {
        if self.name.is_none() {
            self.name = Some(attr.to_string());
        }
    }

    fn key(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Reads this field's attribute from a backing document.
    ///
    /// A present, non-null raw value is converted; otherwise the default is
    /// computed (producers run fresh on every call); otherwise the attribute
    /// is absent and `Ok(None)` is returned. Nothing is ever written back.
    ///
    /// # Errors
    ///
    /// [`MappingError::MalformedLiteral`] when the stored raw value cannot be
    /// parsed per this field's kind.
    pub fn get(&self, data: &RawDocument) -> MappingResult<Option<TypedValue>> {
        match data.get(self.key()) {
            Some(raw) if !raw.is_null() => self.to_typed(&raw).map(Some),
            _ => match &self.default {
                Some(FieldDefault::Value(value)) => Ok(Some(value.clone())),
                Some(FieldDefault::Producer(producer)) => Ok(Some(producer())),
                None => Ok(None),
            },
        }
    }

    /// Writes this field's attribute into a backing document.
    ///
    /// `None` stores a raw null directly, bypassing conversion; any other
    /// value is converted through [`Field::to_raw`] first.
    pub fn set(&self, data: &RawDocument, value: Option<TypedValue>) -> MappingResult<()> {
        let raw = match value {
            None => RawValue::Null,
            Some(value) => self.to_raw(value)?,
        };
        data.insert(self.key(), raw);
        Ok(())
    }

    /// Converts a raw wire value into its typed form.
    ///
    /// Conversion happens on every call; results are never cached.
    pub fn to_typed(&self, raw: &RawValue) -> MappingResult<TypedValue> {
        let malformed = || MappingError::MalformedLiteral(self.kind.name(), raw.to_string());
        match (&self.kind, raw) {
            (FieldKind::Text, RawValue::String(value)) => Ok(TypedValue::Text(value.clone())),
            (FieldKind::Text, RawValue::Bool(value)) => Ok(TypedValue::Text(value.to_string())),
            (FieldKind::Text, RawValue::Int(value)) => Ok(TypedValue::Text(value.to_string())),
            (FieldKind::Text, RawValue::Float(value)) => Ok(TypedValue::Text(value.to_string())),

            (FieldKind::Integer | FieldKind::Long, RawValue::Int(value)) => {
                Ok(TypedValue::Int(*value))
            }
            (FieldKind::Integer | FieldKind::Long, RawValue::Float(value)) => {
                float_to_int(*value).map(TypedValue::Int).ok_or_else(malformed)
            }
            (FieldKind::Integer | FieldKind::Long, RawValue::String(value)) => value
                .parse::<i64>()
                .map(TypedValue::Int)
                .map_err(|_| malformed()),

            (FieldKind::Float, RawValue::Float(value)) => Ok(TypedValue::Float(*value)),
            (FieldKind::Float, RawValue::Int(value)) => Ok(TypedValue::Float(*value as f64)),
            (FieldKind::Float, RawValue::String(value)) => value
                .parse::<f64>()
                .map(TypedValue::Float)
                .map_err(|_| malformed()),

            (FieldKind::Boolean, RawValue::Bool(value)) => Ok(TypedValue::Bool(*value)),

            (FieldKind::Decimal, RawValue::String(value)) => value
                .parse::<Decimal>()
                .map(TypedValue::Decimal)
                .map_err(|_| malformed()),
            (FieldKind::Decimal, RawValue::Int(value)) => {
                Ok(TypedValue::Decimal(Decimal::from(*value)))
            }

            (FieldKind::Date, RawValue::String(value)) => {
                NaiveDate::parse_from_str(value, DATE_FORMAT)
                    .map(TypedValue::Date)
                    .map_err(|_| malformed())
            }

            (FieldKind::DateTime, RawValue::String(value)) => {
                // Sub-second precision is not part of the encoding; a
                // fractional part and the timezone marker are stripped
                // before parsing.
                let trimmed = value
                    .split_once('.')
                    .map(|(whole, _)| whole)
                    .unwrap_or(value)
                    .trim_end_matches('Z');
                NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT)
                    .map(|parsed| TypedValue::DateTime(parsed.and_utc()))
                    .map_err(|_| malformed())
            }

            (FieldKind::Time, RawValue::String(value)) => {
                let trimmed = value
                    .split_once('.')
                    .map(|(whole, _)| whole)
                    .unwrap_or(value);
                NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
                    .map(TypedValue::Time)
                    .map_err(|_| malformed())
            }

            (FieldKind::Record(descriptor), RawValue::Document(doc)) => {
                Ok(TypedValue::Record(Schema::wrap(descriptor, doc.clone())))
            }

            (FieldKind::List(element), RawValue::Sequence(seq)) => Ok(TypedValue::Sequence(
                ListProxy::new(seq.clone(), (**element).clone()),
            )),

            _ => Err(malformed()),
        }
    }

    /// Converts a typed value into its raw wire form.
    ///
    /// # Errors
    ///
    /// [`MappingError::UnexpectedValue`] when this field's kind cannot encode
    /// the supplied value; [`MappingError::MalformedLiteral`] when a textual
    /// argument fails to parse.
    pub fn to_raw(&self, value: TypedValue) -> MappingResult<RawValue> {
        let unexpected = |value: &TypedValue| {
            MappingError::UnexpectedValue(self.kind.name(), value.kind_name().to_string())
        };
        match (&self.kind, value) {
            (FieldKind::Text, TypedValue::Text(value)) => Ok(RawValue::String(value)),
            (FieldKind::Text, TypedValue::Int(value)) => Ok(RawValue::String(value.to_string())),
            (FieldKind::Text, TypedValue::Float(value)) => Ok(RawValue::String(value.to_string())),
            (FieldKind::Text, TypedValue::Bool(value)) => Ok(RawValue::String(value.to_string())),

            (FieldKind::Integer | FieldKind::Long, TypedValue::Int(value)) => {
                Ok(RawValue::Int(value))
            }
            (FieldKind::Integer | FieldKind::Long, TypedValue::Float(number)) => {
                float_to_int(number).map(RawValue::Int).ok_or_else(|| {
                    MappingError::MalformedLiteral(self.kind.name(), number.to_string())
                })
            }
            (FieldKind::Integer | FieldKind::Long, TypedValue::Text(value)) => value
                .parse::<i64>()
                .map(RawValue::Int)
                .map_err(|_| MappingError::MalformedLiteral(self.kind.name(), value)),

            (FieldKind::Float, TypedValue::Float(value)) => Ok(RawValue::Float(value)),
            (FieldKind::Float, TypedValue::Int(value)) => Ok(RawValue::Float(value as f64)),
            (FieldKind::Float, TypedValue::Text(value)) => value
                .parse::<f64>()
                .map(RawValue::Float)
                .map_err(|_| MappingError::MalformedLiteral(self.kind.name(), value)),

            (FieldKind::Boolean, TypedValue::Bool(value)) => Ok(RawValue::Bool(value)),

            (FieldKind::Decimal, TypedValue::Decimal(value)) => {
                Ok(RawValue::String(value.to_string()))
            }
            (FieldKind::Decimal, TypedValue::Int(value)) => {
                Ok(RawValue::String(Decimal::from(value).to_string()))
            }
            (FieldKind::Decimal, TypedValue::Text(value)) => value
                .parse::<Decimal>()
                .map(|parsed| RawValue::String(parsed.to_string()))
                .map_err(|_| MappingError::MalformedLiteral(self.kind.name(), value)),

            (FieldKind::Date, TypedValue::Date(value)) => {
                Ok(RawValue::String(value.format(DATE_FORMAT).to_string()))
            }
            (FieldKind::Date, TypedValue::DateTime(value)) => Ok(RawValue::String(
                value.date_naive().format(DATE_FORMAT).to_string(),
            )),

            (FieldKind::DateTime, TypedValue::DateTime(value)) => {
                Ok(RawValue::String(format_datetime(value)))
            }
            (FieldKind::DateTime, TypedValue::Date(value)) => Ok(RawValue::String(
                format_datetime(value.and_time(NaiveTime::MIN).and_utc()),
            )),
            (FieldKind::DateTime, TypedValue::Int(seconds)) => DateTime::from_timestamp(seconds, 0)
                .map(|normalized| RawValue::String(format_datetime(normalized)))
                .ok_or_else(|| {
                    MappingError::MalformedLiteral(self.kind.name(), seconds.to_string())
                }),

            (FieldKind::Time, TypedValue::Time(value)) => {
                Ok(RawValue::String(value.format(TIME_FORMAT).to_string()))
            }
            (FieldKind::Time, TypedValue::DateTime(value)) => Ok(RawValue::String(
                value.time().format(TIME_FORMAT).to_string(),
            )),

            (FieldKind::Record(_), TypedValue::Record(record)) => {
                Ok(RawValue::Document(record.unwrap()))
            }
            (FieldKind::Record(descriptor), TypedValue::Fields(values)) => {
                let record = Schema::construct(descriptor, values)?;
                Ok(RawValue::Document(record.unwrap()))
            }

            (FieldKind::List(element), TypedValue::Sequence(view)) => {
                let out = RawSequence::new();
                for item in view.iter() {
                    out.push(element.to_raw(item?)?);
                }
                Ok(RawValue::Sequence(out))
            }
            (FieldKind::List(element), TypedValue::Items(items)) => {
                let out = RawSequence::new();
                for item in items {
                    out.push(element.to_raw(item)?);
                }
                Ok(RawValue::Sequence(out))
            }

            (_, value) => Err(unexpected(&value)),
        }
    }
}

/// Truncates a float toward zero into an `i64`, per the integer kinds'
/// conversion rule. Non-finite and out-of-range inputs are rejected.
fn float_to_int(value: f64) -> Option<i64> {
    if value.is_finite() && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

/// Formats a date-time per the wire encoding, dropping (not rounding) any
/// sub-second component.
fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
