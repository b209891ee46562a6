//! The untyped raw value tree that the external store persists and transmits.
//!
//! This module provides the wire/storage representation of a record: a
//! JSON-compatible tree of nulls, booleans, numbers, strings, sequences, and
//! ordered string-keyed documents. It is the only form that is ever persisted;
//! everything typed is derived from it on access.
//!
//! # Aliasing
//!
//! The two container variants, [`RawDocument`] and [`RawSequence`], are
//! reference-counted handles over shared storage. Cloning a container clones
//! the handle, not the contents: two clones observe each other's writes. This
//! is the mechanism behind the record-wrapping contract, where a wrapped
//! record shares its backing document with whatever produced it. Use
//! [`RawValue::deep_clone`] when an independent tree is actually wanted.
//!
//! # Example
//!
//! ```ignore
//! use docmap::raw::{RawDocument, RawValue};
//!
//! let doc = RawDocument::new();
//! doc.insert("name", RawValue::String("Ann".into()));
//!
//! let alias = doc.clone();
//! alias.insert("age", RawValue::Int(36));
//! assert!(doc.contains_key("age"));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::MappingResult;

/// An untyped value as the store sees it.
///
/// Scalars are stored inline; sequences and documents are shared handles with
/// the aliasing behavior described in the module documentation.
#[derive(Clone, Debug)]
pub enum RawValue {
    /// The JSON null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer number.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered sequence of raw values (shared handle).
    Sequence(RawSequence),
    /// An ordered string-keyed mapping of raw values (shared handle).
    Document(RawDocument),
}

impl RawValue {
    /// Returns `true` if this value is the JSON null.
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Returns the boolean if this value is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RawValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as an `i64` if it is an integer number.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as an `f64` if it is any kind of number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Int(value) => Some(*value as f64),
            RawValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string slice if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the document handle if this value is a document.
    pub fn as_document(&self) -> Option<&RawDocument> {
        match self {
            RawValue::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Returns the sequence handle if this value is a sequence.
    pub fn as_sequence(&self) -> Option<&RawSequence> {
        match self {
            RawValue::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// A short name for the value's shape, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "boolean",
            RawValue::Int(_) | RawValue::Float(_) => "number",
            RawValue::String(_) => "string",
            RawValue::Sequence(_) => "sequence",
            RawValue::Document(_) => "document",
        }
    }

    /// Recursively copies this value into an independent tree.
    ///
    /// Unlike `clone`, the result shares no storage with the original:
    /// mutations on one side are invisible to the other.
    pub fn deep_clone(&self) -> RawValue {
        match self {
            RawValue::Sequence(seq) => RawValue::Sequence(seq.deep_clone()),
            RawValue::Document(doc) => RawValue::Document(doc.deep_clone()),
            other => other.clone(),
        }
    }

    /// Totally orders two raw values.
    ///
    /// Values of different shapes order by shape (null, then booleans, then
    /// numbers, then strings, then sequences, then documents); numbers compare
    /// numerically across the integer/float split. Used for sequence
    /// comparisons and for sorting view rows by key.
    pub fn compare(&self, other: &RawValue) -> Ordering {
        fn rank(value: &RawValue) -> u8 {
            match value {
                RawValue::Null => 0,
                RawValue::Bool(_) => 1,
                RawValue::Int(_) | RawValue::Float(_) => 2,
                RawValue::String(_) => 3,
                RawValue::Sequence(_) => 4,
                RawValue::Document(_) => 5,
            }
        }

        match (self, other) {
            (RawValue::Null, RawValue::Null) => Ordering::Equal,
            (RawValue::Bool(a), RawValue::Bool(b)) => a.cmp(b),
            (RawValue::Int(a), RawValue::Int(b)) => a.cmp(b),
            (a @ (RawValue::Int(_) | RawValue::Float(_)), b @ (RawValue::Int(_) | RawValue::Float(_))) => {
                let a = a.as_f64().unwrap_or_default();
                let b = b.as_f64().unwrap_or_default();
                a.total_cmp(&b)
            }
            (RawValue::String(a), RawValue::String(b)) => a.cmp(b),
            (RawValue::Sequence(a), RawValue::Sequence(b)) => {
                let a = a.items();
                let b = b.items();
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.compare(y) {
                        Ordering::Equal => continue,
                        unequal => return unequal,
                    }
                }
                a.len().cmp(&b.len())
            }
            (RawValue::Document(a), RawValue::Document(b)) => {
                let mut a = a.entries();
                let mut b = b.entries();
                a.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));
                b.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));
                for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
                    match ka.cmp(kb).then_with(|| va.compare(vb)) {
                        Ordering::Equal => continue,
                        unequal => return unequal,
                    }
                }
                a.len().cmp(&b.len())
            }
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }

    /// Parses a JSON text into a raw value tree.
    pub fn from_json_str(text: &str) -> MappingResult<RawValue> {
        let value: JsonValue = serde_json::from_str(text)?;
        Ok(RawValue::from(value))
    }
}

impl PartialEq for RawValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RawValue::Null, RawValue::Null) => true,
            (RawValue::Bool(a), RawValue::Bool(b)) => a == b,
            (RawValue::Int(a), RawValue::Int(b)) => a == b,
            (RawValue::Float(a), RawValue::Float(b)) => a == b,
            (RawValue::Int(a), RawValue::Float(b)) | (RawValue::Float(b), RawValue::Int(a)) => {
                *a as f64 == *b
            }
            (RawValue::String(a), RawValue::String(b)) => a == b,
            (RawValue::Sequence(a), RawValue::Sequence(b)) => a == b,
            (RawValue::Document(a), RawValue::Document(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        JsonValue::from(self).fmt(f)
    }
}

/// An ordered string-keyed mapping of raw values: the shape of a stored record.
///
/// This is a shared handle; see the module documentation for the aliasing
/// contract. Key order is insertion order, and round-trips through the wire
/// encoding.
#[derive(Clone, Default)]
pub struct RawDocument {
    entries: Arc<RwLock<IndexMap<String, RawValue>>>,
}

impl fmt::Debug for RawDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl RawDocument {
    /// Creates a new, empty document.
    pub fn new() -> RawDocument {
        RawDocument::default()
    }

    /// Returns the value stored under `key`, if any.
    ///
    /// Scalars are returned by value; containers are returned as aliases of
    /// the stored containers.
    pub fn get(&self, key: &str) -> Option<RawValue> {
        self.entries.read().get(key).cloned()
    }

    /// Stores `value` under `key`, replacing and returning any previous value.
    pub fn insert(&self, key: impl Into<String>, value: RawValue) -> Option<RawValue> {
        self.entries.write().insert(key.into(), value)
    }

    /// Removes and returns the value stored under `key`, preserving the order
    /// of the remaining entries.
    pub fn remove(&self, key: &str) -> Option<RawValue> {
        self.entries.write().shift_remove(key)
    }

    /// Returns `true` if a value is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// The number of entries in the document.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// The keys in natural (insertion) order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// A snapshot of the entries in natural order.
    ///
    /// The snapshot itself is independent, but container values inside it
    /// remain aliases of the stored containers.
    pub fn entries(&self) -> Vec<(String, RawValue)> {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Recursively copies this document into an independent tree.
    pub fn deep_clone(&self) -> RawDocument {
        self.entries()
            .into_iter()
            .map(|(k, v)| (k, v.deep_clone()))
            .collect()
    }

    /// Returns `true` if `other` is an alias of this document's storage.
    pub fn ptr_eq(&self, other: &RawDocument) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// Builds a document from a JSON value, if it is an object.
    pub fn from_json(value: JsonValue) -> Option<RawDocument> {
        match RawValue::from(value) {
            RawValue::Document(doc) => Some(doc),
            _ => None,
        }
    }
}

impl FromIterator<(String, RawValue)> for RawDocument {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        RawDocument {
            entries: Arc::new(RwLock::new(iter.into_iter().collect())),
        }
    }
}

impl PartialEq for RawDocument {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let a = self.entries();
        let b = other.entries();
        a.len() == b.len()
            && a.iter()
                .all(|(key, value)| other.get(key).is_some_and(|found| found == *value))
    }
}

impl fmt::Display for RawDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        JsonValue::from(&RawValue::Document(self.clone())).fmt(f)
    }
}

/// An ordered sequence of raw values.
///
/// This is a shared handle; see the module documentation for the aliasing
/// contract.
#[derive(Clone, Default)]
pub struct RawSequence {
    items: Arc<RwLock<Vec<RawValue>>>,
}

impl fmt::Debug for RawSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl RawSequence {
    /// Creates a new, empty sequence.
    pub fn new() -> RawSequence {
        RawSequence::default()
    }

    /// Returns the value at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<RawValue> {
        self.items.read().get(index).cloned()
    }

    /// Replaces the value at `index`, returning the previous value, or `None`
    /// when the index is out of bounds (the sequence is left unchanged).
    pub fn set(&self, index: usize, value: RawValue) -> Option<RawValue> {
        let mut items = self.items.write();
        let slot = items.get_mut(index)?;
        Some(std::mem::replace(slot, value))
    }

    /// Appends a value to the end of the sequence.
    pub fn push(&self, value: RawValue) {
        self.items.write().push(value);
    }

    /// Removes and returns the value at `index`, shifting later elements down,
    /// or `None` when the index is out of bounds.
    pub fn remove(&self, index: usize) -> Option<RawValue> {
        let mut items = self.items.write();
        if index < items.len() {
            Some(items.remove(index))
        } else {
            None
        }
    }

    /// The number of elements in the sequence.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the sequence has no elements.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// A snapshot of the elements in order.
    ///
    /// Container elements remain aliases of the stored containers.
    pub fn items(&self) -> Vec<RawValue> {
        self.items.read().clone()
    }

    /// Recursively copies this sequence into an independent tree.
    pub fn deep_clone(&self) -> RawSequence {
        self.items()
            .into_iter()
            .map(|value| value.deep_clone())
            .collect()
    }

    /// Returns `true` if `other` is an alias of this sequence's storage.
    pub fn ptr_eq(&self, other: &RawSequence) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl FromIterator<RawValue> for RawSequence {
    fn from_iter<I: IntoIterator<Item = RawValue>>(iter: I) -> Self {
        RawSequence {
            items: Arc::new(RwLock::new(iter.into_iter().collect())),
        }
    }
}

impl PartialEq for RawSequence {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.items() == other.items()
    }
}

impl fmt::Display for RawSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        JsonValue::from(&RawValue::Sequence(self.clone())).fmt(f)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> RawValue {
        RawValue::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> RawValue {
        RawValue::String(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> RawValue {
        RawValue::Int(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> RawValue {
        RawValue::Int(value as i64)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> RawValue {
        RawValue::Float(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> RawValue {
        RawValue::Bool(value)
    }
}

impl From<RawDocument> for RawValue {
    fn from(value: RawDocument) -> RawValue {
        RawValue::Document(value)
    }
}

impl From<RawSequence> for RawValue {
    fn from(value: RawSequence) -> RawValue {
        RawValue::Sequence(value)
    }
}

impl From<&RawValue> for JsonValue {
    fn from(value: &RawValue) -> JsonValue {
        match value {
            RawValue::Null => JsonValue::Null,
            RawValue::Bool(value) => JsonValue::Bool(*value),
            RawValue::Int(value) => JsonValue::from(*value),
            RawValue::Float(value) => JsonValue::from(*value),
            RawValue::String(value) => JsonValue::String(value.clone()),
            RawValue::Sequence(seq) => JsonValue::Array(
                seq.items()
                    .iter()
                    .map(JsonValue::from)
                    .collect(),
            ),
            RawValue::Document(doc) => JsonValue::Object(
                doc.entries()
                    .iter()
                    .map(|(k, v)| (k.clone(), JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<RawValue> for JsonValue {
    fn from(value: RawValue) -> JsonValue {
        JsonValue::from(&value)
    }
}

impl From<JsonValue> for RawValue {
    fn from(value: JsonValue) -> RawValue {
        match value {
            JsonValue::Null => RawValue::Null,
            JsonValue::Bool(value) => RawValue::Bool(value),
            JsonValue::Number(number) => {
                if let Some(value) = number.as_i64() {
                    RawValue::Int(value)
                } else {
                    RawValue::Float(number.as_f64().unwrap_or_default())
                }
            }
            JsonValue::String(value) => RawValue::String(value),
            JsonValue::Array(values) => RawValue::Sequence(
                values
                    .into_iter()
                    .map(RawValue::from)
                    .collect(),
            ),
            JsonValue::Object(entries) => RawValue::Document(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, RawValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        JsonValue::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Ok(RawValue::from(value))
    }
}

impl Serialize for RawDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawValue::Document(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        match RawValue::deserialize(deserializer)? {
            RawValue::Document(doc) => Ok(doc),
            other => Err(D::Error::custom(format!(
                "expected a document, found {}",
                other.type_name()
            ))),
        }
    }
}
