//! Error types and result types for mapping operations.
//!
//! This module provides error handling for field conversion, record identity,
//! and store-facing operations. Use [`MappingResult<T>`] as the return type for
//! fallible operations.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur in the mapping layer.
///
/// Conversion errors are raised lazily, at the point of typed access; a record
/// holding a malformed raw value can be wrapped and passed around freely as
/// long as the offending field is never read.
#[derive(Error, Debug)]
pub enum MappingError {
    /// A raw scalar could not be parsed per its field kind's wire format.
    /// The first argument is the field kind, the second the offending literal.
    #[error("malformed {0} literal: {1:?}")]
    MalformedLiteral(&'static str, String),
    /// A typed value was handed to a field kind that cannot encode it.
    /// The first argument is the field kind, the second describes the value.
    #[error("{0} field cannot encode {1}")]
    UnexpectedValue(&'static str, String),
    /// Typed access to an attribute the schema's field registry does not declare.
    #[error("unknown field: {0}")]
    UnknownField(String),
    /// The document id is already set; ids can only be assigned on new documents.
    #[error("id can only be set on new documents")]
    IdAlreadySet,
    /// A sequence index beyond the end of the underlying raw sequence.
    #[error("index {index} out of bounds for sequence of length {len}")]
    OutOfBounds {
        /// The requested index.
        index: usize,
        /// The sequence length at the time of access.
        len: usize,
    },
    /// A failure propagated unchanged from the external store.
    #[error("store error: {0}")]
    Store(String),
    /// Serialization error when converting the raw value tree to or from JSON text.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A specialized `Result` type for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;

impl From<SerdeJsonError> for MappingError {
    fn from(err: SerdeJsonError) -> Self {
        MappingError::Serialization(err.to_string())
    }
}
