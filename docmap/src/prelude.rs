//! Convenient re-exports of commonly used types from docmap.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use docmap::prelude::*;
//! ```
//!
//! This provides access to:
//! - Schema descriptors, fields, and typed values
//! - Documents and the store contract
//! - Typed sequence views and view bindings
//! - The raw value tree and error types
//! - The in-memory store backend

pub use docmap_core::{
    decimal::Decimal,
    document::Document,
    error::{MappingError, MappingResult},
    field::{Field, FieldDefault, FieldKind, TypedValue, Values},
    list::ListProxy,
    raw::{RawDocument, RawSequence, RawValue},
    schema::{DescriptorBuilder, FieldRegistry, Schema, SchemaDescriptor},
    store::{QueryOptions, QueryRequest, Row, Store},
    view::{ViewBinding, ViewTemplate},
};
pub use docmap_memory::MemoryStore;
