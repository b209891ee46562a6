//! A typed mapping layer between untyped JSON documents and structured records.
//!
//! This crate is the core of the docmap project and provides:
//!
//! - **Raw value tree** ([`raw`]) - The untyped, aliasable document representation the store persists
//! - **Fields** ([`field`]) - Per-attribute bidirectional scalar conversion and default policies
//! - **Schemas** ([`schema`]) - Field registries, schema descriptors, and structured records
//! - **Documents** ([`document`]) - Records with identity, revision, and store-facing operations
//! - **Typed sequences** ([`list`]) - Lazy, per-access converting views over raw sequences
//! - **View bindings** ([`view`]) - Deferred, typed templates for named index queries
//! - **Store contract** ([`store`]) - The narrow interface to an external document store
//! - **Decimal scalar** ([`decimal`]) - Exact decimal numerals for the decimal field kind
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use docmap_core::document::Document;
//! use docmap_core::field::{Field, Values};
//! use docmap_core::schema::SchemaDescriptor;
//!
//! let person = SchemaDescriptor::builder("person")
//!     .field("name", Field::text())
//!     .field("age", Field::integer().default_value(0))
//!     .build();
//!
//! let record = Document::new(&person, Values::new().with("name", "John Doe"))?;
//! assert_eq!(record.get("age")?.unwrap().as_int(), Some(0));
//! # Ok::<(), docmap_core::error::MappingError>(())
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmap_core;

pub mod decimal;
pub mod document;
pub mod error;
pub mod field;
pub mod list;
pub mod raw;
pub mod schema;
pub mod store;
pub mod view;
