//! docmap: a typed mapping layer between JSON documents and structured records.
//!
//! docmap converts between the untyped, nested value trees a schemaless
//! document store persists and strongly-typed records declared by an
//! application. Records are declared at runtime as schema descriptors: tables
//! of per-field converters with defaults, composable into nested schemas and
//! typed sequences. The backing raw document of a record can be freshly
//! constructed or aliased onto a value retrieved from a store, and every
//! typed access performs exactly one field conversion; nothing is converted
//! in bulk and nothing is cached.
//!
//! The project ships as three crates, re-exported here:
//!
//! - `docmap-core` - the mapping machinery ([`field`], [`schema`],
//!   [`document`], [`list`], [`view`], [`raw`], [`store`], [`error`])
//! - `docmap-memory` - an in-memory implementation of the store contract
//!   ([`memory`])
//! - `docmap` - this facade, plus the [`prelude`]
//!
//! # Example
//!
//! ```ignore
//! use docmap::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let person = SchemaDescriptor::builder("person")
//!         .field("name", Field::text())
//!         .field("age", Field::integer())
//!         .build();
//!
//!     let db = MemoryStore::new();
//!     let record = Document::new(&person, Values::new().with("name", "John Doe").with("age", 42))?;
//!     let record = record.store(&db).await?;
//!
//!     let loaded = Document::load(&person, &db, &record.id().unwrap()).await?.unwrap();
//!     assert_eq!(loaded.get("age")?.unwrap().as_int(), Some(42));
//!     Ok(())
//! }
//! ```

pub use docmap_core::{decimal, document, error, field, list, raw, schema, store, view};
pub use docmap_memory as memory;

pub mod prelude;
