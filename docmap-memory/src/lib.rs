//! In-memory store backend for docmap.
//!
//! This crate provides a thread-safe, in-memory implementation of the docmap
//! [`Store`](docmap_core::store::Store) contract. It uses async-aware
//! read-write locks for concurrent access and is ideal for development,
//! testing, and small-scale deployments.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an async-aware RwLock
//! - **Boundary isolation** - Documents are deep-copied on the way in and out
//! - **Closure-backed views** - Named views and temporary queries run registered Rust closures
//! - **Revision stamping** - CouchDB-style `"<n>-<hash>"` revision strings, bumped on upsert
//!
//! # Quick Start
//!
//! ```ignore
//! use docmap_core::document::Document;
//! use docmap_core::field::{Field, Values};
//! use docmap_core::schema::SchemaDescriptor;
//! use docmap_memory::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let person = SchemaDescriptor::builder("person")
//!         .field("name", Field::text())
//!         .build();
//!     let db = MemoryStore::new();
//!
//!     let record = Document::new(&person, Values::new().with("name", "Ann"))?;
//!     let record = record.store(&db).await?;
//!     assert!(record.id().is_some());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmap_memory;

pub mod store;

pub use store::{MapFn, MemoryStore, MemoryStoreBuilder, ReduceFn};
