//! The external store contract consumed by the mapping layer.
//!
//! This module defines the narrow interface through which records reach
//! whatever actually persists them. The mapping layer never talks HTTP or
//! executes index queries itself; it hands raw documents to a [`Store`]
//! implementation and wraps whatever comes back. Implementations may be
//! in-memory, remote, or anything in between.
//!
//! # Contract notes
//!
//! - Implementations must not retain aliases of documents handed to
//!   [`Store::create`] / [`Store::upsert`]: take a deep copy at the boundary,
//!   so client-side aliasing stays a client-side contract.
//! - Failures are surfaced unchanged through
//!   [`MappingError::Store`](crate::error::MappingError::Store); the mapping
//!   layer adds no retry, timeout, or backoff policy.
//! - A missing id on [`Store::get`] is `Ok(None)`, never an error.

use async_trait::async_trait;

use crate::error::MappingResult;
use crate::raw::{RawDocument, RawValue};

/// One result row of an index query.
///
/// `value` is whatever the index emitted for the row; `doc` carries the
/// attached full document when the query asked for one, and is what eager
/// row wrapping reuses before falling back to a per-row fetch.
#[derive(Debug, Clone)]
pub struct Row {
    /// Id of the document that produced this row.
    pub id: String,
    /// The emitted index key.
    pub key: RawValue,
    /// The emitted value.
    pub value: RawValue,
    /// The attached full document, if the query requested one.
    pub doc: Option<RawDocument>,
}

/// Query-time options applied by the store when producing rows.
///
/// All options are tri-state (`None` means "not specified") so that template
/// defaults and invocation options can be merged; see
/// [`QueryOptions::merged_over`].
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    key: Option<RawValue>,
    descending: Option<bool>,
    skip: Option<usize>,
    limit: Option<usize>,
    include_docs: Option<bool>,
}

impl QueryOptions {
    /// Creates an empty option set.
    pub fn new() -> QueryOptions {
        QueryOptions::default()
    }

    /// Restricts results to rows whose key equals `key`.
    pub fn key(mut self, key: impl Into<RawValue>) -> QueryOptions {
        self.key = Some(key.into());
        self
    }

    /// Sets the row ordering direction.
    pub fn descending(mut self, descending: bool) -> QueryOptions {
        self.descending = Some(descending);
        self
    }

    /// Skips the first `skip` rows.
    pub fn skip(mut self, skip: usize) -> QueryOptions {
        self.skip = Some(skip);
        self
    }

    /// Caps the number of returned rows.
    pub fn limit(mut self, limit: usize) -> QueryOptions {
        self.limit = Some(limit);
        self
    }

    /// Asks the store to attach the full document to each row.
    pub fn include_docs(mut self, include_docs: bool) -> QueryOptions {
        self.include_docs = Some(include_docs);
        self
    }

    /// The configured key filter, if any.
    pub fn key_filter(&self) -> Option<&RawValue> {
        self.key.as_ref()
    }

    /// Whether rows should be ordered descending (default: ascending).
    pub fn is_descending(&self) -> bool {
        self.descending.unwrap_or(false)
    }

    /// The number of leading rows to skip (default: 0).
    pub fn skip_count(&self) -> usize {
        self.skip.unwrap_or(0)
    }

    /// The configured row cap, if any.
    pub fn limit_count(&self) -> Option<usize> {
        self.limit
    }

    /// Whether full documents should be attached to rows (default: no).
    pub fn wants_docs(&self) -> bool {
        self.include_docs.unwrap_or(false)
    }

    /// Overlays these options onto `defaults`: every option specified here
    /// wins, unspecified ones fall back to the default set.
    pub fn merged_over(self, defaults: &QueryOptions) -> QueryOptions {
        QueryOptions {
            key: self.key.or_else(|| defaults.key.clone()),
            descending: self.descending.or(defaults.descending),
            skip: self.skip.or(defaults.skip),
            limit: self.limit.or(defaults.limit),
            include_docs: self.include_docs.or(defaults.include_docs),
        }
    }
}

/// A temporary (ad-hoc) index query: map source, optional reduce source, the
/// language they are written in, and query-time options.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// Source text of the map function.
    pub map_fun: String,
    /// Source text of the reduce function, if the query reduces.
    pub reduce_fun: Option<String>,
    /// The language the sources are written in.
    pub language: String,
    /// Query-time options.
    pub options: QueryOptions,
}

impl QueryRequest {
    /// Creates a request for a map-only query in the default language.
    pub fn new(map_fun: impl Into<String>) -> QueryRequest {
        QueryRequest {
            map_fun: map_fun.into(),
            reduce_fun: None,
            language: "javascript".to_string(),
            options: QueryOptions::default(),
        }
    }

    /// Adds a reduce source.
    pub fn reduce(mut self, reduce_fun: impl Into<String>) -> QueryRequest {
        self.reduce_fun = Some(reduce_fun.into());
        self
    }

    /// Sets the source language.
    pub fn language(mut self, language: impl Into<String>) -> QueryRequest {
        self.language = language.into();
        self
    }

    /// Sets the query-time options.
    pub fn options(mut self, options: QueryOptions) -> QueryRequest {
        self.options = options;
        self
    }
}

/// Abstract interface to an external document store.
///
/// This is the only surface the mapping layer consumes: fetch, create, and
/// upsert of raw documents by id, plus execution of temporary and named index
/// queries. Everything else (transport, retries, index maintenance) belongs
/// to the implementation.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetches the document stored under `id`.
    ///
    /// # Returns
    ///
    /// `Ok(Some(doc))` when found, `Ok(None)` when no such id exists, never
    /// a partial result.
    async fn get(&self, id: &str) -> MappingResult<Option<RawDocument>>;

    /// Creates a new record from `doc` and returns its assigned id.
    ///
    /// The store may assign an id and revision of its own; callers re-read
    /// the created record to observe them.
    async fn create(&self, doc: RawDocument) -> MappingResult<String>;

    /// Stores `doc` under `id`, creating or replacing it.
    async fn upsert(&self, id: &str, doc: RawDocument) -> MappingResult<()>;

    /// Executes a temporary index query and returns the resulting rows.
    async fn query(&self, request: QueryRequest) -> MappingResult<Vec<Row>>;

    /// Executes the named index and returns the resulting rows.
    async fn view(&self, name: &str, options: QueryOptions) -> MappingResult<Vec<Row>>;
}

#[async_trait]
impl<B> Store for &B
where
    B: Store,
{
    async fn get(&self, id: &str) -> MappingResult<Option<RawDocument>> {
        (*self).get(id).await
    }

    async fn create(&self, doc: RawDocument) -> MappingResult<String> {
        (*self).create(doc).await
    }

    async fn upsert(&self, id: &str, doc: RawDocument) -> MappingResult<()> {
        (*self).upsert(id, doc).await
    }

    async fn query(&self, request: QueryRequest) -> MappingResult<Vec<Row>> {
        (*self).query(request).await
    }

    async fn view(&self, name: &str, options: QueryOptions) -> MappingResult<Vec<Row>> {
        (*self).view(name, options).await
    }
}

#[async_trait]
impl<B> Store for &mut B
where
    B: Store,
{
    async fn get(&self, id: &str) -> MappingResult<Option<RawDocument>> {
        (**self).get(id).await
    }

    async fn create(&self, doc: RawDocument) -> MappingResult<String> {
        (**self).create(doc).await
    }

    async fn upsert(&self, id: &str, doc: RawDocument) -> MappingResult<()> {
        (**self).upsert(id, doc).await
    }

    async fn query(&self, request: QueryRequest) -> MappingResult<Vec<Row>> {
        (**self).query(request).await
    }

    async fn view(&self, name: &str, options: QueryOptions) -> MappingResult<Vec<Row>> {
        (**self).view(name, options).await
    }
}
