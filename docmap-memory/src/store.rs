//! In-memory store implementation.
//!
//! This module provides [`MemoryStore`], a thread-safe implementation of the
//! [`Store`] contract that keeps every document in a map behind an
//! async-aware read-write lock. Index execution runs Rust closures registered
//! at build time, keyed by source string, standing in for a server-side view
//! engine.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use mea::rwlock::RwLock;
use uuid::Uuid;

use docmap_core::{
    error::{MappingError, MappingResult},
    raw::{RawDocument, RawValue},
    store::{QueryOptions, QueryRequest, Row, Store},
};

/// A map function: emits zero or more `(key, value)` pairs per document.
pub type MapFn = Arc<dyn Fn(&RawDocument) -> Vec<(RawValue, RawValue)> + Send + Sync>;

/// A reduce function: folds the mapped `(key, value)` pairs into one value.
pub type ReduceFn = Arc<dyn Fn(&[(RawValue, RawValue)]) -> RawValue + Send + Sync>;

struct ViewSpec {
    map: MapFn,
    reduce: Option<ReduceFn>,
}

/// Thread-safe in-memory document store.
///
/// `MemoryStore` is cloneable and uses `Arc`-wrapped internal state: clones
/// share the same underlying data. Documents are deep-copied at the store
/// boundary in both directions, so every fetch hands out an independent tree
/// and client-side aliasing never reaches into the store.
///
/// # Views
///
/// Named views and temporary-query map functions are Rust closures registered
/// through [`MemoryStore::builder`]. A temporary query is resolved by looking
/// its map source up among the registered functions; executing an unregistered
/// source is a store error.
///
/// # Example
///
/// ```ignore
/// use docmap_memory::MemoryStore;
/// use docmap_core::raw::RawValue;
///
/// let store = MemoryStore::builder()
///     .view("people/by_name", |doc| {
///         match doc.get("name") {
///             Some(name) => vec![(name, RawValue::Null)],
///             None => vec![],
///         }
///     })
///     .build();
/// ```
#[derive(Clone)]
pub struct MemoryStore {
    /// Stored documents by id.
    documents: Arc<RwLock<HashMap<String, RawDocument>>>,
    /// Named views, immutable after build.
    views: Arc<HashMap<String, ViewSpec>>,
    /// Map functions for temporary queries, keyed by source.
    map_funs: Arc<HashMap<String, MapFn>>,
    /// Reduce functions for temporary queries, keyed by source.
    reduce_funs: Arc<HashMap<String, ReduceFn>>,
}

impl MemoryStore {
    /// Creates a new empty store with no registered views.
    pub fn new() -> MemoryStore {
        MemoryStore::builder().build()
    }

    /// Creates a builder for constructing a `MemoryStore` with registered
    /// views and query functions.
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::default()
    }

    /// The number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Returns `true` if no documents are stored.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    async fn execute(
        &self,
        map: &MapFn,
        reduce: Option<&ReduceFn>,
        options: &QueryOptions,
    ) -> MappingResult<Vec<Row>> {
        let documents = self.documents.read().await;
        let mut ids: Vec<&String> = documents.keys().collect();
        ids.sort();

        let emit = map.as_ref();
        let mut rows = Vec::new();
        for id in ids {
            for (key, value) in emit(&documents[id]) {
                rows.push(Row {
                    id: id.clone(),
                    key: key.deep_clone(),
                    value: value.deep_clone(),
                    doc: None,
                });
            }
        }
        rows.sort_by(|a, b| a.key.compare(&b.key).then_with(|| a.id.cmp(&b.id)));

        if let Some(filter) = options.key_filter() {
            rows.retain(|row| row.key == *filter);
        }
        if options.is_descending() {
            rows.reverse();
        }
        let skip = options.skip_count().min(rows.len());
        if skip > 0 {
            rows.drain(..skip);
        }
        if let Some(limit) = options.limit_count() {
            rows.truncate(limit);
        }

        if let Some(reduce) = reduce {
            let pairs: Vec<(RawValue, RawValue)> = rows
                .iter()
                .map(|row| (row.key.clone(), row.value.clone()))
                .collect();
            return Ok(vec![Row {
                id: String::new(),
                key: RawValue::Null,
                value: reduce.as_ref()(&pairs),
                doc: None,
            }]);
        }

        if options.wants_docs() {
            for row in rows.iter_mut() {
                row.doc = documents.get(&row.id).map(RawDocument::deep_clone);
            }
        }
        Ok(rows)
    }
}

impl Default for MemoryStore {
    fn default() -> MemoryStore {
        MemoryStore::new()
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, id: &str) -> MappingResult<Option<RawDocument>> {
        let documents = self.documents.read().await;
        Ok(documents.get(id).map(RawDocument::deep_clone))
    }

    async fn create(&self, doc: RawDocument) -> MappingResult<String> {
        let copy = doc.deep_clone();
        let id = match copy.get("_id") {
            Some(RawValue::String(id)) => id,
            _ => Uuid::new_v4().simple().to_string(),
        };
        let mut documents = self.documents.write().await;
        if documents.contains_key(&id) {
            return Err(MappingError::Store(format!("document {id} already exists")));
        }
        copy.insert("_id", RawValue::String(id.clone()));
        copy.insert(
            "_rev",
            RawValue::String(format!("1-{}", Uuid::new_v4().simple())),
        );
        documents.insert(id.clone(), copy);
        Ok(id)
    }

    async fn upsert(&self, id: &str, doc: RawDocument) -> MappingResult<()> {
        let copy = doc.deep_clone();
        copy.insert("_id", RawValue::String(id.to_string()));
        let mut documents = self.documents.write().await;
        let generation = documents
            .get(id)
            .and_then(|current| current.get("_rev"))
            .and_then(|rev| match rev {
                RawValue::String(rev) => rev
                    .split('-')
                    .next()
                    .and_then(|n| n.parse::<u64>().ok()),
                _ => None,
            })
            .unwrap_or(0);
        copy.insert(
            "_rev",
            RawValue::String(format!("{}-{}", generation + 1, Uuid::new_v4().simple())),
        );
        documents.insert(id.to_string(), copy);
        Ok(())
    }

    async fn query(&self, request: QueryRequest) -> MappingResult<Vec<Row>> {
        let map = self.map_funs.get(&request.map_fun).ok_or_else(|| {
            MappingError::Store("no registered map function for query source".to_string())
        })?;
        let reduce = match &request.reduce_fun {
            Some(source) => Some(self.reduce_funs.get(source).ok_or_else(|| {
                MappingError::Store("no registered reduce function for query source".to_string())
            })?),
            None => None,
        };
        self.execute(map, reduce, &request.options).await
    }

    async fn view(&self, name: &str, options: QueryOptions) -> MappingResult<Vec<Row>> {
        let spec = self
            .views
            .get(name)
            .ok_or_else(|| MappingError::Store(format!("no such view: {name}")))?;
        self.execute(&spec.map, spec.reduce.as_ref(), &options)
            .await
    }
}

/// Builder for [`MemoryStore`], collecting view and query-function
/// registrations.
#[derive(Default)]
pub struct MemoryStoreBuilder {
    views: HashMap<String, ViewSpec>,
    map_funs: HashMap<String, MapFn>,
    reduce_funs: HashMap<String, ReduceFn>,
}

impl MemoryStoreBuilder {
    /// Registers a map-only named view under `name` (conventionally
    /// `"design/view"`).
    pub fn view(
        mut self,
        name: impl Into<String>,
        map: impl Fn(&RawDocument) -> Vec<(RawValue, RawValue)> + Send + Sync + 'static,
    ) -> MemoryStoreBuilder {
        self.views.insert(
            name.into(),
            ViewSpec {
                map: Arc::new(map),
                reduce: None,
            },
        );
        self
    }

    /// Registers a named view with both map and reduce functions.
    pub fn view_with_reduce(
        mut self,
        name: impl Into<String>,
        map: impl Fn(&RawDocument) -> Vec<(RawValue, RawValue)> + Send + Sync + 'static,
        reduce: impl Fn(&[(RawValue, RawValue)]) -> RawValue + Send + Sync + 'static,
    ) -> MemoryStoreBuilder {
        self.views.insert(
            name.into(),
            ViewSpec {
                map: Arc::new(map),
                reduce: Some(Arc::new(reduce)),
            },
        );
        self
    }

    /// Registers a map function for temporary queries, keyed by its source.
    pub fn map_fun(
        mut self,
        source: impl Into<String>,
        map: impl Fn(&RawDocument) -> Vec<(RawValue, RawValue)> + Send + Sync + 'static,
    ) -> MemoryStoreBuilder {
        self.map_funs.insert(source.into(), Arc::new(map));
        self
    }

    /// Registers a reduce function for temporary queries, keyed by its source.
    pub fn reduce_fun(
        mut self,
        source: impl Into<String>,
        reduce: impl Fn(&[(RawValue, RawValue)]) -> RawValue + Send + Sync + 'static,
    ) -> MemoryStoreBuilder {
        self.reduce_funs.insert(source.into(), Arc::new(reduce));
        self
    }

    /// Builds the store.
    pub fn build(self) -> MemoryStore {
        MemoryStore {
            documents: Arc::new(RwLock::new(HashMap::new())),
            views: Arc::new(self.views),
            map_funs: Arc::new(self.map_funs),
            reduce_funs: Arc::new(self.reduce_funs),
        }
    }
}
