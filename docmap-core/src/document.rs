//! Identified records and their store-facing operations.
//!
//! A [`Document`] is a [`Schema`] specialized with an identity: the reserved
//! backing keys `_id` (write-once) and `_rev` (read-only, assigned by the
//! store). On top of the identity rules it adds the operations that move raw
//! documents to and from an external [`Store`]: `store`, `load`, and the
//! row-wrapping `query`/`view` executions.
//!
//! # Example
//!
//! ```ignore
//! use docmap::document::Document;
//! use docmap::field::{Field, Values};
//! use docmap::schema::SchemaDescriptor;
//!
//! let person = SchemaDescriptor::builder("person")
//!     .field("name", Field::text())
//!     .field("age", Field::integer())
//!     .build();
//!
//! let record = Document::new(&person, Values::new().with("name", "John Doe").with("age", 42))?;
//! let record = record.store(&db).await?;
//! assert!(record.rev().is_some());
//! # Ok::<(), docmap::error::MappingError>(())
//! ```

use std::ops::{Deref, DerefMut};

use crate::error::{MappingError, MappingResult};
use crate::field::{TypedValue, Values};
use crate::raw::{RawDocument, RawValue};
use crate::schema::{Schema, SchemaDescriptor};
use crate::store::{QueryOptions, QueryRequest, Row, Store};

const ID_KEY: &str = "_id";
const REV_KEY: &str = "_rev";

/// A structured record with an immutable identity and a store-assigned
/// revision.
///
/// Derefs to [`Schema`], so typed and raw attribute access work directly on
/// the document.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    inner: Schema,
}

impl Document {
    /// Constructs a fresh document.
    ///
    /// Field entries of `values` are applied exactly as in
    /// [`Schema::construct`]; an `"id"` entry left unconsumed by the field
    /// sweep is claimed as the document identity. Anything else unrecognized
    /// is ignored.
    pub fn new(descriptor: &SchemaDescriptor, values: Values) -> MappingResult<Document> {
        let (schema, mut rest) = Schema::construct_partial(descriptor, values)?;
        let document = Document { inner: schema };
        if let Some(value) = rest.remove("id") {
            match value {
                TypedValue::Text(id) => document.set_id(id)?,
                other => {
                    return Err(MappingError::UnexpectedValue(
                        "id",
                        other.kind_name().to_string(),
                    ));
                }
            }
        }
        Ok(document)
    }

    /// Wraps a raw document obtained elsewhere, aliasing it.
    ///
    /// No defaulting is applied; a partially-populated row surfaces only the
    /// keys it actually has.
    pub fn wrap(descriptor: &SchemaDescriptor, data: RawDocument) -> Document {
        Document {
            inner: Schema::wrap(descriptor, data),
        }
    }

    /// The document id, if set.
    pub fn id(&self) -> Option<String> {
        match self.inner.get_raw(ID_KEY) {
            Some(RawValue::String(id)) => Some(id),
            _ => None,
        }
    }

    /// Assigns the document id.
    ///
    /// # Errors
    ///
    /// [`MappingError::IdAlreadySet`] when an id is already present, even
    /// when assigning the same value again.
    pub fn set_id(&self, id: impl Into<String>) -> MappingResult<()> {
        if self.id().is_some() {
            return Err(MappingError::IdAlreadySet);
        }
        self.inner.set_raw(ID_KEY, RawValue::String(id.into()));
        Ok(())
    }

    /// The document revision, if the store has assigned one.
    pub fn rev(&self) -> Option<String> {
        match self.inner.get_raw(REV_KEY) {
            Some(RawValue::String(rev)) => Some(rev),
            _ => None,
        }
    }

    /// The document's raw entries as `(key, value)` pairs.
    ///
    /// Identity comes first: `_id`, then `_rev` (revision only when the id is
    /// set), followed by every other key in the backing document's natural
    /// order; the reserved keys are skipped in that generic sweep.
    pub fn items(&self) -> Vec<(String, RawValue)> {
        let mut items = Vec::new();
        if let Some(id) = self.id() {
            items.push((ID_KEY.to_string(), RawValue::String(id)));
            if let Some(rev) = self.rev() {
                items.push((REV_KEY.to_string(), RawValue::String(rev)));
            }
        }
        for (key, value) in self.inner.raw_entries() {
            if key != ID_KEY && key != REV_KEY {
                items.push((key, value));
            }
        }
        items
    }

    /// Persists the document in the given store.
    ///
    /// Without an id, the store creates a new record and the backing document
    /// is replaced wholesale by re-reading the created record, picking up
    /// the assigned id, revision, and any server-side defaults. With an id,
    /// the raw document is upserted at that id and the backing store is left
    /// untouched otherwise. Returns the document for chaining.
    ///
    /// # Errors
    ///
    /// Store failures are propagated unchanged.
    pub async fn store<S>(mut self, db: &S) -> MappingResult<Document>
    where
        S: Store + ?Sized,
    {
        match self.id() {
            Some(id) => {
                db.upsert(&id, self.inner.unwrap()).await?;
            }
            None => {
                let id = db.create(self.inner.unwrap()).await?;
                let fresh = db.get(&id).await?.ok_or_else(|| {
                    MappingError::Store(format!("created document {id} could not be read back"))
                })?;
                self.inner.replace_data(fresh);
            }
        }
        Ok(self)
    }

    /// Loads a document from the given store.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no document exists under `id`; never an error and
    /// never a partial result.
    pub async fn load<S>(
        descriptor: &SchemaDescriptor,
        db: &S,
        id: &str,
    ) -> MappingResult<Option<Document>>
    where
        S: Store + ?Sized,
    {
        Ok(db
            .get(id)
            .await?
            .map(|data| Document::wrap(descriptor, data)))
    }

    /// Executes a temporary index query and maps the rows back to documents
    /// of this schema.
    ///
    /// With `eager` set, each row reuses its attached full document when
    /// present and is otherwise loaded by id (rows whose document has
    /// vanished are dropped). Without it, a minimal document is synthesized
    /// from the row's emitted value plus the row id; properties the index
    /// did not emit read as missing.
    pub async fn query<S>(
        descriptor: &SchemaDescriptor,
        db: &S,
        request: QueryRequest,
        eager: bool,
    ) -> MappingResult<Vec<Document>>
    where
        S: Store + ?Sized,
    {
        let rows = db.query(request).await?;
        Document::wrap_rows(descriptor, db, rows, eager).await
    }

    /// Executes a named index and maps the rows back to documents of this
    /// schema. Row wrapping behaves as in [`Document::query`].
    pub async fn view<S>(
        descriptor: &SchemaDescriptor,
        db: &S,
        name: &str,
        options: QueryOptions,
        eager: bool,
    ) -> MappingResult<Vec<Document>>
    where
        S: Store + ?Sized,
    {
        let rows = db.view(name, options).await?;
        Document::wrap_rows(descriptor, db, rows, eager).await
    }

    pub(crate) async fn wrap_rows<S>(
        descriptor: &SchemaDescriptor,
        db: &S,
        rows: Vec<Row>,
        eager: bool,
    ) -> MappingResult<Vec<Document>>
    where
        S: Store + ?Sized,
    {
        let mut documents = Vec::with_capacity(rows.len());
        for row in rows {
            if eager {
                match row.doc {
                    Some(doc) => documents.push(Document::wrap(descriptor, doc)),
                    None => {
                        if let Some(found) = Document::load(descriptor, db, &row.id).await? {
                            documents.push(found);
                        }
                    }
                }
            } else {
                let data = synthesize_row_document(row.id, row.value);
                documents.push(Document::wrap(descriptor, data));
            }
        }
        Ok(documents)
    }
}

/// Builds the minimal backing document for a non-eager row: the emitted value
/// when it is document-shaped, stamped with the row id; otherwise a document
/// carrying only the id.
pub(crate) fn synthesize_row_document(id: String, value: RawValue) -> RawDocument {
    let data = match value {
        RawValue::Document(doc) => doc,
        _ => RawDocument::new(),
    };
    data.insert(ID_KEY, RawValue::String(id));
    data
}

impl Deref for Document {
    type Target = Schema;

    fn deref(&self) -> &Schema {
        &self.inner
    }
}

impl DerefMut for Document {
    fn deref_mut(&mut self) -> &mut Schema {
        &mut self.inner
    }
}
