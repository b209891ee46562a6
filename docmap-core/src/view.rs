//! Named index bindings and deferred, typed query templates.
//!
//! A [`ViewBinding`] declares a server-side index (design document name, map
//! and optional reduce sources, language, and default query options) on a
//! schema descriptor, next to the schema's fields. Accessing the binding
//! through
//! [`SchemaDescriptor::view_template`](crate::schema::SchemaDescriptor::view_template)
//! produces a [`ViewTemplate`]: a deferred query bound to the schema's wrap,
//! not an executed one. Nothing touches the store until the template is
//! invoked with a store handle.
//!
//! # Example
//!
//! ```ignore
//! use docmap::schema::SchemaDescriptor;
//! use docmap::view::ViewBinding;
//!
//! let person = SchemaDescriptor::builder("person")
//!     .view("by_name", ViewBinding::new("people", r#"
//!         function(doc) {
//!             emit(doc.name, doc.age);
//!         }"#))
//!     .build();
//!
//! let by_name = person.view_template("by_name").unwrap();
//! let results = by_name.run(&db, QueryOptions::new().limit(3)).await?;
//! ```

use crate::document::{Document, synthesize_row_document};
use crate::error::MappingResult;
use crate::schema::SchemaDescriptor;
use crate::store::{QueryOptions, Store};

/// Declaration of a named server-side index, bound to a schema attribute.
///
/// The view name defaults to the attribute the binding is declared under; the
/// language defaults to `"javascript"`.
#[derive(Clone, Debug)]
pub struct ViewBinding {
    design: String,
    name: Option<String>,
    map_fun: String,
    reduce_fun: Option<String>,
    language: String,
    defaults: QueryOptions,
}

impl ViewBinding {
    /// Creates a binding for a map-only view in the design document `design`.
    pub fn new(design: impl Into<String>, map_fun: impl Into<String>) -> ViewBinding {
        ViewBinding {
            design: design.into(),
            name: None,
            map_fun: map_fun.into(),
            reduce_fun: None,
            language: "javascript".to_string(),
            defaults: QueryOptions::default(),
        }
    }

    /// Sets the view name explicitly, overriding attribute-name inference.
    pub fn named(mut self, name: impl Into<String>) -> ViewBinding {
        self.name = Some(name.into());
        self
    }

    /// Adds a reduce source.
    pub fn reduce(mut self, reduce_fun: impl Into<String>) -> ViewBinding {
        self.reduce_fun = Some(reduce_fun.into());
        self
    }

    /// Sets the language the sources are written in.
    pub fn language(mut self, language: impl Into<String>) -> ViewBinding {
        self.language = language.into();
        self
    }

    /// Sets default query options, applied under any invocation options.
    pub fn defaults(mut self, options: QueryOptions) -> ViewBinding {
        self.defaults = options;
        self
    }

    /// The design document name.
    pub fn design(&self) -> &str {
        &self.design
    }

    /// The view name, once assigned (explicitly or by a registry build).
    pub fn view_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The map function source.
    pub fn map_source(&self) -> &str {
        &self.map_fun
    }

    /// The reduce function source, if any.
    pub fn reduce_source(&self) -> Option<&str> {
        self.reduce_fun.as_deref()
    }

    /// Assigns the attribute name as the view name unless one was set
    /// explicitly. Called once, when the owning descriptor is built.
    pub(crate) fn resolve_name(&mut self, attr: &str) {
        if self.name.is_none() {
            self.name = Some(attr.to_string());
        }
    }

    pub(crate) fn template(&self, descriptor: SchemaDescriptor) -> ViewTemplate {
        ViewTemplate {
            descriptor,
            design: self.design.clone(),
            name: self.name.clone().unwrap_or_default(),
            map_fun: self.map_fun.clone(),
            reduce_fun: self.reduce_fun.clone(),
            language: self.language.clone(),
            defaults: self.defaults.clone(),
        }
    }
}

/// A deferred, typed query against a named index.
///
/// Carries everything needed to execute later (index path, sources,
/// language, default options) plus the descriptor whose `wrap` turns result
/// rows into records. Produced by
/// [`SchemaDescriptor::view_template`](crate::schema::SchemaDescriptor::view_template).
#[derive(Clone, Debug)]
pub struct ViewTemplate {
    descriptor: SchemaDescriptor,
    design: String,
    name: String,
    map_fun: String,
    reduce_fun: Option<String>,
    language: String,
    defaults: QueryOptions,
}

impl ViewTemplate {
    /// The design document name.
    pub fn design(&self) -> &str {
        &self.design
    }

    /// The view name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `design/name` path the store executes.
    pub fn path(&self) -> String {
        format!("{}/{}", self.design, self.name)
    }

    /// The map function source.
    pub fn map_source(&self) -> &str {
        &self.map_fun
    }

    /// The reduce function source, if any.
    pub fn reduce_source(&self) -> Option<&str> {
        self.reduce_fun.as_deref()
    }

    /// The language the sources are written in.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The binding's default query options.
    pub fn default_options(&self) -> &QueryOptions {
        &self.defaults
    }

    /// Executes the view and wraps each row with the bound schema.
    ///
    /// `options` are merged over the binding's defaults, invocation options
    /// winning. A row carrying an attached full document is wrapped directly;
    /// otherwise a minimal document is synthesized from the emitted value
    /// plus the row id.
    ///
    /// # Errors
    ///
    /// Store failures are propagated unchanged.
    pub async fn run<S>(&self, db: &S, options: QueryOptions) -> MappingResult<Vec<Document>>
    where
        S: Store + ?Sized,
    {
        let merged = options.merged_over(&self.defaults);
        let rows = db.view(&self.path(), merged).await?;
        Ok(rows
            .into_iter()
            .map(|row| match row.doc {
                Some(doc) => Document::wrap(&self.descriptor, doc),
                None => Document::wrap(
                    &self.descriptor,
                    synthesize_row_document(row.id, row.value),
                ),
            })
            .collect())
    }
}
