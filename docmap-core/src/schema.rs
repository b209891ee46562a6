//! Schema descriptors, field registries, and structured records.
//!
//! A schema is declared once, as a [`SchemaDescriptor`]: an immutable,
//! cheaply-cloneable handle over a [`FieldRegistry`] collected from ancestor
//! descriptors and the schema's own field declarations. Records, that is
//! [`Schema`] instances, pair a descriptor with one backing raw document and
//! expose
//! two faces over it:
//!
//! - typed attribute access, delegating to the declared [`Field`] converters;
//! - raw map-like access, acting on the backing document's keys directly,
//!   independent of declared fields, so untyped keys round-trip untouched.
//!
//! # Declaring a schema
//!
//! ```ignore
//! use docmap::field::{Field, Values};
//! use docmap::schema::{Schema, SchemaDescriptor};
//!
//! let person = SchemaDescriptor::builder("person")
//!     .field("name", Field::text())
//!     .field("age", Field::integer().default_value(0))
//!     .build();
//!
//! let record = Schema::construct(&person, Values::new().with("name", "Ann"))?;
//! assert_eq!(record.get("age")?.unwrap().as_int(), Some(0));
//! # Ok::<(), docmap::error::MappingError>(())
//! ```
//!
//! # Fresh vs wrapped records
//!
//! [`Schema::construct`] starts from an empty backing document and applies
//! the supplied values through the typed setters; unsupplied fields have
//! their defaults computed once (for immediate use) but never persisted.
//! [`Schema::wrap`] aliases a raw document obtained elsewhere and applies no
//! defaulting, so a partially-populated row surfaces only the keys it has.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{MappingError, MappingResult};
use crate::field::{Field, TypedValue, Values};
use crate::raw::{RawDocument, RawValue};
use crate::view::{ViewBinding, ViewTemplate};

/// The immutable name→field table of a declared schema.
///
/// Built exactly once per descriptor; ancestor fields come first, own
/// declarations overlay same-named ancestor fields.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: IndexMap<String, Field>,
}

impl FieldRegistry {
    /// Returns the field declared under the attribute name, if any.
    pub fn get(&self, attr: &str) -> Option<&Field> {
        self.fields.get(attr)
    }

    /// Returns `true` if a field is declared under the attribute name.
    pub fn contains(&self, attr: &str) -> bool {
        self.fields.contains_key(attr)
    }

    /// The number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates the declared fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(attr, field)| (attr.as_str(), field))
    }
}

/// A declared schema: a named (or anonymous) handle over a field registry
/// and the view bindings declared alongside it.
///
/// Descriptors replace nominal record types: any typed access goes through a
/// descriptor value, and cloning one is cheap (the registry is shared).
#[derive(Clone, Debug)]
pub struct SchemaDescriptor {
    name: Option<String>,
    registry: Arc<FieldRegistry>,
    views: Arc<IndexMap<String, ViewBinding>>,
}

impl SchemaDescriptor {
    /// Starts declaring a named schema.
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder {
            name: Some(name.into()),
            fields: IndexMap::new(),
            views: IndexMap::new(),
        }
    }

    /// Synthesizes an anonymous descriptor from a table of fields.
    ///
    /// The registry contains exactly the given fields; unnamed fields adopt
    /// their attribute names. This is the inline form for nested schemas that
    /// do not warrant a named declaration.
    pub fn from_fields<S: Into<String>>(
        fields: impl IntoIterator<Item = (S, Field)>,
    ) -> SchemaDescriptor {
        let mut builder = DescriptorBuilder {
            name: None,
            fields: IndexMap::new(),
            views: IndexMap::new(),
        };
        for (attr, field) in fields {
            builder = builder.field(attr, field);
        }
        builder.build()
    }

    /// The schema's name, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The schema's field registry.
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Returns the field declared under the attribute name, if any.
    pub fn field(&self, attr: &str) -> Option<&Field> {
        self.registry.get(attr)
    }

    /// Iterates the view bindings declared on this schema.
    pub fn view_bindings(&self) -> impl Iterator<Item = (&str, &ViewBinding)> {
        self.views.iter().map(|(attr, binding)| (attr.as_str(), binding))
    }

    /// Produces the deferred query template for the view bound under `attr`.
    ///
    /// The template wraps result rows with this descriptor; execution happens
    /// only when the template is invoked with a store handle.
    pub fn view_template(&self, attr: &str) -> Option<ViewTemplate> {
        self.views
            .get(attr)
            .map(|binding| binding.template(self.clone()))
    }
}

/// Builder collecting field and view declarations into a [`SchemaDescriptor`].
///
/// `extends` merges an ancestor's registry first; own declarations made
/// afterwards override same-named inherited entries. The registry is resolved
/// once, at [`DescriptorBuilder::build`].
#[derive(Debug)]
pub struct DescriptorBuilder {
    name: Option<String>,
    fields: IndexMap<String, Field>,
    views: IndexMap<String, ViewBinding>,
}

impl DescriptorBuilder {
    /// Inherits every field and view binding of `parent`.
    ///
    /// Fields declared on this builder afterwards replace inherited
    /// same-named entries.
    pub fn extends(mut self, parent: &SchemaDescriptor) -> DescriptorBuilder {
        for (attr, field) in parent.registry().iter() {
            self.fields.insert(attr.to_string(), field.clone());
        }
        for (attr, binding) in parent.view_bindings() {
            self.views.insert(attr.to_string(), binding.clone());
        }
        self
    }

    /// Declares a field under an attribute name.
    pub fn field(mut self, attr: impl Into<String>, field: Field) -> DescriptorBuilder {
        self.fields.insert(attr.into(), field);
        self
    }

    /// Declares a view binding under an attribute name.
    pub fn view(mut self, attr: impl Into<String>, binding: ViewBinding) -> DescriptorBuilder {
        self.views.insert(attr.into(), binding);
        self
    }

    /// Resolves attribute-name inference and produces the immutable descriptor.
    pub fn build(mut self) -> SchemaDescriptor {
        for (attr, field) in self.fields.iter_mut() {
            field.resolve_name(attr);
        }
        for (attr, binding) in self.views.iter_mut() {
            binding.resolve_name(attr);
        }
        SchemaDescriptor {
            name: self.name,
            registry: Arc::new(FieldRegistry { fields: self.fields }),
            views: Arc::new(self.views),
        }
    }
}

/// A structured record: one descriptor plus one backing raw document.
///
/// Cloning a record clones the handle; both clones keep addressing the same
/// backing document.
#[derive(Clone)]
pub struct Schema {
    descriptor: SchemaDescriptor,
    data: RawDocument,
}

impl Schema {
    /// Wraps a raw document obtained elsewhere.
    ///
    /// The record's backing store *is* `data`: no copy is made and no
    /// defaulting is applied, so raw-level mutations made through the record
    /// are visible to every other holder of the document, and vice versa.
    pub fn wrap(descriptor: &SchemaDescriptor, data: RawDocument) -> Schema {
        Schema {
            descriptor: descriptor.clone(),
            data,
        }
    }

    /// Constructs a fresh record over an empty backing document.
    ///
    /// For each declared field: a matching entry in `values` is applied
    /// through the typed setter (converting and persisting it); otherwise the
    /// typed getter runs once so a configured default is materialized, but
    /// its result is not written back; unsupplied fields stay absent from
    /// the backing document until explicitly set. Entries in `values` that
    /// match no declared field are ignored.
    pub fn construct(descriptor: &SchemaDescriptor, values: Values) -> MappingResult<Schema> {
        let (schema, _) = Schema::construct_partial(descriptor, values)?;
        Ok(schema)
    }

    /// Like [`Schema::construct`], but hands back the unconsumed entries of
    /// `values` so a specializing constructor can claim its own keywords
    /// (e.g. a document's identity).
    pub fn construct_partial(
        descriptor: &SchemaDescriptor,
        mut values: Values,
    ) -> MappingResult<(Schema, Values)> {
        let schema = Schema::wrap(descriptor, RawDocument::new());
        for (attr, field) in descriptor.registry().iter() {
            match values.remove(attr) {
                Some(value) => field.set(&schema.data, Some(value))?,
                None => {
                    field.get(&schema.data)?;
                }
            }
        }
        Ok((schema, values))
    }

    /// The record's descriptor.
    pub fn descriptor(&self) -> &SchemaDescriptor {
        &self.descriptor
    }

    /// Rebinds the record onto a different backing document. Holders of the
    /// previous document keep the tree they already alias.
    pub(crate) fn replace_data(&mut self, data: RawDocument) {
        self.data = data;
    }

    /// Hands back the live backing document (aliased, not a copy).
    pub fn unwrap(&self) -> RawDocument {
        self.data.clone()
    }

    /// Reads a declared attribute through its field converter.
    ///
    /// Returns `Ok(None)` when the attribute is unset and has no default.
    ///
    /// # Errors
    ///
    /// [`MappingError::UnknownField`] for undeclared attributes;
    /// [`MappingError::MalformedLiteral`] when the stored raw value cannot be
    /// parsed per the field's kind.
    pub fn get(&self, attr: &str) -> MappingResult<Option<TypedValue>> {
        self.field_for(attr)?.get(&self.data)
    }

    /// Converts and writes a declared attribute through its field converter.
    pub fn set(&self, attr: &str, value: impl Into<TypedValue>) -> MappingResult<()> {
        self.field_for(attr)?.set(&self.data, Some(value.into()))
    }

    /// Stores a raw null under a declared attribute, bypassing conversion.
    pub fn set_null(&self, attr: &str) -> MappingResult<()> {
        self.field_for(attr)?.set(&self.data, None)
    }

    fn field_for(&self, attr: &str) -> MappingResult<&Field> {
        self.descriptor
            .field(attr)
            .ok_or_else(|| MappingError::UnknownField(attr.to_string()))
    }

    /// Returns `true` if the backing document holds `key`, declared or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// The number of keys in the backing document.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the backing document is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reads a raw value by key, bypassing field conversion.
    pub fn get_raw(&self, key: &str) -> Option<RawValue> {
        self.data.get(key)
    }

    /// Writes a raw value by key, bypassing field conversion.
    pub fn set_raw(&self, key: impl Into<String>, value: RawValue) -> Option<RawValue> {
        self.data.insert(key, value)
    }

    /// Removes a raw value by key, bypassing field conversion.
    pub fn remove_raw(&self, key: &str) -> Option<RawValue> {
        self.data.remove(key)
    }

    /// The backing document's keys in natural order.
    pub fn keys(&self) -> Vec<String> {
        self.data.keys()
    }

    /// A snapshot of the backing document's entries in natural order.
    pub fn raw_entries(&self) -> Vec<(String, RawValue)> {
        self.data.entries()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.descriptor.name())
            .field("data", &format_args!("{}", self.data))
            .finish()
    }
}
