//! Schema and attribute-field metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A news-item type (e.g. restaurant inspections, crime reports).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub slug: String,
    pub name: String,
    /// Human name of the item date, e.g. "inspection date".
    pub date_name: String,
}

impl Schema {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, date_name: impl Into<String>) -> Self {
        Schema {
            slug: slug.into(),
            name: name.into(),
            date_name: date_name.into(),
        }
    }
}

/// How an attribute field is filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Values are ids into a lookup table.
    Lookup,
    /// Yes / no / unknown.
    Bool,
    /// Free text, filtered by search.
    Text,
}

/// An attribute field of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub id: i64,
    /// Record field name; also the chain key for lookup and text filters.
    pub name: String,
    /// URL slug, as in `by-<slug>`.
    pub slug: String,
    pub pretty_name: String,
    pub pretty_name_plural: String,
    pub kind: FieldKind,
}

impl SchemaField {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        slug: impl Into<String>,
        pretty_name: impl Into<String>,
        pretty_name_plural: impl Into<String>,
        kind: FieldKind,
    ) -> Self {
        SchemaField {
            id,
            name: name.into(),
            slug: slug.into(),
            pretty_name: pretty_name.into(),
            pretty_name_plural: pretty_name_plural.into(),
            kind,
        }
    }

    pub fn is_lookup(&self) -> bool {
        self.kind == FieldKind::Lookup
    }

    pub fn is_bool(&self) -> bool {
        self.kind == FieldKind::Bool
    }

    /// The argument name this field is filtered under.
    pub fn arg_name(&self) -> String {
        format!("by-{}", self.slug)
    }
}

/// One value of a lookup field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lookup {
    pub id: i64,
    pub field_id: i64,
    pub slug: String,
    pub name: String,
}

/// Filterable fields of a schema, keyed by slug.
///
/// The registry is read-only during parsing; the dispatcher tracks which
/// fields it has already used, so one registry can serve many requests.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: BTreeMap<String, SchemaField>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: impl IntoIterator<Item = SchemaField>) -> Self {
        let mut registry = Self::new();
        for field in fields {
            registry.insert(field);
        }
        registry
    }

    /// Adds a field, replacing any field with the same slug.
    pub fn insert(&mut self, field: SchemaField) {
        self.fields.insert(field.slug.clone(), field);
    }

    pub fn get(&self, slug: &str) -> Option<&SchemaField> {
        self.fields.get(slug)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.values()
    }
}
