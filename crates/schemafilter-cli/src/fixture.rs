//! YAML fixtures: a schema with its fields, lookup values, places and items.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use schemafilter::{Block, FieldRegistry, Location, Lookup, MemoryCatalog, Schema, SchemaField};
use schemafilter_query::{Record, Timestamp, Value};
use serde::{Deserialize, Serialize};

/// Everything the CLI filters over.
///
/// ```yaml
/// schema: { slug: inspections, name: Restaurant inspections, date_name: inspection date }
/// fields:
///   - { id: 1, name: cuisine, slug: cuisine, pretty_name: cuisine,
///       pretty_name_plural: cuisines, kind: lookup }
/// lookups:
///   - { id: 10, field_id: 1, slug: thai, name: Thai }
/// items:
///   - { id: 1, title: Thai Palace, item_date: 2024-03-01, attributes: { cuisine: 10 } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    pub schema: Schema,
    #[serde(default)]
    pub fields: Vec<SchemaField>,
    #[serde(default)]
    pub lookups: Vec<Lookup>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub items: Vec<NewsItem>,
}

impl Fixture {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("invalid fixture")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn field_registry(&self) -> FieldRegistry {
        FieldRegistry::from_fields(self.fields.iter().cloned())
    }

    pub fn catalog(&self) -> MemoryCatalog {
        MemoryCatalog::new(self.lookups.clone(), self.locations.clone())
    }
}

/// An attribute value as written in the fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(i64),
    Text(String),
}

/// One news item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub item_date: NaiveDate,
    /// Defaults to the item date.
    #[serde(default)]
    pub pub_date: Option<NaiveDate>,
    /// Ids of the locations the item falls in.
    #[serde(default)]
    pub location_ids: Vec<i64>,
    /// Ids of the blocks the item is on.
    #[serde(default)]
    pub block_ids: Vec<i64>,
    /// Attribute values by field name. Missing means unknown.
    #[serde(default)]
    pub attributes: BTreeMap<String, FieldValue>,
}

impl Record for NewsItem {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "id" => Value::Number(self.id),
            "title" => Value::String(&self.title),
            "item_date" => Value::Timestamp(Timestamp::from_date(self.item_date)),
            "pub_date" => Value::Timestamp(Timestamp::from_date(
                self.pub_date.unwrap_or(self.item_date),
            )),
            "locations" => Value::List(&self.location_ids),
            "blocks" => Value::List(&self.block_ids),
            name => match self.attributes.get(name) {
                Some(FieldValue::Bool(b)) => Value::Bool(*b),
                Some(FieldValue::Number(n)) => Value::Number(*n),
                Some(FieldValue::Text(s)) => Value::String(s),
                None => Value::None,
            },
        }
    }
}
