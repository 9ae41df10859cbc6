//! The narrowing operations filters need from a record collection.

use chrono::NaiveDate;
use schemafilter_query::{Query, Timestamp};

use crate::error::Result;
use crate::schema::SchemaField;

/// Which date of a news item a date-range filter constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    /// When the event happened.
    ItemDate,
    /// When the item was published.
    PubDate,
}

impl DateField {
    /// Record field holding the date.
    pub fn column(self) -> &'static str {
        match self {
            DateField::ItemDate => "item_date",
            DateField::PubDate => "pub_date",
        }
    }

    pub fn arg_name(self) -> &'static str {
        match self {
            DateField::ItemDate => "by-date",
            DateField::PubDate => "by-pub-date",
        }
    }
}

/// Value an attribute filter constrains a field to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeValue {
    /// Id of a lookup value.
    Lookup(i64),
    /// `None` selects items where the attribute is unknown.
    Bool(Option<bool>),
}

/// A record collection that filters narrow step by step.
///
/// Each method consumes the queryable and returns the narrowed one, so
/// implementations are free to be lazy (build up a query) or eager.
pub trait Queryable: Sized {
    /// Keeps items whose `field` date lies in `[start, end)`.
    fn date_range(self, field: DateField, start: NaiveDate, end: NaiveDate) -> Self;

    fn by_attribute(self, field: &SchemaField, value: AttributeValue) -> Self;

    fn text_search(self, field: &SchemaField, text: &str) -> Result<Self>;
}

impl Queryable for Query {
    fn date_range(self, field: DateField, start: NaiveDate, end: NaiveDate) -> Self {
        self.and_gte(field.column(), Timestamp::from_date(start))
            .and_lt(field.column(), Timestamp::from_date(end))
    }

    fn by_attribute(self, field: &SchemaField, value: AttributeValue) -> Self {
        match value {
            AttributeValue::Lookup(id) => self.and_eq(&field.name, id),
            AttributeValue::Bool(Some(b)) => self.and_eq(&field.name, b),
            AttributeValue::Bool(None) => self.and_is_none(&field.name),
        }
    }

    fn text_search(self, field: &SchemaField, text: &str) -> Result<Self> {
        Ok(self.and_icontains(&field.name, text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;
    use schemafilter_query::{Op, Record, Value};

    struct Item {
        date: NaiveDate,
        permit: Option<bool>,
    }

    impl Record for Item {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "item_date" => Value::Timestamp(Timestamp::from_date(self.date)),
                "permit" => Value::from(self.permit),
                _ => Value::None,
            }
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn date_range_is_half_open() {
        let query = Query::new().date_range(DateField::ItemDate, date(1), date(2));
        let clauses = query.and_clauses();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].op, Op::Gte);
        assert_eq!(clauses[1].op, Op::Lt);

        let items = [
            Item { date: date(1), permit: None },
            Item { date: date(2), permit: None },
        ];
        assert_eq!(query.count(&items), 1);
    }

    #[test]
    fn unknown_bool_selects_nulls() {
        let field = SchemaField::new(1, "permit", "permit", "permit", "permits", FieldKind::Bool);
        let items = [
            Item { date: date(1), permit: Some(true) },
            Item { date: date(1), permit: None },
        ];
        let query = Query::new().by_attribute(&field, AttributeValue::Bool(None));
        assert_eq!(query.count(&items), 1);
        let query = Query::new().by_attribute(&field, AttributeValue::Bool(Some(true)));
        assert_eq!(query.count(&items), 1);
    }

    #[test]
    fn blank_text_search_fails() {
        let field = SchemaField::new(2, "notes", "notes", "notes", "notes", FieldKind::Text);
        assert!(Query::new().text_search(&field, " ").is_err());
    }
}
