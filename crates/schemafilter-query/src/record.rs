//! The accessor trait records implement to be queryable.

use crate::value::Value;

/// A record whose fields can be compared by a [`Query`](crate::Query).
///
/// ```
/// use schemafilter_query::{Record, Value};
///
/// struct Item {
///     title: String,
///     location_ids: Vec<i64>,
/// }
///
/// impl Record for Item {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "title" => Value::String(&self.title),
///             "locations" => Value::List(&self.location_ids),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of `field`, or [`Value::None`] when the record has
    /// no such field or it is null.
    fn field_value(&self, field: &str) -> Value<'_>;
}

impl<T: Record + ?Sized> Record for &T {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}
