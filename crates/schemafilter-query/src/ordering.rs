//! Result ordering.

use std::cmp::Ordering;

use crate::record::Record;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }
}

/// A single ordering clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub dir: Dir,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }
}

/// Compares two values of the same type; `None` sorts last in ascending order.
fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a.cmp(b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::None, Value::None) => Ordering::Equal,
        (Value::None, _) => Ordering::Greater,
        (_, Value::None) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

pub(crate) fn compare_records<T: Record>(a: &T, b: &T, orderings: &[OrderBy]) -> Ordering {
    for order in orderings {
        let ordering = compare_values(&a.field_value(&order.field), &b.field_value(&order.field));
        let ordering = order.dir.apply(ordering);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_sorts_last() {
        assert_eq!(compare_values(&Value::None, &Value::Number(1)), Ordering::Greater);
        assert_eq!(compare_values(&Value::Number(1), &Value::None), Ordering::Less);
    }

    #[test]
    fn desc_reverses() {
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
    }
}
