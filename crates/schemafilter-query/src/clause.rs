//! Clause types for query predicates.
//!
//! A [`Clause`] is a single narrowing predicate: a field name, an operator
//! and an owned comparison value.

use regex::{Regex, RegexBuilder};

use crate::error::{QueryError, Result};
use crate::op::Op;
use crate::value::{Timestamp, Value};

/// A single filter predicate.
///
/// ```
/// use schemafilter_query::{Clause, Op, Value};
///
/// let clause = Clause::new("block_number", Op::Gte, 100i64);
/// assert!(clause.matches(&Value::Number(150)));
/// assert!(!clause.matches(&Value::Number(99)));
/// ```
#[derive(Debug, Clone)]
pub struct Clause {
    /// The field name to compare.
    pub field: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: ClauseValue,
}

impl Clause {
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        Clause {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Builds a case-insensitive substring clause.
    ///
    /// The text is matched literally; regex metacharacters in user input are
    /// escaped before compiling.
    pub fn icontains(field: impl Into<String>, text: &str) -> Result<Self> {
        let field = field.into();
        let text = text.trim();
        if text.is_empty() {
            return Err(QueryError::EmptySearch { field });
        }
        let pattern = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()?;
        Ok(Clause {
            field,
            op: Op::IContains,
            value: ClauseValue::Pattern(pattern),
        })
    }

    /// Evaluates this clause against a field value.
    ///
    /// Type mismatches never match.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        if self.op == Op::IsNone {
            return field_value.is_none();
        }

        match (&self.value, field_value) {
            (ClauseValue::String(pattern), Value::String(s)) => match self.op {
                Op::Eq => *s == pattern.as_str(),
                Op::Ne => *s != pattern.as_str(),
                Op::Contains => s.contains(pattern.as_str()),
                _ => false,
            },

            (ClauseValue::Pattern(regex), Value::String(s)) => regex.is_match(s),

            (ClauseValue::Number(n), Value::Number(field)) => {
                self.op.eval_ordering(field.cmp(n))
            }

            (ClauseValue::Number(n), Value::List(ids)) => {
                self.op == Op::Contains && ids.contains(n)
            }

            (ClauseValue::NumberSet(set), Value::Number(field)) => {
                self.op == Op::In && set.contains(field)
            }

            (ClauseValue::NumberSet(set), Value::List(ids)) => {
                self.op == Op::In && ids.iter().any(|id| set.contains(id))
            }

            (ClauseValue::Timestamp(ts), Value::Timestamp(field)) => {
                self.op.eval_ordering(field.cmp(ts))
            }

            (ClauseValue::Bool(b), Value::Bool(field)) => match self.op {
                Op::Eq => field == b,
                Op::Ne => field != b,
                _ => false,
            },

            // A missing field never satisfies a positive assertion
            (_, Value::None) => false,

            _ => false,
        }
    }
}

/// Owned value stored in a clause.
#[derive(Debug, Clone)]
pub enum ClauseValue {
    String(String),
    /// Compiled case-insensitive pattern (for `IContains`).
    Pattern(Regex),
    Number(i64),
    /// Set of ids (for `In`).
    NumberSet(Vec<i64>),
    Timestamp(Timestamp),
    Bool(bool),
    /// Placeholder for `IsNone` clauses.
    None,
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<i64> for ClauseValue {
    fn from(n: i64) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<Vec<i64>> for ClauseValue {
    fn from(set: Vec<i64>) -> Self {
        ClauseValue::NumberSet(set)
    }
}

impl From<Timestamp> for ClauseValue {
    fn from(t: Timestamp) -> Self {
        ClauseValue::Timestamp(t)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_equality() {
        let clause = Clause::new("street", Op::Eq, "main-st");
        assert!(clause.matches(&Value::String("main-st")));
        assert!(!clause.matches(&Value::String("Main-St")));
    }

    #[test]
    fn icontains_ignores_case() {
        let clause = Clause::icontains("violation", "RODENT").unwrap();
        assert!(clause.matches(&Value::String("Evidence of rodents")));
        assert!(!clause.matches(&Value::String("Clean kitchen")));
    }

    #[test]
    fn icontains_escapes_metacharacters() {
        let clause = Clause::icontains("notes", "a+b (c)").unwrap();
        assert!(clause.matches(&Value::String("see A+B (C) here")));
        assert!(!clause.matches(&Value::String("aab c")));
    }

    #[test]
    fn icontains_rejects_blank_text() {
        let err = Clause::icontains("notes", "   ").unwrap_err();
        assert!(matches!(err, QueryError::EmptySearch { .. }));
    }

    #[test]
    fn list_membership() {
        let ids: [i64; 3] = [3, 7, 11];
        assert!(Clause::new("locations", Op::Contains, 7i64).matches(&Value::List(&ids)));
        assert!(!Clause::new("locations", Op::Contains, 8i64).matches(&Value::List(&ids)));
        assert!(Clause::new("locations", Op::In, vec![1i64, 11]).matches(&Value::List(&ids)));
    }

    #[test]
    fn number_set() {
        let clause = Clause::new("lookup", Op::In, vec![1i64, 2]);
        assert!(clause.matches(&Value::Number(2)));
        assert!(!clause.matches(&Value::Number(3)));
    }

    #[test]
    fn is_none_matches_only_missing() {
        let clause = Clause::new("has_permit", Op::IsNone, ClauseValue::None);
        assert!(clause.matches(&Value::None));
        assert!(!clause.matches(&Value::Bool(false)));
    }

    #[test]
    fn missing_field_fails_positive_assertions() {
        assert!(!Clause::new("x", Op::Eq, true).matches(&Value::None));
        assert!(!Clause::new("x", Op::Ne, 1i64).matches(&Value::None));
    }

    #[test]
    fn type_mismatch_never_matches() {
        assert!(!Clause::new("x", Op::Eq, 1i64).matches(&Value::String("1")));
    }
}
