//! Comparison operators for query clauses.

use std::cmp::Ordering;

/// Comparison operator for a query clause.
///
/// Not every operator is meaningful for every value type; a clause whose
/// operator does not apply to the field's runtime value simply does not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Equal. Valid for all types.
    Eq,
    /// Not equal. Valid for all types.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Substring match on strings, membership on lists.
    Contains,
    /// Case-insensitive substring match.
    IContains,
    /// Number is one of the given set (or a list shares a member with it).
    In,
    /// Field is absent or null.
    IsNone,
}

impl Op {
    /// Evaluates a comparison given an ordering result.
    ///
    /// Only the equality and range operators are ordering-based; everything
    /// else evaluates to `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Contains => "contains",
            Op::IContains => "icontains",
            Op::In => "in",
            Op::IsNone => "isnone",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
