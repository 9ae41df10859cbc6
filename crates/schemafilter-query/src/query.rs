//! Query builder and executor.
//!
//! A [`Query`] only accumulates clauses; it is evaluated against a slice of
//! records by the execution methods at the bottom of this file.

use crate::clause::{Clause, ClauseValue};
use crate::error::Result;
use crate::op::Op;
use crate::ordering::{compare_records, Dir, OrderBy};
use crate::record::Record;

/// A narrowing description over a record collection.
///
/// ```text
/// match = (all AND clauses match) ∧ (no NOT clause matches)
/// ```
///
/// # Example
///
/// ```
/// use schemafilter_query::Query;
///
/// let query = Query::new()
///     .and_eq("schema", "restaurant-inspections")
///     .and_contains("locations", 12)
///     .not_eq("is_public", false)
///     .order_desc("item_date")
///     .limit(20);
///
/// assert_eq!(query.and_clauses().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    and_clauses: Vec<Clause>,
    not_clauses: Vec<Clause>,
    orderings: Vec<OrderBy>,
    limit: Option<usize>,
}

impl Query {
    /// Creates a new empty query, which matches every record.
    pub fn new() -> Self {
        Query::default()
    }

    // ========================================================================
    // Clause builders
    // ========================================================================

    /// Adds a clause every record must match.
    pub fn and(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.and_clauses.push(Clause::new(field, op, value));
        self
    }

    /// Adds a clause no record may match.
    pub fn not(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.not_clauses.push(Clause::new(field, op, value));
        self
    }

    /// Adds a prebuilt clause to the AND group.
    pub fn and_clause(mut self, clause: Clause) -> Self {
        self.and_clauses.push(clause);
        self
    }

    pub fn and_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Eq, value)
    }

    pub fn and_gte(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Gte, value)
    }

    pub fn and_lt(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Lt, value)
    }

    pub fn and_lte(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Lte, value)
    }

    /// Adds a list-membership clause: the record's id list contains `id`.
    pub fn and_contains(self, field: &str, id: i64) -> Self {
        self.and(field, Op::Contains, id)
    }

    /// Adds an id-set clause.
    pub fn and_in<I>(self, field: &str, ids: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let set: Vec<i64> = ids.into_iter().collect();
        self.and(field, Op::In, set)
    }

    /// Adds a null check.
    pub fn and_is_none(self, field: &str) -> Self {
        self.and(field, Op::IsNone, ClauseValue::None)
    }

    /// Adds a case-insensitive text search clause.
    ///
    /// Returns an error if the text is blank.
    pub fn and_icontains(self, field: &str, text: &str) -> Result<Self> {
        let clause = Clause::icontains(field, text)?;
        Ok(self.and_clause(clause))
    }

    pub fn not_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.not(field, Op::Eq, value)
    }

    // ========================================================================
    // Ordering and limits
    // ========================================================================

    pub fn order_by(mut self, field: &str, dir: Dir) -> Self {
        self.orderings.push(OrderBy::new(field, dir));
        self
    }

    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(field, Dir::Asc)
    }

    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(field, Dir::Desc)
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    pub fn and_clauses(&self) -> &[Clause] {
        &self.and_clauses
    }

    pub fn not_clauses(&self) -> &[Clause] {
        &self.not_clauses
    }

    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns `true` if this query has no clauses (matches everything).
    pub fn is_empty(&self) -> bool {
        self.and_clauses.is_empty() && self.not_clauses.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single record matches this query.
    pub fn matches<T: Record>(&self, item: &T) -> bool {
        let and_pass = self
            .and_clauses
            .iter()
            .all(|clause| clause.matches(&item.field_value(&clause.field)));

        and_pass
            && self
                .not_clauses
                .iter()
                .all(|clause| !clause.matches(&item.field_value(&clause.field)))
    }

    /// Filters a slice, returning references to matching records.
    ///
    /// Results are sorted by the query's orderings (stable, so input order
    /// breaks ties), then truncated to the limit.
    pub fn filter<'a, T: Record>(&self, items: &'a [T]) -> Vec<&'a T> {
        let mut results: Vec<&'a T> = items.iter().filter(|item| self.matches(*item)).collect();

        if !self.orderings.is_empty() {
            results.sort_by(|a, b| compare_records(*a, *b, &self.orderings));
        }

        if let Some(limit) = self.limit {
            results.truncate(limit);
        }

        results
    }

    /// Filters and clones matching records.
    pub fn filter_cloned<T: Record + Clone>(&self, items: &[T]) -> Vec<T> {
        self.filter(items).into_iter().cloned().collect()
    }

    /// Counts matching records, ignoring the limit.
    pub fn count<T: Record>(&self, items: &[T]) -> usize {
        items.iter().filter(|item| self.matches(*item)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Timestamp, Value};

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        title: String,
        day: i64,
        lookup: Option<i64>,
        flag: Option<bool>,
        locations: Vec<i64>,
    }

    impl Record for Item {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "title" => Value::String(&self.title),
                "item_date" => Value::Timestamp(Timestamp(self.day)),
                "kind" => self.lookup.map(Value::Number).unwrap_or(Value::None),
                "flag" => Value::from(self.flag),
                "locations" => Value::List(&self.locations),
                _ => Value::None,
            }
        }
    }

    fn item(title: &str, day: i64, lookup: Option<i64>, flag: Option<bool>, locs: &[i64]) -> Item {
        Item {
            title: title.to_string(),
            day,
            lookup,
            flag,
            locations: locs.to_vec(),
        }
    }

    fn sample() -> Vec<Item> {
        vec![
            item("Burst water main", 1, Some(1), Some(true), &[10]),
            item("Rodent complaint", 2, Some(2), Some(false), &[10, 20]),
            item("Noise complaint", 3, None, None, &[20]),
            item("Graffiti removal", 4, Some(1), Some(true), &[]),
        ]
    }

    #[test]
    fn empty_query_matches_all() {
        let items = sample();
        assert_eq!(Query::new().filter(&items).len(), 4);
        assert!(Query::new().is_empty());
    }

    #[test]
    fn half_open_range() {
        let items = sample();
        let query = Query::new()
            .and_gte("item_date", Timestamp(2))
            .and_lt("item_date", Timestamp(3));
        let results = query.filter(&items);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Rodent complaint");
    }

    #[test]
    fn attribute_equality_and_null() {
        let items = sample();
        assert_eq!(Query::new().and_eq("kind", 1i64).count(&items), 2);
        assert_eq!(Query::new().and_is_none("flag").count(&items), 1);
        assert_eq!(Query::new().and_eq("flag", false).count(&items), 1);
    }

    #[test]
    fn text_search() {
        let items = sample();
        let query = Query::new().and_icontains("title", "complaint").unwrap();
        assert_eq!(query.count(&items), 2);
    }

    #[test]
    fn location_membership() {
        let items = sample();
        assert_eq!(Query::new().and_contains("locations", 20).count(&items), 2);
        assert_eq!(Query::new().and_in("locations", [10, 99]).count(&items), 2);
    }

    #[test]
    fn not_clause_excludes() {
        let items = sample();
        let results = Query::new().not_eq("flag", true).filter(&items);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|i| i.flag != Some(true)));
    }

    #[test]
    fn ordering_and_limit() {
        let items = sample();
        let results = Query::new().order_desc("item_date").limit(2).filter(&items);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Graffiti removal");
        assert_eq!(results[1].title, "Noise complaint");
    }

    #[test]
    fn count_ignores_limit() {
        let items = sample();
        assert_eq!(Query::new().limit(1).count(&items), 4);
    }

    #[test]
    fn filter_cloned() {
        let items = sample();
        let results: Vec<Item> = Query::new().and_eq("kind", 2i64).filter_cloned(&items);
        assert_eq!(results, vec![items[1].clone()]);
    }
}
