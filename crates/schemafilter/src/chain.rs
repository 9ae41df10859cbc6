//! Ordered, uniquely-keyed filter collections.

use crate::catalog::Catalog;
use crate::context::SharedContext;
use crate::dispatch::Dispatcher;
use crate::error::{FilterError, Result};
use crate::filter::{Filter, MoreInput, SchemaFilter};
use crate::parse::parse_spec;
use crate::place::PlaceResolver;
use crate::queryable::Queryable;
use crate::schema::{FieldRegistry, Lookup};
use crate::settings::FilterRequest;

/// Key an incomplete attribute filter moves to when it prompts for input.
const PROMPT_KEY: &str = "lookup";

/// An ordered mapping from key to [`Filter`].
///
/// Keys are unique: inserting under an occupied key fails with
/// [`FilterError::DuplicateFilter`] and leaves the chain unchanged.
/// Iteration follows insertion order until [`normalized`](Self::normalized)
/// produces a reordered copy.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<(String, Filter)>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an encoded specification into a chain.
    ///
    /// Fails on the first malformed segment, unknown argument, invalid
    /// value, or key collision; no partial chain is returned.
    pub fn from_spec(
        request: &FilterRequest<'_>,
        spec: &str,
        fields: &FieldRegistry,
        catalog: &dyn Catalog,
    ) -> Result<Self> {
        let args = parse_spec(spec)?;
        let mut dispatcher = Dispatcher::new(*request, fields, catalog);
        let mut chain = FilterChain::new();
        for arg in &args {
            let filter = dispatcher.dispatch(arg)?;
            chain.push(filter)?;
        }
        tracing::debug!(filters = chain.len(), "parsed filter chain");
        Ok(chain)
    }

    /// Inserts `filter` under `key`.
    pub fn insert(&mut self, key: impl Into<String>, filter: impl Into<Filter>) -> Result<()> {
        let key = key.into();
        if self.contains_key(&key) {
            tracing::warn!(key = %key, "duplicate filter");
            return Err(FilterError::DuplicateFilter { key });
        }
        self.filters.push((key, filter.into()));
        Ok(())
    }

    /// Inserts `filter` under its own key.
    pub fn push(&mut self, filter: impl Into<Filter>) -> Result<()> {
        let filter = filter.into();
        let key = filter.key().to_string();
        self.insert(key, filter)
    }

    pub fn get(&self, key: &str) -> Option<&Filter> {
        self.filters.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    pub fn remove(&mut self, key: &str) -> Option<Filter> {
        let index = self.filters.iter().position(|(k, _)| k == key)?;
        Some(self.filters.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.filters.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Filter)> {
        self.filters.iter().map(|(k, f)| (k.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the prompt of the first incomplete filter, if any.
    ///
    /// Only the first incomplete filter is reported. When it is an
    /// attribute filter (`by-<slug>`) it is moved to the end of the chain
    /// under the `lookup` key, where prompt rendering expects it, unless
    /// another filter already holds that key.
    pub fn validate(&mut self, catalog: &dyn Catalog) -> Result<Option<MoreInput>> {
        for index in 0..self.filters.len() {
            let (key, filter) = &self.filters[index];
            let Some(more) = filter.validate(catalog)? else {
                continue;
            };
            tracing::info!(key = %key, arg = %more.resubmit_arg_name, "filter needs more input");
            if filter.arg_name().starts_with("by-")
                && key != PROMPT_KEY
                && !self.contains_key(PROMPT_KEY)
            {
                let (_, filter) = self.filters.remove(index);
                self.filters.push((PROMPT_KEY.to_string(), filter));
            }
            return Ok(Some(more));
        }
        Ok(None)
    }

    /// A copy of the chain ordered by ascending sort weight.
    ///
    /// The sort is stable, so equal weights keep their relative order and
    /// any permutation of the same filters normalizes to the same order
    /// as long as their weights differ.
    pub fn normalized(&self) -> FilterChain {
        let mut filters = self.filters.clone();
        filters.sort_by(|(_, a), (_, b)| a.sort_weight().total_cmp(&b.sort_weight()));
        FilterChain { filters }
    }

    /// Applies every filter in chain order, threading the queryable through.
    ///
    /// Filters update their descriptions as they resolve, so call this on
    /// the chain whose descriptions you intend to display.
    pub fn apply<Q, R>(
        &mut self,
        request: &FilterRequest<'_>,
        queryable: Q,
        context: &mut SharedContext,
        places: &R,
    ) -> Result<Q>
    where
        Q: Queryable,
        R: PlaceResolver<Q> + ?Sized,
    {
        let mut queryable = queryable;
        for (key, filter) in &mut self.filters {
            tracing::debug!(key = %key, "applying filter");
            queryable = filter.apply(request, queryable, context, places)?;
        }
        Ok(queryable)
    }

    /// A copy of the chain without the filter under `key`.
    ///
    /// Used to build "remove this filter" links.
    pub fn without(&self, key: &str) -> FilterChain {
        FilterChain {
            filters: self
                .filters
                .iter()
                .filter(|(k, _)| k != key)
                .cloned()
                .collect(),
        }
    }

    /// Re-encodes the chain as a specification string.
    ///
    /// Filters without a known URL (incomplete ones) are left out.
    pub fn to_spec(&self) -> String {
        self.filters
            .iter()
            .filter_map(|(_, f)| f.url())
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Resolved lookup values of the chain's lookup filters, in order.
    pub fn lookup_descriptions(&self) -> Vec<&Lookup> {
        self.filters.iter().filter_map(|(_, f)| f.lookup()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::filter::{BoolFilter, TextSearchFilter};
    use crate::place::NoPlaces;
    use crate::schema::{FieldKind, Schema, SchemaField};
    use crate::settings::FilterSettings;
    use schemafilter_query::Query;

    fn fields() -> FieldRegistry {
        FieldRegistry::from_fields([
            SchemaField::new(1, "cuisine", "cuisine", "cuisine", "cuisines", FieldKind::Lookup),
            SchemaField::new(2, "permit", "permit", "permit", "have permits", FieldKind::Bool),
            SchemaField::new(3, "notes", "notes", "notes", "notes", FieldKind::Text),
        ])
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new(
            vec![Lookup {
                id: 10,
                field_id: 1,
                slug: "thai".into(),
                name: "Thai".into(),
            }],
            vec![],
        )
    }

    fn parse(spec: &str) -> Result<FilterChain> {
        let schema = Schema::new("inspections", "Inspections", "inspection date");
        let settings = FilterSettings::default();
        let request = FilterRequest::new(&schema, &settings);
        FilterChain::from_spec(&request, spec, &fields(), &catalog())
    }

    #[test]
    fn keeps_insertion_order() {
        let chain = parse("by-notes=rats;by-cuisine=thai;by-date=2024-01-01,2024-01-31").unwrap();
        assert_eq!(chain.keys().collect::<Vec<_>>(), ["notes", "cuisine", "date"]);
    }

    #[test]
    fn insert_rejects_occupied_key() {
        let mut chain = parse("by-notes=rats").unwrap();
        let notes = fields().get("notes").cloned().unwrap();
        let filter = TextSearchFilter::new(notes, &["mice".to_string()]).unwrap();
        let err = chain.insert("notes", filter).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.get("notes").unwrap().value(), "rats");
    }

    #[test]
    fn dates_collide() {
        let err = parse("by-date=2024-01-01,2024-01-31;by-pub-date=2024-01-01,2024-01-31")
            .unwrap_err();
        assert!(matches!(err, FilterError::DuplicateFilter { key } if key == "date"));
    }

    #[test]
    fn normalized_orders_by_weight() {
        let chain =
            parse("by-notes=rats;by-cuisine=thai;by-permit=yes;by-date=2024-01-01,2024-01-31")
                .unwrap();
        let normalized = chain.normalized();
        assert_eq!(
            normalized.keys().collect::<Vec<_>>(),
            ["date", "lookup", "cuisine", "notes"]
        );
        // The source chain is untouched.
        assert_eq!(chain.keys().next(), Some("notes"));
    }

    #[test]
    fn validate_reports_first_incomplete_and_rekeys_it() {
        let mut chain = parse("by-cuisine=;by-date=;by-notes=rats").unwrap();
        let more = chain.validate(&catalog()).unwrap().unwrap();
        assert_eq!(more.resubmit_arg_name, "by-cuisine");
        assert_eq!(chain.keys().collect::<Vec<_>>(), ["date", "notes", "lookup"]);
    }

    #[test]
    fn validate_keeps_bool_in_place() {
        let mut chain = parse("by-permit=;by-notes=rats").unwrap();
        let more = chain.validate(&catalog()).unwrap().unwrap();
        assert_eq!(more.required_field_slug, "permit");
        assert_eq!(chain.keys().collect::<Vec<_>>(), ["lookup", "notes"]);
    }

    #[test]
    fn validate_keeps_key_when_bool_holds_lookup() {
        let mut chain = parse("by-permit=yes;by-cuisine=").unwrap();
        let more = chain.validate(&catalog()).unwrap().unwrap();
        assert_eq!(more.resubmit_arg_name, "by-cuisine");
        assert_eq!(more.candidates.as_ref().map(Vec::len), Some(1));
        assert_eq!(chain.keys().collect::<Vec<_>>(), ["lookup", "cuisine"]);
    }

    #[test]
    fn validate_complete_chain() {
        let mut chain = parse("by-cuisine=thai;by-date=2024-01-01,2024-01-31").unwrap();
        assert!(chain.validate(&catalog()).unwrap().is_none());
        assert_eq!(chain.keys().collect::<Vec<_>>(), ["cuisine", "date"]);
    }

    #[test]
    fn apply_threads_queryable() {
        let schema = Schema::new("inspections", "Inspections", "inspection date");
        let settings = FilterSettings::default();
        let request = FilterRequest::new(&schema, &settings);
        let mut chain = parse("by-cuisine=thai;by-permit=no").unwrap();
        let query = chain
            .apply(&request, Query::new(), &mut SharedContext::new(), &NoPlaces)
            .unwrap();
        assert_eq!(query.and_clauses().len(), 2);
    }

    #[test]
    fn apply_stops_at_incomplete_filter() {
        let schema = Schema::new("inspections", "Inspections", "inspection date");
        let settings = FilterSettings::default();
        let request = FilterRequest::new(&schema, &settings);
        let mut chain = parse("by-date=").unwrap();
        let err = chain
            .apply(&request, Query::new(), &mut SharedContext::new(), &NoPlaces)
            .unwrap_err();
        assert!(matches!(err, FilterError::Incomplete { .. }));
    }

    #[test]
    fn to_spec_and_without() {
        let chain = parse("by-cuisine=thai;by-date=2024-01-01,2024-01-31;by-permit=").unwrap();
        assert_eq!(chain.to_spec(), "by-cuisine=thai;by-date=2024-01-01,2024-01-31");
        assert_eq!(chain.without("cuisine").to_spec(), "by-date=2024-01-01,2024-01-31");
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn lookup_descriptions_lists_resolved_lookups() {
        let chain = parse("by-cuisine=thai;by-notes=rats").unwrap();
        let names: Vec<&str> = chain
            .lookup_descriptions()
            .into_iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names, ["Thai"]);
    }

    #[test]
    fn push_uses_filter_key() {
        let mut chain = FilterChain::new();
        let permit = fields().get("permit").cloned().unwrap();
        chain.push(BoolFilter::new(permit, &[]).unwrap()).unwrap();
        assert!(chain.contains_key("lookup"));
        assert!(chain.remove("lookup").is_some());
        assert!(chain.is_empty());
    }
}
