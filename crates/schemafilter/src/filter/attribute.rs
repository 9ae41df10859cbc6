//! Filters on schema attribute fields: lookups, booleans and text search.

use super::{
    require, Candidate, Description, MoreInput, SchemaFilter, BOOL_WEIGHT, LOOKUP_WEIGHT,
    TEXT_WEIGHT,
};
use crate::catalog::Catalog;
use crate::context::SharedContext;
use crate::error::{FilterError, Result};
use crate::place::PlaceResolver;
use crate::queryable::{AttributeValue, Queryable};
use crate::schema::{Lookup, SchemaField};
use crate::settings::FilterRequest;

/// State shared by all attribute filters.
#[derive(Debug, Clone)]
struct AttributeFilter {
    field: SchemaField,
    arg_name: String,
    description: Description,
}

impl AttributeFilter {
    fn new(field: SchemaField) -> Self {
        let arg_name = field.arg_name();
        let description = Description::labelled(field.pretty_name.clone());
        AttributeFilter {
            field,
            arg_name,
            description,
        }
    }

    fn url(&self, value: &str) -> String {
        format!("{}={}", self.arg_name, value)
    }
}

// ============================================================================
// Lookup
// ============================================================================

/// Restricts a lookup field to one of its values.
#[derive(Debug, Clone)]
pub struct LookupFilter {
    attr: AttributeFilter,
    lookup: Option<Lookup>,
}

impl LookupFilter {
    /// Resolves the first argument as a lookup slug. No arguments leaves the
    /// filter incomplete.
    pub fn new(field: SchemaField, args: &[String], catalog: &dyn Catalog) -> Result<Self> {
        let mut attr = AttributeFilter::new(field);
        let lookup = match args.first() {
            None => None,
            Some(slug) => {
                let lookup = catalog.lookup(&attr.field, slug).ok_or_else(|| {
                    FilterError::NoSuchLookup {
                        field: attr.field.slug.clone(),
                        slug: slug.clone(),
                    }
                })?;
                attr.description.set_value(lookup.name.clone());
                attr.description.url = Some(attr.url(&lookup.slug));
                Some(lookup)
            }
        };
        Ok(LookupFilter { attr, lookup })
    }

    pub fn field(&self) -> &SchemaField {
        &self.attr.field
    }

    pub fn lookup(&self) -> Option<&Lookup> {
        self.lookup.as_ref()
    }
}

impl SchemaFilter for LookupFilter {
    fn key(&self) -> &str {
        &self.attr.field.name
    }

    fn arg_name(&self) -> &str {
        &self.attr.arg_name
    }

    fn sort_weight(&self) -> f64 {
        LOOKUP_WEIGHT
    }

    fn is_complete(&self) -> bool {
        self.lookup.is_some()
    }

    fn description(&self) -> &Description {
        &self.attr.description
    }

    fn validate(&self, catalog: &dyn Catalog) -> Result<Option<MoreInput>> {
        if self.is_complete() {
            return Ok(None);
        }
        let mut lookups = catalog.lookups(&self.attr.field);
        if lookups.is_empty() {
            return Err(FilterError::EmptyCandidates {
                slug: self.attr.field.slug.clone(),
            });
        }
        lookups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Some(MoreInput {
            required_field_label: self.attr.field.pretty_name.clone(),
            required_field_slug: self.attr.field.slug.clone(),
            resubmit_arg_name: self.attr.arg_name.clone(),
            candidates: Some(
                lookups
                    .into_iter()
                    .map(|l| Candidate::new(l.slug, l.name))
                    .collect(),
            ),
        }))
    }

    fn apply<Q, R>(
        &mut self,
        _request: &FilterRequest<'_>,
        queryable: Q,
        _context: &mut SharedContext,
        _places: &R,
    ) -> Result<Q>
    where
        Q: Queryable,
        R: PlaceResolver<Q> + ?Sized,
    {
        let lookup = require(self.lookup.as_ref(), &self.attr.arg_name)?;
        Ok(queryable.by_attribute(&self.attr.field, AttributeValue::Lookup(lookup.id)))
    }
}

// ============================================================================
// Boolean
// ============================================================================

/// The three answers a boolean attribute filter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolChoice {
    Yes,
    No,
    /// Attribute not recorded.
    NotApplicable,
}

impl BoolChoice {
    pub const ALL: [BoolChoice; 3] = [BoolChoice::Yes, BoolChoice::No, BoolChoice::NotApplicable];

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "yes" => Some(BoolChoice::Yes),
            "no" => Some(BoolChoice::No),
            "na" => Some(BoolChoice::NotApplicable),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            BoolChoice::Yes => "yes",
            BoolChoice::No => "no",
            BoolChoice::NotApplicable => "na",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BoolChoice::Yes => "Yes",
            BoolChoice::No => "No",
            BoolChoice::NotApplicable => "N/A",
        }
    }

    pub fn as_option(self) -> Option<bool> {
        match self {
            BoolChoice::Yes => Some(true),
            BoolChoice::No => Some(false),
            BoolChoice::NotApplicable => None,
        }
    }
}

/// Restricts a boolean field to yes, no, or unknown.
#[derive(Debug, Clone)]
pub struct BoolFilter {
    attr: AttributeFilter,
    choice: Option<BoolChoice>,
}

impl BoolFilter {
    /// Accepts zero arguments (incomplete) or one of `yes`, `no`, `na`.
    pub fn new(field: SchemaField, args: &[String]) -> Result<Self> {
        let mut attr = AttributeFilter::new(field);
        let choice = match args {
            [] => None,
            [slug] => Some(BoolChoice::from_slug(slug).ok_or_else(|| {
                FilterError::InvalidBoolean {
                    value: slug.clone(),
                }
            })?),
            _ => {
                return Err(FilterError::InvalidBoolean {
                    value: args.join(","),
                })
            }
        };

        match choice {
            Some(choice) => describe_choice(&mut attr, choice),
            None => {
                attr.description.label.clear();
                attr.description.value =
                    format!("By whether they {}", attr.field.pretty_name_plural);
            }
        }

        Ok(BoolFilter { attr, choice })
    }

    pub fn field(&self) -> &SchemaField {
        &self.attr.field
    }

    pub fn choice(&self) -> Option<BoolChoice> {
        self.choice
    }
}

fn describe_choice(attr: &mut AttributeFilter, choice: BoolChoice) {
    let label = attr.field.pretty_name.clone();
    let short = choice.display_name();
    attr.description.value = format!("{}: {}", capitalize(&label), short);
    attr.description.short_value = short.to_string();
    attr.description.label = label;
    attr.description.url = Some(attr.url(choice.slug()));
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl SchemaFilter for BoolFilter {
    fn key(&self) -> &str {
        "lookup"
    }

    fn arg_name(&self) -> &str {
        &self.attr.arg_name
    }

    fn sort_weight(&self) -> f64 {
        BOOL_WEIGHT
    }

    fn is_complete(&self) -> bool {
        self.choice.is_some()
    }

    fn description(&self) -> &Description {
        &self.attr.description
    }

    fn validate(&self, _catalog: &dyn Catalog) -> Result<Option<MoreInput>> {
        if self.is_complete() {
            return Ok(None);
        }
        Ok(Some(MoreInput {
            required_field_label: format!("whether they {}", self.attr.field.pretty_name_plural),
            required_field_slug: self.attr.field.slug.clone(),
            resubmit_arg_name: self.attr.arg_name.clone(),
            candidates: Some(
                BoolChoice::ALL
                    .iter()
                    .map(|c| Candidate::new(c.slug(), c.display_name()))
                    .collect(),
            ),
        }))
    }

    fn apply<Q, R>(
        &mut self,
        _request: &FilterRequest<'_>,
        queryable: Q,
        _context: &mut SharedContext,
        _places: &R,
    ) -> Result<Q>
    where
        Q: Queryable,
        R: PlaceResolver<Q> + ?Sized,
    {
        let choice = *require(self.choice.as_ref(), &self.attr.arg_name)?;
        let queryable =
            queryable.by_attribute(&self.attr.field, AttributeValue::Bool(choice.as_option()));
        describe_choice(&mut self.attr, choice);
        Ok(queryable)
    }
}

// ============================================================================
// Text search
// ============================================================================

/// Searches the text of an attribute field.
///
/// Unlike the other attribute filters this one cannot be incomplete: a
/// search without text is rejected at construction.
#[derive(Debug, Clone)]
pub struct TextSearchFilter {
    attr: AttributeFilter,
    query: String,
}

impl TextSearchFilter {
    /// Joins all arguments with `", "` into the search text.
    pub fn new(field: SchemaField, args: &[String]) -> Result<Self> {
        if args.is_empty() {
            return Err(FilterError::MissingSearchText { field: field.slug });
        }
        let mut attr = AttributeFilter::new(field);
        let query = args.join(", ");
        attr.description.set_value(query.clone());
        attr.description.url = Some(attr.url(&query));
        Ok(TextSearchFilter { attr, query })
    }

    pub fn field(&self) -> &SchemaField {
        &self.attr.field
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl SchemaFilter for TextSearchFilter {
    fn key(&self) -> &str {
        &self.attr.field.name
    }

    fn arg_name(&self) -> &str {
        &self.attr.arg_name
    }

    fn sort_weight(&self) -> f64 {
        TEXT_WEIGHT
    }

    fn is_complete(&self) -> bool {
        true
    }

    fn description(&self) -> &Description {
        &self.attr.description
    }

    fn validate(&self, _catalog: &dyn Catalog) -> Result<Option<MoreInput>> {
        Ok(None)
    }

    fn apply<Q, R>(
        &mut self,
        _request: &FilterRequest<'_>,
        queryable: Q,
        _context: &mut SharedContext,
        _places: &R,
    ) -> Result<Q>
    where
        Q: Queryable,
        R: PlaceResolver<Q> + ?Sized,
    {
        queryable.text_search(&self.attr.field, &self.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::place::NoPlaces;
    use crate::schema::{FieldKind, Schema};
    use crate::settings::FilterSettings;
    use schemafilter_query::{ClauseValue, Op, Query};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn cuisine() -> SchemaField {
        SchemaField::new(1, "cuisine", "cuisine", "cuisine", "cuisines", FieldKind::Lookup)
    }

    fn outdoor() -> SchemaField {
        SchemaField::new(
            2,
            "outdoor_seating",
            "outdoor-seating",
            "outdoor seating",
            "have outdoor seating",
            FieldKind::Bool,
        )
    }

    fn violation() -> SchemaField {
        SchemaField::new(3, "violation", "violation", "violation", "violations", FieldKind::Text)
    }

    fn catalog() -> MemoryCatalog {
        let lookup = |id, slug: &str, name: &str| Lookup {
            id,
            field_id: 1,
            slug: slug.into(),
            name: name.into(),
        };
        MemoryCatalog::new(
            vec![lookup(10, "thai", "Thai"), lookup(11, "bakery", "Bakery")],
            vec![],
        )
    }

    fn apply<F: SchemaFilter>(filter: &mut F) -> Result<Query> {
        let schema = Schema::new("restaurants", "Restaurants", "inspection date");
        let settings = FilterSettings::default();
        let request = FilterRequest::new(&schema, &settings);
        filter.apply(&request, Query::new(), &mut SharedContext::new(), &NoPlaces)
    }

    #[test]
    fn lookup_resolves_slug() {
        let mut filter = LookupFilter::new(cuisine(), &args(&["thai"]), &catalog()).unwrap();
        assert!(filter.is_complete());
        assert_eq!(filter.key(), "cuisine");
        assert_eq!(filter.description().value, "Thai");
        assert_eq!(filter.description().url.as_deref(), Some("by-cuisine=thai"));

        let query = apply(&mut filter).unwrap();
        assert!(matches!(query.and_clauses()[0].value, ClauseValue::Number(10)));
    }

    #[test]
    fn lookup_unknown_slug() {
        let err = LookupFilter::new(cuisine(), &args(&["sushi"]), &catalog()).unwrap_err();
        assert!(matches!(err, FilterError::NoSuchLookup { .. }));
    }

    #[test]
    fn lookup_prompt_lists_values_by_name() {
        let filter = LookupFilter::new(cuisine(), &[], &catalog()).unwrap();
        let more = filter.validate(&catalog()).unwrap().unwrap();
        assert_eq!(more.required_field_label, "cuisine");
        assert_eq!(more.resubmit_arg_name, "by-cuisine");
        assert_eq!(
            more.candidates.unwrap(),
            vec![Candidate::new("bakery", "Bakery"), Candidate::new("thai", "Thai")]
        );
    }

    #[test]
    fn lookup_prompt_without_values_fails() {
        let filter = LookupFilter::new(cuisine(), &[], &catalog()).unwrap();
        let err = filter.validate(&MemoryCatalog::default()).unwrap_err();
        assert!(matches!(err, FilterError::EmptyCandidates { .. }));
    }

    #[test]
    fn bool_yes() {
        let mut filter = BoolFilter::new(outdoor(), &args(&["yes"])).unwrap();
        assert_eq!(filter.key(), "lookup");
        assert_eq!(filter.choice(), Some(BoolChoice::Yes));
        assert_eq!(filter.description().short_value, "Yes");
        assert_eq!(filter.description().value, "Outdoor seating: Yes");

        let query = apply(&mut filter).unwrap();
        assert!(matches!(query.and_clauses()[0].value, ClauseValue::Bool(true)));
        assert_eq!(
            filter.description().url.as_deref(),
            Some("by-outdoor-seating=yes")
        );
    }

    #[test]
    fn bool_na_selects_unknown() {
        let mut filter = BoolFilter::new(outdoor(), &args(&["na"])).unwrap();
        let query = apply(&mut filter).unwrap();
        assert_eq!(query.and_clauses()[0].op, Op::IsNone);
        assert_eq!(filter.description().short_value, "N/A");
    }

    #[test]
    fn bool_rejects_bad_values() {
        assert!(matches!(
            BoolFilter::new(outdoor(), &args(&["maybe"])).unwrap_err(),
            FilterError::InvalidBoolean { .. }
        ));
        assert!(matches!(
            BoolFilter::new(outdoor(), &args(&["yes", "no"])).unwrap_err(),
            FilterError::InvalidBoolean { .. }
        ));
    }

    #[test]
    fn bool_prompt() {
        let filter = BoolFilter::new(outdoor(), &[]).unwrap();
        assert_eq!(filter.description().value, "By whether they have outdoor seating");
        let more = filter.validate(&catalog()).unwrap().unwrap();
        assert_eq!(more.required_field_label, "whether they have outdoor seating");
        assert_eq!(more.required_field_slug, "outdoor-seating");
        assert_eq!(
            more.candidates.unwrap(),
            vec![
                Candidate::new("yes", "Yes"),
                Candidate::new("no", "No"),
                Candidate::new("na", "N/A"),
            ]
        );
    }

    #[test]
    fn text_search_joins_args() {
        let mut filter = TextSearchFilter::new(violation(), &args(&["mice", "roaches"])).unwrap();
        assert_eq!(filter.query(), "mice, roaches");
        assert_eq!(
            filter.description().url.as_deref(),
            Some("by-violation=mice, roaches")
        );
        assert!(filter.validate(&catalog()).unwrap().is_none());
        let query = apply(&mut filter).unwrap();
        assert_eq!(query.and_clauses()[0].op, Op::IContains);
    }

    #[test]
    fn text_search_requires_text() {
        let err = TextSearchFilter::new(violation(), &[]).unwrap_err();
        assert!(matches!(err, FilterError::MissingSearchText { .. }));
    }

    #[test]
    fn capitalize_first_letter_only() {
        assert_eq!(capitalize("outdoor seating"), "Outdoor seating");
        assert_eq!(capitalize(""), "");
    }
}
