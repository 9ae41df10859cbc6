//! Mapping argument names to filter variants.

use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::error::{FilterError, Result};
use crate::filter::{
    BlockFilter, BoolFilter, DateRangeFilter, Filter, LocationFilter, LookupFilter,
    TextSearchFilter,
};
use crate::parse::FilterArg;
use crate::queryable::DateField;
use crate::schema::{FieldKind, FieldRegistry};
use crate::settings::FilterRequest;

/// Builds filters from parsed arguments for one request.
///
/// Argument names are matched in this order:
///
/// 1. `by-date` and `by-pub-date`: [`DateRangeFilter`]
/// 2. `by-<slug>`: the attribute filter matching the field's kind
/// 3. names starting with `streets`: [`BlockFilter`]
/// 4. names starting with `locations`: [`LocationFilter`]
///
/// Each schema field may be filtered once per dispatcher. A second
/// `by-<slug>` for the same field fails with
/// [`FilterError::FieldAlreadyFiltered`], which is distinct from
/// [`FilterError::UnknownField`].
pub struct Dispatcher<'a> {
    request: FilterRequest<'a>,
    fields: &'a FieldRegistry,
    catalog: &'a dyn Catalog,
    claimed: HashSet<String>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        request: FilterRequest<'a>,
        fields: &'a FieldRegistry,
        catalog: &'a dyn Catalog,
    ) -> Self {
        Dispatcher {
            request,
            fields,
            catalog,
            claimed: HashSet::new(),
        }
    }

    /// Builds the filter named by `arg`.
    pub fn dispatch(&mut self, arg: &FilterArg) -> Result<Filter> {
        let name = arg.name.as_str();
        let values = arg.values.as_slice();
        tracing::debug!(arg = name, values = values.len(), "dispatching filter argument");

        if name == DateField::ItemDate.arg_name() {
            return Ok(DateRangeFilter::new(&self.request, DateField::ItemDate, values)?.into());
        }
        if name == DateField::PubDate.arg_name() {
            return Ok(DateRangeFilter::new(&self.request, DateField::PubDate, values)?.into());
        }
        if let Some(slug) = name.strip_prefix("by-") {
            return self.dispatch_attribute(slug, values);
        }
        if name.starts_with("streets") {
            return Ok(BlockFilter::new(&self.request, values)?.into());
        }
        if name.starts_with("locations") {
            return Ok(LocationFilter::new(values)?.into());
        }
        Err(FilterError::InvalidFilterType {
            arg: name.to_string(),
        })
    }

    fn dispatch_attribute(&mut self, slug: &str, values: &[String]) -> Result<Filter> {
        let field = self
            .fields
            .get(slug)
            .ok_or_else(|| FilterError::UnknownField {
                slug: slug.to_string(),
            })?;
        if !self.claimed.insert(field.slug.clone()) {
            return Err(FilterError::FieldAlreadyFiltered {
                slug: slug.to_string(),
            });
        }
        let field = field.clone();
        Ok(match field.kind {
            FieldKind::Lookup => LookupFilter::new(field, values, self.catalog)?.into(),
            FieldKind::Bool => BoolFilter::new(field, values)?.into(),
            FieldKind::Text => TextSearchFilter::new(field, values)?.into(),
        })
    }

    /// Whether a `by-<slug>` argument has already been dispatched.
    pub fn is_claimed(&self, slug: &str) -> bool {
        self.claimed.contains(slug)
    }
}
