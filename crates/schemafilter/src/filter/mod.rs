//! Filter variants.
//!
//! Every variant implements [`SchemaFilter`]; [`Filter`] is the sum type the
//! chain stores, delegating each operation to the wrapped variant.

mod attribute;
mod block;
mod date;
mod location;

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::context::SharedContext;
use crate::error::Result;
use crate::place::{Place, PlaceResolver};
use crate::queryable::Queryable;
use crate::schema::Lookup;
use crate::settings::FilterRequest;

pub use attribute::{BoolChoice, BoolFilter, LookupFilter, TextSearchFilter};
pub use block::{radius_url, BlockFilter, BlockRadius, BlockRange};
pub use date::DateRangeFilter;
pub use location::LocationFilter;

// Lower weights run first in a normalized chain.
pub(crate) const DATE_WEIGHT: f64 = 1.0;
pub(crate) const BOOL_WEIGHT: f64 = 100.0;
pub(crate) const PLACE_WEIGHT: f64 = 200.0;
pub(crate) const LOOKUP_WEIGHT: f64 = 900.0;
pub(crate) const TEXT_WEIGHT: f64 = 1000.0;

/// Human-readable description and canonical re-encoding of a filter.
///
/// Some variants only know their final text after [`SchemaFilter::apply`]
/// has resolved their arguments (booleans, places).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Description {
    pub label: String,
    pub value: String,
    pub short_value: String,
    /// Canonical `name=v1,v2` segment; `None` until known.
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_object: Option<Arc<Place>>,
}

impl Description {
    pub(crate) fn labelled(label: impl Into<String>) -> Self {
        Description {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Sets `value` and `short_value` to the same text.
    pub(crate) fn set_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.short_value = value.clone();
        self.value = value;
    }

    pub(crate) fn set_place(&mut self, place: Arc<Place>) {
        self.location_name = Some(place.name().to_string());
        self.location_object = Some(place);
    }
}

/// One selectable value offered when a filter needs more input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub slug: String,
    pub display_name: String,
}

impl Candidate {
    pub fn new(slug: impl Into<String>, display_name: impl Into<String>) -> Self {
        Candidate {
            slug: slug.into(),
            display_name: display_name.into(),
        }
    }
}

/// Prompt returned by validation when a filter lacks arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoreInput {
    pub required_field_label: String,
    pub required_field_slug: String,
    /// Argument name to resubmit the chosen value under.
    pub resubmit_arg_name: String,
    /// Choices, when the possible values can be enumerated.
    pub candidates: Option<Vec<Candidate>>,
}

/// Behavior shared by all filter variants.
pub trait SchemaFilter {
    /// Chain slot this filter occupies.
    fn key(&self) -> &str;

    /// Argument name the filter was parsed from.
    fn arg_name(&self) -> &str;

    /// Cost heuristic; lower is applied first by a normalized chain.
    fn sort_weight(&self) -> f64;

    /// Whether the parsed arguments were enough to apply the filter.
    fn is_complete(&self) -> bool;

    fn description(&self) -> &Description;

    /// Returns a prompt if the filter needs more input.
    fn validate(&self, catalog: &dyn Catalog) -> Result<Option<MoreInput>>;

    /// Narrows `queryable`, publishing anything it resolves into `context`.
    fn apply<Q, R>(
        &mut self,
        request: &FilterRequest<'_>,
        queryable: Q,
        context: &mut SharedContext,
        places: &R,
    ) -> Result<Q>
    where
        Q: Queryable,
        R: PlaceResolver<Q> + ?Sized;
}

/// A filter of any variant.
#[derive(Debug, Clone)]
pub enum Filter {
    Date(DateRangeFilter),
    Lookup(LookupFilter),
    Bool(BoolFilter),
    TextSearch(TextSearchFilter),
    Location(LocationFilter),
    Block(BlockFilter),
}

macro_rules! delegate {
    ($self:ident, $f:ident => $body:expr) => {
        match $self {
            Filter::Date($f) => $body,
            Filter::Lookup($f) => $body,
            Filter::Bool($f) => $body,
            Filter::TextSearch($f) => $body,
            Filter::Location($f) => $body,
            Filter::Block($f) => $body,
        }
    };
}

impl Filter {
    /// The resolved lookup value, for complete lookup filters.
    pub fn lookup(&self) -> Option<&Lookup> {
        match self {
            Filter::Lookup(f) => f.lookup(),
            _ => None,
        }
    }

    pub fn label(&self) -> &str {
        &self.description().label
    }

    pub fn value(&self) -> &str {
        &self.description().value
    }

    pub fn short_value(&self) -> &str {
        &self.description().short_value
    }

    pub fn url(&self) -> Option<&str> {
        self.description().url.as_deref()
    }

    pub fn location_name(&self) -> Option<&str> {
        self.description().location_name.as_deref()
    }

    pub fn location_object(&self) -> Option<&Arc<Place>> {
        self.description().location_object.as_ref()
    }
}

impl SchemaFilter for Filter {
    fn key(&self) -> &str {
        delegate!(self, f => f.key())
    }

    fn arg_name(&self) -> &str {
        delegate!(self, f => f.arg_name())
    }

    fn sort_weight(&self) -> f64 {
        delegate!(self, f => f.sort_weight())
    }

    fn is_complete(&self) -> bool {
        delegate!(self, f => f.is_complete())
    }

    fn description(&self) -> &Description {
        delegate!(self, f => f.description())
    }

    fn validate(&self, catalog: &dyn Catalog) -> Result<Option<MoreInput>> {
        delegate!(self, f => f.validate(catalog))
    }

    fn apply<Q, R>(
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
        delegate!(self, f => f.apply(request, queryable, context, places))
    }
}

impl From<DateRangeFilter> for Filter {
    fn from(f: DateRangeFilter) -> Self {
        Filter::Date(f)
    }
}

impl From<LookupFilter> for Filter {
    fn from(f: LookupFilter) -> Self {
        Filter::Lookup(f)
    }
}

impl From<BoolFilter> for Filter {
    fn from(f: BoolFilter) -> Self {
        Filter::Bool(f)
    }
}

impl From<TextSearchFilter> for Filter {
    fn from(f: TextSearchFilter) -> Self {
        Filter::TextSearch(f)
    }
}

impl From<LocationFilter> for Filter {
    fn from(f: LocationFilter) -> Self {
        Filter::Location(f)
    }
}

impl From<BlockFilter> for Filter {
    fn from(f: BlockFilter) -> Self {
        Filter::Block(f)
    }
}

/// Fails with [`FilterError::Incomplete`](crate::FilterError::Incomplete)
/// unless `value` is present.
pub(crate) fn require<'a, T>(value: Option<&'a T>, arg_name: &str) -> Result<&'a T> {
    value.ok_or_else(|| crate::FilterError::Incomplete {
        arg: arg_name.to_string(),
    })
}
