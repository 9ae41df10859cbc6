//! Named-location filter: neighborhoods, ZIP codes and other place types.

use super::{require, Candidate, Description, MoreInput, SchemaFilter, PLACE_WEIGHT};
use crate::catalog::Catalog;
use crate::context::SharedContext;
use crate::error::{FilterError, Result};
use crate::place::{Place, PlaceError, PlaceQuery, PlaceResolver};
use crate::queryable::Queryable;
use crate::settings::FilterRequest;

pub(crate) const ARG_NAME: &str = "locations";

/// Restricts items to a named location such as a neighborhood or ZIP code.
///
/// Arguments are `[location_type_slug, location_slug]`; without the second
/// one the filter is incomplete and validation offers the public locations
/// of that type.
#[derive(Debug, Clone)]
pub struct LocationFilter {
    type_slug: String,
    slug: Option<String>,
    description: Description,
}

impl LocationFilter {
    pub fn new(args: &[String]) -> Result<Self> {
        let (type_slug, rest) = args
            .split_first()
            .ok_or_else(|| FilterError::not_enough_args(ARG_NAME))?;
        let slug = rest.first().cloned();

        let mut description = Description::default();
        if let Some(slug) = &slug {
            description.url = Some(format!("{}={},{}", ARG_NAME, type_slug, slug));
        }

        Ok(LocationFilter {
            type_slug: type_slug.clone(),
            slug,
            description,
        })
    }

    pub fn type_slug(&self) -> &str {
        &self.type_slug
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
}

impl SchemaFilter for LocationFilter {
    fn key(&self) -> &str {
        "location"
    }

    fn arg_name(&self) -> &str {
        ARG_NAME
    }

    fn sort_weight(&self) -> f64 {
        PLACE_WEIGHT
    }

    fn is_complete(&self) -> bool {
        self.slug.is_some()
    }

    fn description(&self) -> &Description {
        &self.description
    }

    fn validate(&self, catalog: &dyn Catalog) -> Result<Option<MoreInput>> {
        if self.is_complete() {
            return Ok(None);
        }
        let locations = catalog.public_locations(&self.type_slug);
        let first = locations.first().ok_or_else(|| FilterError::EmptyCandidates {
            slug: self.type_slug.clone(),
        })?;
        Ok(Some(MoreInput {
            required_field_label: first.location_type.name.clone(),
            required_field_slug: self.type_slug.clone(),
            resubmit_arg_name: ARG_NAME.to_string(),
            candidates: Some(
                locations
                    .iter()
                    .map(|l| Candidate::new(l.slug.clone(), l.name.clone()))
                    .collect(),
            ),
        }))
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
        let slug = require(self.slug.as_ref(), ARG_NAME)?;
        let query = PlaceQuery::Location {
            type_slug: &self.type_slug,
            slug,
        };
        let resolved = places.resolve(request, query, queryable)?;
        let (place, queryable) = context.absorb(resolved);

        let location = match &*place {
            Place::Location(location) => location,
            other => {
                return Err(PlaceError::WrongKind {
                    expected: query.kind(),
                    actual: other.kind(),
                }
                .into())
            }
        };
        tracing::debug!(location = %location.slug, "resolved location");

        self.description.label = location.location_type.name.clone();
        self.description.set_value(location.name.clone());
        self.description.url = Some(format!("{}={},{}", ARG_NAME, self.type_slug, location.slug));
        self.description.set_place(place.clone());
        Ok(queryable)
    }
}
