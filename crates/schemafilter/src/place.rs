//! Place-resolution adapter interface.
//!
//! Location and street filters do not know how to find places or how to
//! narrow records geographically. They hand a [`PlaceQuery`] and the current
//! queryable to a [`PlaceResolver`], which returns the resolved [`Place`]
//! together with a (possibly further narrowed) queryable.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::filter::{BlockRadius, BlockRange};
use crate::settings::FilterRequest;

/// Errors reported by a place resolver.
#[derive(Debug, Error)]
pub enum PlaceError {
    #[error("no {kind} matches '{spec}'")]
    NotFound { kind: &'static str, spec: String },

    /// The resolver returned a different kind of place than was asked for.
    #[error("expected a {expected}, resolver returned a {actual}")]
    WrongKind {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("place resolution is not available")]
    Unavailable,

    #[error("place resolution failed: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationType {
    pub slug: String,
    pub name: String,
}

/// A named area: a neighborhood, zip code, ward...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub location_type: LocationType,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

/// One block of a street.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: i64,
    #[serde(default)]
    pub city_slug: Option<String>,
    pub street_slug: String,
    pub from_num: u32,
    pub to_num: u32,
    /// e.g. "100-199 Main St."
    pub pretty_name: String,
}

/// A resolved place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Place {
    Location(Location),
    Block(Block),
}

impl Place {
    /// Display name of the place.
    pub fn name(&self) -> &str {
        match self {
            Place::Location(loc) => &loc.name,
            Place::Block(block) => &block.pretty_name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Place::Location(_) => "location",
            Place::Block(_) => "block",
        }
    }
}

/// What a filter asks the resolver to find.
#[derive(Debug, Clone, Copy)]
pub enum PlaceQuery<'a> {
    Location {
        type_slug: &'a str,
        slug: &'a str,
    },
    Block {
        city_slug: Option<&'a str>,
        street_slug: &'a str,
        range: &'a BlockRange,
        radius: BlockRadius,
    },
}

impl PlaceQuery<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            PlaceQuery::Location { .. } => "location",
            PlaceQuery::Block { .. } => "block",
        }
    }
}

/// Output of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolved<Q> {
    pub place: Place,
    /// The queryable, narrowed to the place.
    pub queryable: Q,
    /// Extra context entries to publish alongside the place.
    pub extra: Map<String, Value>,
}

impl<Q> Resolved<Q> {
    pub fn new(place: Place, queryable: Q) -> Self {
        Resolved {
            place,
            queryable,
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Resolves places and narrows a queryable `Q` to them.
pub trait PlaceResolver<Q> {
    fn resolve(
        &self,
        request: &FilterRequest<'_>,
        query: PlaceQuery<'_>,
        queryable: Q,
    ) -> Result<Resolved<Q>, PlaceError>;
}

/// Resolver for chains without location or street filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlaces;

impl<Q> PlaceResolver<Q> for NoPlaces {
    fn resolve(
        &self,
        _request: &FilterRequest<'_>,
        _query: PlaceQuery<'_>,
        _queryable: Q,
    ) -> Result<Resolved<Q>, PlaceError> {
        Err(PlaceError::Unavailable)
    }
}
