//! Schemafilter - composable filter chains over news items.
//!
//! A filter specification such as
//!
//! ```text
//! by-date=2024-03-01,2024-03-31;by-cuisine=thai;locations=neighborhoods,downtown
//! ```
//!
//! is parsed into a [`FilterChain`]: an ordered, uniquely-keyed collection of
//! typed [`Filter`]s. The chain can then be validated (a filter given too few
//! arguments yields a [`MoreInput`] prompt rather than an error), reordered by
//! cost with [`FilterChain::normalized`], and applied to any [`Queryable`].
//!
//! # Quick Start
//!
//! ```rust
//! use schemafilter::{
//!     FieldKind, FieldRegistry, FilterChain, FilterRequest, FilterSettings, MemoryCatalog,
//!     NoPlaces, Schema, SchemaField, SharedContext,
//! };
//! use schemafilter_query::Query;
//!
//! let schema = Schema::new("restaurant-inspections", "Restaurant inspections", "inspection date");
//! let settings = FilterSettings::default();
//! let request = FilterRequest::new(&schema, &settings);
//!
//! let fields = FieldRegistry::from_fields([SchemaField::new(
//!     1, "violation", "violation", "violation", "violations", FieldKind::Text,
//! )]);
//! let catalog = MemoryCatalog::default();
//!
//! let mut chain = FilterChain::from_spec(
//!     &request,
//!     "by-violation=rodents;by-date=2024-03-01,2024-03-01",
//!     &fields,
//!     &catalog,
//! )
//! .unwrap();
//!
//! assert!(chain.validate(&catalog).unwrap().is_none());
//!
//! // Cheapest filters first: the date range now precedes the text search.
//! let mut chain = chain.normalized();
//! assert_eq!(chain.keys().collect::<Vec<_>>(), ["date", "violation"]);
//!
//! let mut context = SharedContext::new();
//! let query = chain.apply(&request, Query::new(), &mut context, &NoPlaces).unwrap();
//! assert_eq!(query.and_clauses().len(), 3);
//! ```
//!
//! # Filter Variants
//!
//! | Argument | Filter | Chain key | Sort weight |
//! |----------|--------|-----------|-------------|
//! | `by-date` | [`DateRangeFilter`] (item date) | `date` | 1 |
//! | `by-pub-date` | [`DateRangeFilter`] (publication date) | `date` | 1 |
//! | `by-<bool field>` | [`BoolFilter`] | `lookup` | 100 |
//! | `locations=<type>,<slug>` | [`LocationFilter`] | `location` | 200 |
//! | `streets=[<city>,]<street>,<range>,<radius>` | [`BlockFilter`] | `location` | 200 |
//! | `by-<lookup field>` | [`LookupFilter`] | field name | 900 |
//! | `by-<text field>` | [`TextSearchFilter`] | field name | 1000 |

mod catalog;
mod chain;
mod context;
mod dispatch;
mod error;
mod filter;
mod parse;
mod place;
mod queryable;
mod schema;
mod settings;

pub use catalog::{Catalog, MemoryCatalog};
pub use chain::FilterChain;
pub use context::SharedContext;
pub use dispatch::Dispatcher;
pub use error::{FilterError, Result};
pub use filter::{
    radius_url, BlockFilter, BlockRadius, BlockRange, BoolChoice, BoolFilter, Candidate,
    DateRangeFilter, Description, Filter, LocationFilter, LookupFilter, MoreInput, SchemaFilter,
    TextSearchFilter,
};
pub use parse::{parse_spec, FilterArg};
pub use place::{
    Block, Location, LocationType, NoPlaces, Place, PlaceError, PlaceQuery, PlaceResolver,
    Resolved,
};
pub use queryable::{AttributeValue, DateField, Queryable};
pub use schema::{FieldKind, FieldRegistry, Lookup, Schema, SchemaField};
pub use settings::{FilterRequest, FilterSettings, SettingsError};
