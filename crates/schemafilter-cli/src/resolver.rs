//! Place resolution against the fixture's locations and blocks.

use schemafilter::{
    Block, BlockRadius, FilterRequest, Location, Place, PlaceError, PlaceQuery, PlaceResolver,
    Resolved,
};
use schemafilter_query::Query;

/// House numbers per block.
const BLOCK_SIZE: u32 = 100;

/// Resolves places from fixture lists and narrows a [`Query`] to them.
///
/// Locations narrow to items tagged with the location id. Blocks narrow to
/// items on any block of the same street within the radius.
#[derive(Debug, Clone, Copy)]
pub struct FixtureResolver<'a> {
    locations: &'a [Location],
    blocks: &'a [Block],
}

impl<'a> FixtureResolver<'a> {
    pub fn new(locations: &'a [Location], blocks: &'a [Block]) -> Self {
        FixtureResolver { locations, blocks }
    }

    fn find_block(
        &self,
        city_slug: Option<&str>,
        street_slug: &str,
        from_num: u32,
    ) -> Option<&'a Block> {
        self.blocks.iter().find(|b| {
            b.street_slug == street_slug
                && (city_slug.is_none() || b.city_slug.as_deref() == city_slug)
                && b.from_num <= from_num
                && from_num <= b.to_num
        })
    }

    fn nearby_block_ids(&self, center: &Block, radius: BlockRadius) -> Vec<i64> {
        let reach = radius.0.saturating_mul(BLOCK_SIZE);
        self.blocks
            .iter()
            .filter(|b| b.street_slug == center.street_slug && b.city_slug == center.city_slug)
            .filter(|b| b.from_num.abs_diff(center.from_num) <= reach)
            .map(|b| b.id)
            .collect()
    }
}

impl PlaceResolver<Query> for FixtureResolver<'_> {
    fn resolve(
        &self,
        _request: &FilterRequest<'_>,
        query: PlaceQuery<'_>,
        queryable: Query,
    ) -> Result<Resolved<Query>, PlaceError> {
        match query {
            PlaceQuery::Location { type_slug, slug } => {
                let location = self
                    .locations
                    .iter()
                    .find(|l| l.location_type.slug == type_slug && l.slug == slug)
                    .ok_or_else(|| PlaceError::NotFound {
                        kind: query.kind(),
                        spec: format!("{type_slug}/{slug}"),
                    })?;
                let narrowed = queryable.and_contains("locations", location.id);
                Ok(Resolved::new(Place::Location(location.clone()), narrowed))
            }
            PlaceQuery::Block {
                city_slug,
                street_slug,
                range,
                radius,
            } => {
                let block = self
                    .find_block(city_slug, street_slug, range.from_num)
                    .ok_or_else(|| PlaceError::NotFound {
                        kind: query.kind(),
                        spec: format!("{street_slug} {range}"),
                    })?;
                let ids = self.nearby_block_ids(block, radius);
                tracing::debug!(block = block.id, nearby = ids.len(), "resolved block");
                let narrowed = queryable.and_in("blocks", ids);
                Ok(Resolved::new(Place::Block(block.clone()), narrowed)
                    .with_extra("block_radius", radius.0))
            }
        }
    }
}
