//! Street-block filter: items within a radius of one block of a street.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Description, MoreInput, SchemaFilter, PLACE_WEIGHT};
use crate::catalog::Catalog;
use crate::context::SharedContext;
use crate::error::{FilterError, Result};
use crate::place::{Place, PlaceError, PlaceQuery, PlaceResolver};
use crate::queryable::Queryable;
use crate::settings::FilterRequest;

pub(crate) const ARG_NAME: &str = "streets";

static BLOCK_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,6})-(\d{1,6})([nsew]{1,2})?$").expect("block range regex is valid")
});

/// A house-number range such as `100-199`, optionally followed by a
/// pre-direction (`100-199n`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRange {
    pub from_num: u32,
    pub to_num: u32,
    pub predir: Option<String>,
}

impl BlockRange {
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || FilterError::InvalidBlockRange {
            value: s.to_string(),
        };
        let caps = BLOCK_RANGE.captures(s).ok_or_else(invalid)?;
        let from_num = caps[1].parse().map_err(|_| invalid())?;
        let to_num = caps[2].parse().map_err(|_| invalid())?;
        Ok(BlockRange {
            from_num,
            to_num,
            predir: caps.get(3).map(|m| m.as_str().to_string()),
        })
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from_num, self.to_num)?;
        if let Some(predir) = &self.predir {
            f.write_str(predir)?;
        }
        Ok(())
    }
}

/// Search radius around a block, in blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRadius(pub u32);

impl BlockRadius {
    /// Accepts `8`, `8-blocks` or `1-block`.
    pub fn parse(s: &str) -> Result<Self> {
        let digits = s
            .strip_suffix("-blocks")
            .or_else(|| s.strip_suffix("-block"))
            .unwrap_or(s);
        match digits.parse::<u32>() {
            Ok(n) if n > 0 => Ok(BlockRadius(n)),
            _ => Err(FilterError::InvalidRadius {
                value: s.to_string(),
            }),
        }
    }

    /// URL form: `1-block`, `8-blocks`.
    pub fn fragment(self) -> String {
        radius_fragment(&self.0.to_string())
    }
}

impl fmt::Display for BlockRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} block{}", self.0, if self.0 == 1 { "" } else { "s" })
    }
}

fn radius_fragment(radius: &str) -> String {
    if radius == "1" {
        "1-block".to_string()
    } else {
        format!("{}-blocks", radius)
    }
}

/// Appends a radius to the `streets=` segment of a request path.
///
/// Returns `None` when the path has no such segment.
///
/// ```
/// use schemafilter::radius_url;
///
/// assert_eq!(
///     radius_url("/crime/filter/streets=main-st,100-199;by-date=2024-03-01,2024-03-31/", "8")
///         .as_deref(),
///     Some("/crime/filter/streets=main-st,100-199,8-blocks;by-date=2024-03-01,2024-03-31/"),
/// );
/// assert_eq!(radius_url("/crime/filter/", "8"), None);
/// ```
pub fn radius_url(path: &str, radius: &str) -> Option<String> {
    let fragment = radius_fragment(radius);
    let mut found = false;
    let url = path
        .split('/')
        .map(|component| {
            component
                .split(';')
                .map(|segment| {
                    if segment.starts_with(ARG_NAME) {
                        found = true;
                        format!("{},{}", segment, fragment)
                    } else {
                        segment.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(";")
        })
        .collect::<Vec<_>>()
        .join("/");
    found.then_some(url)
}

/// Restricts items to those near a block of a street.
///
/// Arguments are `[city_slug,] street_slug, block_range, radius`; the city
/// is only expected when the metro spans several cities. Omitting the radius
/// is the one recoverable construction error: it yields
/// [`FilterError::MissingRadius`] with a redirect to the same request at the
/// suggested radius.
#[derive(Debug, Clone)]
pub struct BlockFilter {
    city_slug: Option<String>,
    street_slug: String,
    range: BlockRange,
    radius: BlockRadius,
    description: Description,
}

impl BlockFilter {
    pub fn new(request: &FilterRequest<'_>, args: &[String]) -> Result<Self> {
        let mut args = args.iter();
        let mut next = || args.next().ok_or_else(|| FilterError::not_enough_args(ARG_NAME));

        let city_slug = if request.settings.multiple_cities {
            Some(next()?.clone())
        } else {
            None
        };
        let street_slug = next()?.clone();
        let range = next()?.clone();
        let radius = next().map_err(|_| {
            let suggested = request.suggested_radius();
            // Without a streets segment in the path, point at the filter alone.
            let redirect = radius_url(request.path, suggested).unwrap_or_else(|| {
                let mut given: Vec<&str> = city_slug.iter().map(String::as_str).collect();
                given.extend([street_slug.as_str(), range.as_str()]);
                format!("{}={},{}", ARG_NAME, given.join(","), radius_fragment(suggested))
            });
            FilterError::MissingRadius { redirect }
        })?;

        let range = BlockRange::parse(&range)?;
        let radius = BlockRadius::parse(radius)?;

        let mut filter = BlockFilter {
            city_slug,
            street_slug,
            range,
            radius,
            description: Description::labelled("Area"),
        };
        filter.description.url = Some(filter.url_for(
            filter.city_slug.as_deref(),
            &filter.street_slug,
            &filter.range.to_string(),
        ));
        Ok(filter)
    }

    pub fn city_slug(&self) -> Option<&str> {
        self.city_slug.as_deref()
    }

    pub fn street_slug(&self) -> &str {
        &self.street_slug
    }

    pub fn range(&self) -> &BlockRange {
        &self.range
    }

    pub fn radius(&self) -> BlockRadius {
        self.radius
    }

    fn url_for(&self, city_slug: Option<&str>, street_slug: &str, range: &str) -> String {
        let mut url = format!("{}=", ARG_NAME);
        if let Some(city) = city_slug {
            url.push_str(city);
            url.push(',');
        }
        url.push_str(&format!("{},{},{}", street_slug, range, self.radius.fragment()));
        url
    }
}

impl SchemaFilter for BlockFilter {
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
        true
    }

    fn description(&self) -> &Description {
        &self.description
    }

    /// There is no prompt for picking a block.
    fn validate(&self, _catalog: &dyn Catalog) -> Result<Option<MoreInput>> {
        Ok(None)
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
        let query = PlaceQuery::Block {
            city_slug: self.city_slug.as_deref(),
            street_slug: &self.street_slug,
            range: &self.range,
            radius: self.radius,
        };
        let resolved = places.resolve(request, query, queryable)?;
        let (place, queryable) = context.absorb(resolved);

        let block = match &*place {
            Place::Block(block) => block,
            other => {
                return Err(PlaceError::WrongKind {
                    expected: "block",
                    actual: other.kind(),
                }
                .into())
            }
        };
        tracing::debug!(block = %block.pretty_name, radius = self.radius.0, "resolved block");

        let city_slug = block.city_slug.as_deref().or(self.city_slug.as_deref());
        let range = format!("{}-{}", block.from_num, block.to_num);
        let url = self.url_for(city_slug, &block.street_slug, &range);

        self.description
            .set_value(format!("{} around {}", self.radius, block.pretty_name));
        self.description.url = Some(url);
        self.description.set_place(place.clone());
        Ok(queryable)
    }
}
