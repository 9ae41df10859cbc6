//! Lookup-value and location metadata consulted while parsing and
//! validating filters.

use serde::{Deserialize, Serialize};

use crate::place::Location;
use crate::schema::{Lookup, SchemaField};

/// Source of lookup values and locations.
pub trait Catalog {
    /// The lookup value of `field` with the given slug.
    fn lookup(&self, field: &SchemaField, slug: &str) -> Option<Lookup>;

    /// All lookup values of `field`, sorted by name.
    fn lookups(&self, field: &SchemaField) -> Vec<Lookup>;

    /// Public locations of a location type, sorted by display order.
    fn public_locations(&self, location_type_slug: &str) -> Vec<Location>;
}

/// A [`Catalog`] backed by in-memory lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryCatalog {
    pub lookups: Vec<Lookup>,
    pub locations: Vec<Location>,
}

impl MemoryCatalog {
    pub fn new(lookups: Vec<Lookup>, locations: Vec<Location>) -> Self {
        MemoryCatalog { lookups, locations }
    }
}

impl Catalog for MemoryCatalog {
    fn lookup(&self, field: &SchemaField, slug: &str) -> Option<Lookup> {
        self.lookups
            .iter()
            .find(|l| l.field_id == field.id && l.slug == slug)
            .cloned()
    }

    fn lookups(&self, field: &SchemaField) -> Vec<Lookup> {
        let mut lookups: Vec<Lookup> = self
            .lookups
            .iter()
            .filter(|l| l.field_id == field.id)
            .cloned()
            .collect();
        lookups.sort_by(|a, b| a.name.cmp(&b.name));
        lookups
    }

    fn public_locations(&self, location_type_slug: &str) -> Vec<Location> {
        let mut locations: Vec<Location> = self
            .locations
            .iter()
            .filter(|l| l.is_public && l.location_type.slug == location_type_slug)
            .cloned()
            .collect();
        locations.sort_by_key(|l| l.display_order);
        locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::place::LocationType;
    use crate::schema::FieldKind;

    fn cuisine() -> SchemaField {
        SchemaField::new(1, "cuisine", "cuisine", "cuisine", "cuisines", FieldKind::Lookup)
    }

    fn lookup(id: i64, field_id: i64, slug: &str, name: &str) -> Lookup {
        Lookup {
            id,
            field_id,
            slug: slug.into(),
            name: name.into(),
        }
    }

    fn location(id: i64, slug: &str, order: i32, public: bool) -> Location {
        Location {
            id,
            slug: slug.into(),
            name: slug.to_uppercase(),
            location_type: LocationType {
                slug: "zipcodes".into(),
                name: "ZIP code".into(),
            },
            display_order: order,
            is_public: public,
        }
    }

    #[test]
    fn lookups_are_scoped_and_sorted_by_name() {
        let catalog = MemoryCatalog::new(
            vec![
                lookup(1, 1, "thai", "Thai"),
                lookup(2, 1, "bakery", "Bakery"),
                lookup(3, 2, "other", "Other field"),
            ],
            vec![],
        );
        let names: Vec<String> = catalog.lookups(&cuisine()).into_iter().map(|l| l.name).collect();
        assert_eq!(names, ["Bakery", "Thai"]);
        assert_eq!(catalog.lookup(&cuisine(), "thai").unwrap().id, 1);
        assert!(catalog.lookup(&cuisine(), "other").is_none());
    }

    #[test]
    fn locations_hide_private_and_sort_by_display_order() {
        let catalog = MemoryCatalog::new(
            vec![],
            vec![
                location(1, "60614", 2, true),
                location(2, "60601", 1, true),
                location(3, "00000", 0, false),
            ],
        );
        let slugs: Vec<String> = catalog
            .public_locations("zipcodes")
            .into_iter()
            .map(|l| l.slug)
            .collect();
        assert_eq!(slugs, ["60601", "60614"]);
        assert!(catalog.public_locations("wards").is_empty());
    }
}
