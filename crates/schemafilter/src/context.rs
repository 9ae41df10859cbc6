//! Caller-owned scratch space threaded through [`FilterChain::apply`].
//!
//! [`FilterChain::apply`]: crate::FilterChain::apply

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::place::{Place, Resolved};

/// Data filters publish for later consumers (rendering, later filters).
///
/// Place-resolving filters store the resolved [`Place`] here so nobody has
/// to resolve it a second time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SharedContext {
    place: Option<Arc<Place>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl SharedContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently resolved place.
    pub fn place(&self) -> Option<&Arc<Place>> {
        self.place.as_ref()
    }

    /// `"location"` or `"block"`, once a place is resolved.
    pub fn place_type(&self) -> Option<&'static str> {
        self.place.as_ref().map(|p| p.kind())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extra.insert(key.into(), value.into());
    }

    /// Merges a resolution into the context, handing back the shared place
    /// and the narrowed queryable.
    pub(crate) fn absorb<Q>(&mut self, resolved: Resolved<Q>) -> (Arc<Place>, Q) {
        let place = Arc::new(resolved.place);
        self.place = Some(Arc::clone(&place));
        self.extra.extend(resolved.extra);
        (place, resolved.queryable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::place::{Location, LocationType};

    fn downtown() -> Place {
        Place::Location(Location {
            id: 7,
            slug: "downtown".into(),
            name: "Downtown".into(),
            location_type: LocationType {
                slug: "neighborhoods".into(),
                name: "neighborhood".into(),
            },
            display_order: 0,
            is_public: true,
        })
    }

    #[test]
    fn absorb_publishes_place_and_extras() {
        let mut context = SharedContext::new();
        let resolved = Resolved::new(downtown(), 42u32).with_extra("map_zoom", 14);

        let (place, queryable) = context.absorb(resolved);

        assert_eq!(queryable, 42);
        assert_eq!(place.name(), "Downtown");
        assert!(Arc::ptr_eq(context.place().unwrap(), &place));
        assert_eq!(context.place_type(), Some("location"));
        assert_eq!(context.get("map_zoom"), Some(&Value::from(14)));
    }

    #[test]
    fn serializes_flat() {
        let mut context = SharedContext::new();
        context.insert("schema", "crime");
        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(json["schema"], "crime");
        assert!(json["place"].is_null());
    }
}
