use crate::core::geo::LatLngBounds;
use crate::input::events::OverlayEvent;
use crate::layers::{marker::CircleMarker, plates::PlateBoundaryLayer};
use std::collections::HashMap;

/// A drawable overlay
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayLayer {
    /// Magnitude-classified circle markers
    Earthquakes(Vec<CircleMarker>),
    /// Fixed-color boundary outlines
    TectonicPlates(PlateBoundaryLayer),
}

impl OverlayLayer {
    pub fn len(&self) -> usize {
        match self {
            OverlayLayer::Earthquakes(markers) => markers.len(),
            OverlayLayer::TectonicPlates(plates) => plates.boundaries().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        match self {
            OverlayLayer::Earthquakes(markers) => {
                LatLngBounds::from_points(markers.iter().map(|m| &m.position))
            }
            OverlayLayer::TectonicPlates(plates) => plates.bounds(),
        }
    }
}

struct OverlayEntry {
    layer: OverlayLayer,
    visible: bool,
}

/// Named overlays in the order they were registered with the layer control
#[derive(Default)]
pub struct OverlayRegistry {
    overlays: HashMap<String, OverlayEntry>,
    order: Vec<String>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an overlay. Replacing keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, layer: OverlayLayer, visible: bool) {
        let name = name.into();
        if !self.overlays.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.overlays.insert(name, OverlayEntry { layer, visible });
    }

    pub fn remove(&mut self, name: &str) -> Option<OverlayLayer> {
        self.order.retain(|n| n != name);
        self.overlays.remove(name).map(|entry| entry.layer)
    }

    pub fn get(&self, name: &str) -> Option<&OverlayLayer> {
        self.overlays.get(name).map(|entry| &entry.layer)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.overlays.contains_key(name)
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.overlays.get(name).is_some_and(|entry| entry.visible)
    }

    /// Sets an overlay's visibility and returns the matching layer-control
    /// event. Unknown names are ignored and produce no event.
    pub fn set_visible(&mut self, name: &str, visible: bool) -> Option<OverlayEvent> {
        let Some(entry) = self.overlays.get_mut(name) else {
            log::debug!("ignoring toggle of unknown overlay '{}'", name);
            return None;
        };
        entry.visible = visible;
        Some(OverlayEvent::toggled(name, visible))
    }

    /// Overlay names in registration order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Iterates `(name, layer, visible)` in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverlayLayer, bool)> + '_ {
        self.order.iter().filter_map(|name| {
            self.overlays
                .get(name)
                .map(|entry| (name.as_str(), &entry.layer, entry.visible))
        })
    }

    /// Union of the bounds of all visible overlays
    pub fn visible_bounds(&self) -> Option<LatLngBounds> {
        self.iter()
            .filter(|(_, _, visible)| *visible)
            .filter_map(|(_, layer, _)| layer.bounds())
            .reduce(|a, b| a.union(&b))
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::data::geojson::PlateBoundary;

    fn plates() -> OverlayLayer {
        OverlayLayer::TectonicPlates(PlateBoundaryLayer::new(vec![PlateBoundary {
            name: "AF-AN".to_string(),
            lines: vec![vec![LatLng::new(-54.8, -0.4), LatLng::new(-54.6, 0.0)]],
        }]))
    }

    #[test]
    fn test_registration_order_is_kept() {
        let mut registry = OverlayRegistry::new();
        registry.insert("Earthquakes", OverlayLayer::Earthquakes(Vec::new()), true);
        registry.insert("Tectonic Plates", plates(), false);
        registry.insert("Earthquakes", OverlayLayer::Earthquakes(Vec::new()), false);

        assert_eq!(registry.names(), ["Earthquakes", "Tectonic Plates"]);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_visible("Earthquakes"));
    }

    #[test]
    fn test_set_visible_emits_events() {
        let mut registry = OverlayRegistry::new();
        registry.insert("Tectonic Plates", plates(), true);

        assert_eq!(
            registry.set_visible("Tectonic Plates", false),
            Some(OverlayEvent::removed("Tectonic Plates"))
        );
        assert!(!registry.is_visible("Tectonic Plates"));
        assert_eq!(registry.set_visible("Faults", true), None);
    }

    #[test]
    fn test_visible_bounds() {
        let mut registry = OverlayRegistry::new();
        registry.insert("Tectonic Plates", plates(), false);
        assert_eq!(registry.visible_bounds(), None);

        registry.set_visible("Tectonic Plates", true);
        let bounds = registry.visible_bounds().unwrap();
        assert_eq!(bounds.north_east, LatLng::new(-54.6, 0.0));

        assert!(registry.remove("Tectonic Plates").is_some());
        assert!(registry.is_empty());
    }
}
