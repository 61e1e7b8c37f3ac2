use crate::{
    core::constants::PLATE_BOUNDARY_WEIGHT,
    core::geo::LatLngBounds,
    data::geojson::PlateBoundary,
    style::color::Color,
};

/// Plate boundaries drawn as plain outlines. Plates carry no magnitude, so
/// they never go through the color scale.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateBoundaryLayer {
    boundaries: Vec<PlateBoundary>,
    pub color: Color,
    pub weight: f32,
}

impl PlateBoundaryLayer {
    pub fn new(boundaries: Vec<PlateBoundary>) -> Self {
        Self {
            boundaries,
            color: Color::ORANGE_RED,
            weight: PLATE_BOUNDARY_WEIGHT,
        }
    }

    pub fn with_style(mut self, color: Color, weight: f32) -> Self {
        self.color = color;
        self.weight = weight;
        self
    }

    pub fn boundaries(&self) -> &[PlateBoundary] {
        &self.boundaries
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.boundaries
            .iter()
            .filter_map(PlateBoundary::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Leaflet polyline style
    pub fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "color": self.color.to_string(),
            "weight": self.weight,
        })
    }
}
