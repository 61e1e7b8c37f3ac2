use crate::core::constants::{MAX_ZOOM, TILE_SIZE};
use crate::core::geo::TileCoord;

/// Description of the base tile layer handed to the surface.
///
/// Tiles are addressed with the usual `{z}/{x}/{y}` slippy-map template.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub name: String,
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: f64,
    pub tile_size: u32,
}

impl TileLayer {
    pub fn new(name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            attribution: String::new(),
            max_zoom: MAX_ZOOM,
            tile_size: TILE_SIZE,
        }
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }

    /// The default OpenStreetMap tile server
    pub fn openstreetmap() -> Self {
        Self::new(
            "OpenStreetMap",
            "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
        )
        .with_attribution("© OpenStreetMap contributors")
    }

    /// Mapbox `light` raster tiles
    pub fn mapbox_light(access_token: &str) -> Self {
        Self::new(
            "Light Map",
            format!(
                "https://api.tiles.mapbox.com/v4/mapbox.light/{{z}}/{{x}}/{{y}}.png?access_token={access_token}"
            ),
        )
        .with_attribution(
            "Map data © OpenStreetMap contributors, CC-BY-SA, Imagery © Mapbox",
        )
    }

    /// Build a URL for the requested tile
    pub fn tile_url(&self, coord: TileCoord) -> String {
        self.url_template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}
