use crate::core::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// GeoJSON position. USGS points carry a third (depth) component.
pub type Position = Vec<f64>;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<HashMap<String, serde_json::Value>>,
}

impl GeoJsonFeature {
    fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.as_ref()?.get(key)
    }

    fn number_property(&self, key: &str) -> Option<f64> {
        self.property(key)?.as_f64()
    }

    fn string_property(&self, key: &str) -> Option<&str> {
        self.property(key)?.as_str()
    }
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
}

impl GeoJson {
    /// Parses a GeoJSON document
    pub fn from_str(geojson_str: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(geojson_str)?)
    }

    /// Gets all features in the document
    pub fn features(&self) -> &[GeoJsonFeature] {
        match self {
            GeoJson::Feature(feature) => std::slice::from_ref(feature),
            GeoJson::FeatureCollection { features } => features,
        }
    }

    /// Extracts earthquake events.
    ///
    /// Features without a numeric `mag` or without a Point geometry cannot be
    /// classified and are skipped.
    pub fn earthquakes(&self) -> Vec<EarthquakeFeature> {
        let features = self.features();
        let quakes: Vec<EarthquakeFeature> = features
            .iter()
            .filter_map(EarthquakeFeature::from_feature)
            .collect();

        let skipped = features.len() - quakes.len();
        if skipped > 0 {
            log::warn!(
                "skipped {} of {} features without magnitude or point geometry",
                skipped,
                features.len()
            );
        }
        quakes
    }

    /// Extracts plate boundary polylines. Non-line geometries are skipped.
    pub fn plate_boundaries(&self) -> Vec<PlateBoundary> {
        self.features()
            .iter()
            .filter_map(PlateBoundary::from_feature)
            .collect()
    }
}

/// One seismic event from the earthquake feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeFeature {
    pub magnitude: f64,
    /// `(lon, lat)` in GeoJSON order
    pub coordinates: (f64, f64),
    pub place: String,
}

impl EarthquakeFeature {
    pub fn new(magnitude: f64, coordinates: (f64, f64), place: impl Into<String>) -> Self {
        Self {
            magnitude,
            coordinates,
            place: place.into(),
        }
    }

    fn from_feature(feature: &GeoJsonFeature) -> Option<Self> {
        let magnitude = feature.number_property("mag")?;
        let position = match feature.geometry.as_ref()? {
            GeoJsonGeometry::Point { coordinates } => LatLng::from_position(coordinates)?,
            _ => return None,
        };
        let place = feature.string_property("place").unwrap_or_default();
        Some(Self::new(magnitude, (position.lng, position.lat), place))
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.coordinates.1, self.coordinates.0)
    }
}

/// A named plate boundary made of one or more polylines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateBoundary {
    pub name: String,
    pub lines: Vec<Vec<LatLng>>,
}

impl PlateBoundary {
    fn from_feature(feature: &GeoJsonFeature) -> Option<Self> {
        let to_line = |line: &Vec<Position>| -> Vec<LatLng> {
            line.iter().filter_map(|p| LatLng::from_position(p)).collect()
        };

        let lines: Vec<Vec<LatLng>> = match feature.geometry.as_ref()? {
            GeoJsonGeometry::LineString { coordinates } => vec![to_line(coordinates)],
            GeoJsonGeometry::MultiLineString { coordinates } => {
                coordinates.iter().map(to_line).collect()
            }
            GeoJsonGeometry::Polygon { coordinates } => coordinates.iter().map(to_line).collect(),
            _ => return None,
        };

        let name = feature
            .string_property("Name")
            .or_else(|| feature.string_property("name"))
            .unwrap_or_default()
            .to_string();
        Some(Self { name, lines })
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(self.lines.iter().flatten())
    }
}
