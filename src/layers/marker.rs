use crate::{
    core::constants::{MARKER_FILL_OPACITY, MARKER_OPACITY, MARKER_RADIUS_SCALE, MARKER_WEIGHT},
    core::geo::LatLng,
    data::geojson::EarthquakeFeature,
    style::{color::Color, scale::ColorScale},
    ui::popup::Popup,
};
use serde::{Deserialize, Serialize};

/// Circle marker for one earthquake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleMarker {
    pub position: LatLng,
    pub magnitude: f64,
    /// `magnitude * radius scale`; negative for negative magnitudes
    pub radius: f64,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub weight: f32,
    pub opacity: f32,
    pub fill_opacity: f32,
    pub popup: Popup,
}

impl CircleMarker {
    pub fn from_feature(
        feature: &EarthquakeFeature,
        scale: &ColorScale,
        radius_scale: f64,
    ) -> Self {
        let position = feature.lat_lng();
        let color = scale.color(feature.magnitude);
        Self {
            position,
            magnitude: feature.magnitude,
            radius: feature.magnitude * radius_scale,
            fill_color: color,
            stroke_color: color,
            weight: MARKER_WEIGHT,
            opacity: MARKER_OPACITY,
            fill_opacity: MARKER_FILL_OPACITY,
            popup: Popup::for_earthquake(position, &feature.place, feature.magnitude),
        }
    }

    /// Radius to draw with; tiny negative-magnitude events collapse to a point
    pub fn display_radius(&self) -> f64 {
        self.radius.max(0.0)
    }

    /// Leaflet `circleMarker` path options
    pub fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "radius": self.display_radius(),
            "fillColor": self.fill_color.to_string(),
            "color": self.stroke_color.to_string(),
            "weight": self.weight,
            "opacity": self.opacity,
            "fillOpacity": self.fill_opacity,
        })
    }
}

/// One marker per feature, in input order, using the default radius scale
pub fn classify(features: &[EarthquakeFeature], scale: &ColorScale) -> Vec<CircleMarker> {
    classify_with(features, scale, MARKER_RADIUS_SCALE)
}

pub fn classify_with(
    features: &[EarthquakeFeature],
    scale: &ColorScale,
    radius_scale: f64,
) -> Vec<CircleMarker> {
    features
        .iter()
        .map(|feature| CircleMarker::from_feature(feature, scale, radius_scale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> Vec<EarthquakeFeature> {
        vec![
            EarthquakeFeature::new(2.0, (-122.4, 37.7), "Bay Area"),
            EarthquakeFeature::new(4.5, (142.4, 38.3), "off the east coast of Honshu"),
            EarthquakeFeature::new(-0.3, (-116.8, 33.5), "Anza"),
        ]
    }

    #[test]
    fn test_bay_area_marker() {
        let quakes = features();
        let scale = ColorScale::from_magnitudes(&[1.0, 3.0, 5.0]).unwrap();
        let markers = classify(&quakes, &scale);

        let marker = &markers[0];
        assert_eq!(marker.radius, 10.0);
        assert_eq!(marker.fill_color, scale.color(2.0));
        assert_eq!(marker.stroke_color, marker.fill_color);
        assert_eq!(marker.position, LatLng::new(37.7, -122.4));
        assert!(marker.popup.contains("Bay Area"));
        assert!(marker.popup.contains("Magnitude: 2"));
    }

    #[test]
    fn test_one_marker_per_feature_in_order() {
        let quakes = features();
        let mags: Vec<f64> = quakes.iter().map(|q| q.magnitude).collect();
        let scale = ColorScale::from_magnitudes(&mags).unwrap();
        let markers = classify(&quakes, &scale);

        assert_eq!(markers.len(), quakes.len());
        for (marker, quake) in markers.iter().zip(&quakes) {
            assert_eq!(marker.radius, 5.0 * quake.magnitude);
            assert_eq!(marker.magnitude, quake.magnitude);
        }
    }

    #[test]
    fn test_negative_magnitude_draws_as_point() {
        let quakes = features();
        let scale = ColorScale::from_magnitudes(&[-0.3, 4.5]).unwrap();
        let markers = classify(&quakes, &scale);
        let marker = &markers[2];
        assert!(marker.radius < 0.0);
        assert_eq!(marker.display_radius(), 0.0);
        assert_eq!(marker.fill_color, Color::GREEN);
    }

    #[test]
    fn test_custom_radius_scale() {
        let quakes = features();
        let scale = ColorScale::from_magnitudes(&[2.0, 4.5]).unwrap();
        let markers = classify_with(&quakes[..1], &scale, 3.0);
        assert_eq!(markers[0].radius, 6.0);
    }

    #[test]
    fn test_leaflet_options() {
        let scale = ColorScale::from_magnitudes(&[2.0]).unwrap();
        let options = classify(&features()[..1], &scale)[0].options();
        assert_eq!(options["radius"], 10.0);
        assert_eq!(options["fillColor"], "rgb(255, 255, 0)");
        assert_eq!(options["color"], options["fillColor"]);
        assert_eq!(options["opacity"], 1.0);
    }
}
