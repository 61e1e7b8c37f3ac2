//! Core constants derived from the Leaflet/USGS conventions the map follows.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Circle marker radius in pixels per unit of magnitude.
pub const MARKER_RADIUS_SCALE: f64 = 5.0;

/// Stroke width of earthquake circle markers.
pub const MARKER_WEIGHT: f32 = 1.0;

/// Stroke opacity of earthquake circle markers.
pub const MARKER_OPACITY: f32 = 1.0;

/// Fill opacity of earthquake circle markers.
pub const MARKER_FILL_OPACITY: f32 = 0.8;

/// Stroke width of plate boundary outlines.
pub const PLATE_BOUNDARY_WEIGHT: f32 = 2.0;

/// Lower bounds of the legend's magnitude bins.
pub const LEGEND_CATEGORIES: [u32; 6] = [0, 1, 2, 3, 4, 5];

/// Overlay names as shown in the layer control.
pub const EARTHQUAKES_OVERLAY: &str = "Earthquakes";
pub const TECTONIC_PLATES_OVERLAY: &str = "Tectonic Plates";

/// Initial view: geographic center of the contiguous United States.
pub const DEFAULT_CENTER: (f64, f64) = (39.8283, -98.5795);
pub const DEFAULT_ZOOM: f64 = 3.0;
pub const MAX_ZOOM: f64 = 18.0;

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Base URL of the USGS GeoJSON summary feeds.
pub const USGS_FEED_BASE: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary";

/// PB2002 plate boundary GeoJSON.
pub const DEFAULT_PLATES_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";

/// Single-attempt request budget for feed downloads.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

pub const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));
