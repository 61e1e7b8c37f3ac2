//! # quakemap
//!
//! Earthquake and tectonic plate map layers built the Leaflet way: a remote
//! GeoJSON feed is classified into magnitude-colored circle markers, a legend
//! is derived from the same color scale, and overlay toggles drive the legend
//! through a small state machine.
//!
//! Rendering is delegated to a [`MapSurface`]. The crate ships a recording
//! [`HeadlessSurface`] and, behind the `egui` feature, an interactive
//! `QuakeMapWidget`.

pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
pub mod style;
#[cfg(feature = "tiles")]
pub mod tiles;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::QuakeMapConfig,
    geo::{LatLng, LatLngBounds, TileCoord},
    map::QuakeMap,
};

pub use data::{
    feed::{FeedSource, HttpFeedSource, LoadedFeeds, StaticFeedSource},
    geojson::{EarthquakeFeature, GeoJson, PlateBoundary},
};

pub use layers::{
    marker::{classify, CircleMarker},
    plates::PlateBoundaryLayer,
    registry::{OverlayLayer, OverlayRegistry},
    tile::TileLayer,
};

pub use input::events::{EventSource, OverlayEvent};

pub use rendering::headless::HeadlessSurface;

pub use style::{color::Color, scale::ColorScale};

pub use traits::MapSurface;

pub use ui::{
    controls::{LayerVisibilityController, LegendState},
    elements::Position,
    legend::{Legend, LegendBin, LegendSampling},
    popup::Popup,
};

#[cfg(feature = "egui")]
pub use ui::widget::QuakeMapWidget;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, QuakeMapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum QuakeMapError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to fetch {url}: {reason}")]
    FetchFailure { url: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl QuakeMapError {
    pub(crate) fn fetch(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::FetchFailure {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Error type alias for convenience
pub type Error = QuakeMapError;

/// Initialises `env_logger` once; later calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
