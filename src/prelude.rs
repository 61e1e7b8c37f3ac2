//! Prelude module for common quakemap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use quakemap::prelude::*;`

pub use crate::core::{
    config::{BaseLayerChoice, FeedMagnitude, FeedPeriod, QuakeMapConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::QuakeMap,
    viewport::{TilePlacement, Viewport},
};

pub use crate::data::{
    feed::{load_feeds, FeedSource, HttpFeedSource, LoadedFeeds, StaticFeedSource},
    geojson::{EarthquakeFeature, GeoJson, GeoJsonFeature, PlateBoundary},
};

pub use crate::layers::{
    marker::{classify, classify_with, CircleMarker},
    plates::PlateBoundaryLayer,
    registry::{OverlayLayer, OverlayRegistry},
    tile::TileLayer,
};

pub use crate::input::events::{EventSource, OverlayEvent};

pub use crate::rendering::headless::{HeadlessSurface, SurfaceCall};

pub use crate::style::{color::Color, scale::ColorScale};

pub use crate::traits::MapSurface;

pub use crate::ui::{
    controls::{LayerVisibilityController, LegendState},
    elements::Position,
    legend::{Legend, LegendBin, LegendSampling},
    popup::Popup,
};

#[cfg(feature = "egui")]
pub use crate::ui::widget::QuakeMapWidget;

#[cfg(feature = "tiles")]
pub use crate::tiles::{TileLoader, TileLoaderConfig};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::{block_on_load, spawn_load, LoadHandle};

pub use crate::{Error as QuakeMapError, Result};
