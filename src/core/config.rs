//! Configuration for the earthquake map
//!
//! Everything has a sensible default so `QuakeMapConfig::default()` reproduces
//! the classic "all earthquakes, past week" view. [`QuakeMapConfig::from_env`]
//! layers environment overrides on top, which is how the viewer picks up the
//! tile access token.

use crate::core::constants::{
    DEFAULT_CENTER, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_PLATES_URL, DEFAULT_ZOOM,
    MARKER_RADIUS_SCALE, USGS_FEED_BASE,
};
use crate::core::geo::LatLng;
use crate::layers::tile::TileLayer;
use crate::ui::elements::Position;
use crate::ui::legend::LegendSampling;
use crate::{QuakeMapError, Result};
use std::str::FromStr;
use std::time::Duration;

pub const ENV_ACCESS_TOKEN: &str = "QUAKEMAP_ACCESS_TOKEN";
pub const ENV_FEED_PERIOD: &str = "QUAKEMAP_FEED_PERIOD";
pub const ENV_FEED_MAGNITUDE: &str = "QUAKEMAP_FEED_MAGNITUDE";
pub const ENV_PLATES_URL: &str = "QUAKEMAP_PLATES_URL";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "QUAKEMAP_FETCH_TIMEOUT_SECS";

/// Time window of the USGS summary feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedPeriod {
    Hour,
    Day,
    #[default]
    Week,
    Month,
}

impl FeedPeriod {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl FromStr for FeedPeriod {
    type Err = QuakeMapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(QuakeMapError::Config(format!(
                "unknown feed period '{other}' (expected hour, day, week or month)"
            ))),
        }
    }
}

/// Magnitude threshold of the USGS summary feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedMagnitude {
    #[default]
    All,
    M1_0,
    M2_5,
    M4_5,
    Significant,
}

impl FeedMagnitude {
    fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::M1_0 => "1.0",
            Self::M2_5 => "2.5",
            Self::M4_5 => "4.5",
            Self::Significant => "significant",
        }
    }
}

impl FromStr for FeedMagnitude {
    type Err = QuakeMapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "1.0" | "1" => Ok(Self::M1_0),
            "2.5" => Ok(Self::M2_5),
            "4.5" => Ok(Self::M4_5),
            "significant" => Ok(Self::Significant),
            other => Err(QuakeMapError::Config(format!(
                "unknown feed magnitude '{other}' (expected all, 1.0, 2.5, 4.5 or significant)"
            ))),
        }
    }
}

/// Which base tile layer the surface should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseLayerChoice {
    /// Mapbox `mapbox.light`, needs an access token
    MapboxLight { access_token: Option<String> },
    OpenStreetMap,
}

impl Default for BaseLayerChoice {
    fn default() -> Self {
        Self::MapboxLight { access_token: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuakeMapConfig {
    pub center: LatLng,
    pub zoom: f64,
    pub base_layer: BaseLayerChoice,
    pub feed_period: FeedPeriod,
    pub feed_magnitude: FeedMagnitude,
    /// `None` disables the tectonic plate overlay
    pub plates_url: Option<String>,
    pub fetch_timeout: Duration,
    pub marker_radius_scale: f64,
    pub legend_position: Position,
    pub legend_sampling: LegendSampling,
}

impl Default for QuakeMapConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            zoom: DEFAULT_ZOOM,
            base_layer: BaseLayerChoice::default(),
            feed_period: FeedPeriod::default(),
            feed_magnitude: FeedMagnitude::default(),
            plates_url: Some(DEFAULT_PLATES_URL.to_string()),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            marker_radius_scale: MARKER_RADIUS_SCALE,
            legend_position: Position::BottomRight,
            legend_sampling: LegendSampling::default(),
        }
    }
}

impl QuakeMapConfig {
    /// Defaults overridden by `QUAKEMAP_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|t| !t.trim().is_empty()) {
            config.base_layer = BaseLayerChoice::MapboxLight {
                access_token: Some(token.trim().to_string()),
            };
        }
        if let Some(period) = lookup(ENV_FEED_PERIOD) {
            config.feed_period = period.parse()?;
        }
        if let Some(magnitude) = lookup(ENV_FEED_MAGNITUDE) {
            config.feed_magnitude = magnitude.parse()?;
        }
        if let Some(url) = lookup(ENV_PLATES_URL) {
            let url = url.trim();
            config.plates_url = match url {
                "" | "none" => None,
                _ => Some(url.to_string()),
            };
        }
        if let Some(secs) = lookup(ENV_FETCH_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                QuakeMapError::Config(format!(
                    "{ENV_FETCH_TIMEOUT_SECS} must be whole seconds, got '{secs}'"
                ))
            })?;
            config.fetch_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_center(mut self, center: LatLng, zoom: f64) -> Self {
        self.center = center;
        self.zoom = zoom;
        self
    }

    pub fn with_feed(mut self, period: FeedPeriod, magnitude: FeedMagnitude) -> Self {
        self.feed_period = period;
        self.feed_magnitude = magnitude;
        self
    }

    pub fn with_plates_url(mut self, url: Option<String>) -> Self {
        self.plates_url = url;
        self
    }

    pub fn with_base_layer(mut self, base_layer: BaseLayerChoice) -> Self {
        self.base_layer = base_layer;
        self
    }

    pub fn with_legend(mut self, position: Position, sampling: LegendSampling) -> Self {
        self.legend_position = position;
        self.legend_sampling = sampling;
        self
    }

    /// USGS summary feed URL for the configured period and threshold
    pub fn earthquake_feed_url(&self) -> String {
        format!(
            "{}/{}_{}.geojson",
            USGS_FEED_BASE,
            self.feed_magnitude.as_str(),
            self.feed_period.as_str()
        )
    }

    /// Resolves the base layer, falling back to OpenStreetMap when Mapbox has
    /// no access token
    pub fn tile_layer(&self) -> TileLayer {
        match &self.base_layer {
            BaseLayerChoice::MapboxLight {
                access_token: Some(token),
            } => TileLayer::mapbox_light(token),
            BaseLayerChoice::MapboxLight { access_token: None } => {
                log::warn!(
                    "{} is not set; using OpenStreetMap tiles instead of Mapbox",
                    ENV_ACCESS_TOKEN
                );
                TileLayer::openstreetmap()
            }
            BaseLayerChoice::OpenStreetMap => TileLayer::openstreetmap(),
        }
    }
}
