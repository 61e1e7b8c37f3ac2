//! Remote GeoJSON feeds.
//!
//! [`FeedSource`] is the seam between the map and the network. The loader
//! fetches the earthquake feed first and only requests the plate boundary feed
//! once the earthquakes have arrived.

use crate::core::config::QuakeMapConfig;
use crate::core::constants::USER_AGENT;
use crate::data::geojson::{EarthquakeFeature, GeoJson, PlateBoundary};
use crate::{QuakeMapError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Shared HTTP client with a custom User-Agent. Building the client once
/// avoids the cost of TLS and connection pool setup for every request.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_default()
});

fn malformed(url: &str, err: QuakeMapError) -> QuakeMapError {
    QuakeMapError::fetch(url, format!("malformed GeoJSON: {err}"))
}

/// Anything that can resolve a feed URL to a GeoJSON document
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<GeoJson>;
}

/// Fetches feeds over HTTP with a single attempt per request
#[derive(Clone)]
pub struct HttpFeedSource {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpFeedSource {
    /// Uses the shared client without a request timeout
    pub fn new() -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            timeout: None,
        }
    }

    /// Bounds every request by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn from_config(config: &QuakeMapConfig) -> Self {
        Self::new().with_timeout(config.fetch_timeout)
    }
}

impl Default for HttpFeedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<GeoJson> {
        log::debug!("fetch feed {}", url);

        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| QuakeMapError::fetch(url, e))?;
        if !response.status().is_success() {
            return Err(QuakeMapError::fetch(url, format!("HTTP {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| QuakeMapError::fetch(url, e))?;
        let geojson = GeoJson::from_str(&body).map_err(|e| malformed(url, e))?;

        log::info!(
            "downloaded feed {} ({} bytes, {} features)",
            url,
            body.len(),
            geojson.features().len()
        );
        Ok(geojson)
    }
}

/// Serves canned GeoJSON bodies keyed by URL. Unknown URLs fail like an
/// unreachable host.
#[derive(Debug, Clone, Default)]
pub struct StaticFeedSource {
    bodies: HashMap<String, String>,
}

impl StaticFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }
}

#[async_trait]
impl FeedSource for StaticFeedSource {
    async fn fetch(&self, url: &str) -> Result<GeoJson> {
        let body = self
            .bodies
            .get(url)
            .ok_or_else(|| QuakeMapError::fetch(url, "no such feed"))?;
        GeoJson::from_str(body).map_err(|e| malformed(url, e))
    }
}

/// Everything one load produced
#[derive(Debug)]
pub struct LoadedFeeds {
    pub earthquakes: Vec<EarthquakeFeature>,
    /// `None` when the plate overlay is disabled or its fetch failed
    pub plates: Option<Vec<PlateBoundary>>,
    /// Set when earthquakes loaded but the plate feed did not
    pub plate_error: Option<QuakeMapError>,
}

/// Fetches the earthquake feed, then the plate feed if one is configured.
///
/// An earthquake fetch failure aborts the load before the plate feed is
/// requested. A plate failure is reported in [`LoadedFeeds::plate_error`]
/// so the earthquakes can still be shown.
pub async fn load_feeds<S>(source: &S, config: &QuakeMapConfig) -> Result<LoadedFeeds>
where
    S: FeedSource + ?Sized,
{
    let quake_url = config.earthquake_feed_url();
    let earthquakes = source.fetch(&quake_url).await?.earthquakes();
    log::info!("loaded {} earthquakes from {}", earthquakes.len(), quake_url);

    let (plates, plate_error) = match config.plates_url.as_deref() {
        None => (None, None),
        Some(url) => match source.fetch(url).await {
            Ok(geojson) => {
                let plates = geojson.plate_boundaries();
                log::info!("loaded {} plate boundaries from {}", plates.len(), url);
                (Some(plates), None)
            }
            Err(e) => {
                log::error!("plate boundaries unavailable: {}", e);
                (None, Some(e))
            }
        },
    };

    Ok(LoadedFeeds {
        earthquakes,
        plates,
        plate_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source_unknown_url_is_fetch_failure() {
        let source = StaticFeedSource::new();
        let err = futures::executor::block_on(source.fetch("https://nowhere.test/feed"))
            .unwrap_err();
        match err {
            QuakeMapError::FetchFailure { url, .. } => {
                assert_eq!(url, "https://nowhere.test/feed")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_static_source_malformed_body_is_fetch_failure() {
        let source = StaticFeedSource::new().with_feed("mem://bad", "{\"features\": 3}");
        let err = futures::executor::block_on(source.fetch("mem://bad")).unwrap_err();
        assert!(matches!(err, QuakeMapError::FetchFailure { .. }));
    }
}
