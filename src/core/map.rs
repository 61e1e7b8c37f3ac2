use crate::{
    core::config::QuakeMapConfig,
    core::constants::{EARTHQUAKES_OVERLAY, TECTONIC_PLATES_OVERLAY},
    data::feed::{load_feeds, FeedSource, LoadedFeeds},
    input::events::{EventSource, OverlayEvent},
    layers::{
        marker::classify_with,
        plates::PlateBoundaryLayer,
        registry::{OverlayLayer, OverlayRegistry},
        tile::TileLayer,
    },
    style::scale::ColorScale,
    traits::MapSurface,
    ui::{
        controls::{LayerVisibilityController, LegendState},
        legend::Legend,
    },
    QuakeMapError, Result,
};

/// One loaded earthquake map: overlays, legend and the controller tying
/// them together.
///
/// Built once per data load. Everything derived from the data (color scale,
/// markers, legend) is fixed for the lifetime of the value; only overlay
/// visibility changes afterwards.
pub struct QuakeMap {
    config: QuakeMapConfig,
    base_layer: TileLayer,
    scale: ColorScale,
    registry: OverlayRegistry,
    controller: LayerVisibilityController,
    notices: Vec<String>,
}

impl QuakeMap {
    /// Classifies the loaded feeds. Fails with `InvalidInput` when the
    /// earthquake feed held no usable events.
    pub fn build(feeds: LoadedFeeds, config: QuakeMapConfig) -> Result<Self> {
        let magnitudes: Vec<f64> = feeds.earthquakes.iter().map(|q| q.magnitude).collect();
        let scale = ColorScale::from_magnitudes(&magnitudes)?;

        let markers = classify_with(&feeds.earthquakes, &scale, config.marker_radius_scale);
        let legend = Legend::build_with(&scale, config.legend_sampling);

        let mut registry = OverlayRegistry::new();
        registry.insert(EARTHQUAKES_OVERLAY, OverlayLayer::Earthquakes(markers), true);
        if let Some(plates) = feeds.plates {
            registry.insert(
                TECTONIC_PLATES_OVERLAY,
                OverlayLayer::TectonicPlates(PlateBoundaryLayer::new(plates)),
                true,
            );
        }

        let notices = feeds
            .plate_error
            .map(|e| format!("Tectonic plates unavailable: {e}"))
            .into_iter()
            .collect();

        let controller =
            LayerVisibilityController::new(EARTHQUAKES_OVERLAY, legend, config.legend_position);

        log::info!(
            "built map: {} markers, magnitude domain {:?}",
            magnitudes.len(),
            scale.domain()
        );

        Ok(Self {
            base_layer: config.tile_layer(),
            config,
            scale,
            registry,
            controller,
            notices,
        })
    }

    /// Fetches the feeds and builds the map
    pub async fn load<F>(source: &F, config: QuakeMapConfig) -> Result<Self>
    where
        F: FeedSource + ?Sized,
    {
        let feeds = load_feeds(source, &config).await?;
        Self::build(feeds, config)
    }

    /// Loads and mounts onto `surface`. A failed load is shown on the surface
    /// before it is returned.
    pub async fn load_onto<F, S>(
        source: &F,
        config: QuakeMapConfig,
        surface: &mut S,
    ) -> Result<Self>
    where
        F: FeedSource + ?Sized,
        S: MapSurface + ?Sized,
    {
        let base_layer = config.tile_layer();
        match Self::load(source, config).await {
            Ok(mut map) => {
                map.mount(surface);
                Ok(map)
            }
            Err(e) => {
                Self::mount_error(surface, &base_layer, &e);
                Err(e)
            }
        }
    }

    /// Hands base layer, overlays and legend to the surface
    pub fn mount<S>(&mut self, surface: &mut S)
    where
        S: MapSurface + ?Sized,
    {
        surface.set_base_layer(&self.base_layer);
        for (name, layer, visible) in self.registry.iter() {
            surface.add_overlay(name, layer, visible);
        }

        let visible = self.registry.is_visible(self.controller.overlay());
        self.controller.mount(surface, visible);

        for notice in &self.notices {
            surface.show_error(notice);
        }
    }

    /// Error state for a load that produced no map
    pub fn mount_error<S>(surface: &mut S, base_layer: &TileLayer, error: &QuakeMapError)
    where
        S: MapSurface + ?Sized,
    {
        log::error!("earthquake map unavailable: {}", error);
        surface.set_base_layer(base_layer);
        surface.show_error(&format!("Earthquake data unavailable: {error}"));
    }

    /// Applies a layer-control event coming from the surface
    pub fn handle_event<S>(
        &mut self,
        event: &OverlayEvent,
        surface: &mut S,
    ) -> Option<LegendState>
    where
        S: MapSurface + ?Sized,
    {
        let visible = matches!(event, OverlayEvent::Added(_));
        self.registry.set_visible(event.overlay(), visible)?;
        self.controller.handle(event, surface)
    }

    /// Toggles an overlay by name, as a click in the layer control would
    pub fn toggle_overlay<S>(
        &mut self,
        name: &str,
        visible: bool,
        surface: &mut S,
    ) -> Option<LegendState>
    where
        S: MapSurface + ?Sized,
    {
        self.handle_event(&OverlayEvent::toggled(name, visible), surface)
    }

    /// Handles every pending event from `source` and returns how many
    /// changed the legend
    pub fn drain_events<E, S>(&mut self, source: &mut E, surface: &mut S) -> usize
    where
        E: EventSource + ?Sized,
        S: MapSurface + ?Sized,
    {
        let mut changed = 0;
        while let Some(event) = source.poll_event() {
            if self.handle_event(&event, surface).is_some() {
                changed += 1;
            }
        }
        changed
    }

    pub fn config(&self) -> &QuakeMapConfig {
        &self.config
    }

    pub fn base_layer(&self) -> &TileLayer {
        &self.base_layer
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    pub fn legend(&self) -> &Legend {
        self.controller.legend()
    }

    pub fn legend_state(&self) -> LegendState {
        self.controller.state()
    }

    pub fn registry(&self) -> &OverlayRegistry {
        &self.registry
    }

    /// Non-fatal problems from the load, such as a missing plate feed
    pub fn notices(&self) -> &[String] {
        &self.notices
    }
}
