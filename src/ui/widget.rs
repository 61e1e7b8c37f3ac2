use crate::{
    core::{
        config::QuakeMapConfig,
        geo::{LatLng, Point, TileCoord},
        viewport::Viewport,
    },
    input::events::OverlayEvent,
    layers::{marker::CircleMarker, registry::OverlayLayer, tile::TileLayer},
    tiles::TileLoader,
    traits::MapSurface,
    ui::{elements::Position, legend::Legend},
};
use crossbeam_channel::{Receiver, Sender};
use egui::{
    Align2, Color32, ColorImage, FontId, Pos2, Rect, Response, Sense, Stroke, TextureHandle,
    TextureOptions, Ui, Vec2, Widget,
};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

const CONTROL_MARGIN: f32 = 10.0;
const LEGEND_ROW_HEIGHT: f32 = 18.0;
const LEGEND_WIDTH: f32 = 110.0;
const LAYER_CONTROL_SIZE: Vec2 = Vec2::new(150.0, 24.0);
/// Minimum hover target, so zero-radius markers can still be inspected
const MIN_HIT_RADIUS: f64 = 4.0;
const FIT_PADDING: f64 = 20.0;
/// Texture count above which tiles outside the view are evicted
const MAX_TILE_TEXTURES: usize = 256;
const BACKGROUND: Color32 = Color32::from_rgb(242, 239, 233);

struct WidgetOverlay {
    name: String,
    layer: OverlayLayer,
    visible: bool,
}

/// Interactive egui surface for a [`QuakeMap`](crate::core::map::QuakeMap).
///
/// Draws the base tile layer, then plate boundaries and earthquake markers,
/// shows the marker popup on hover, and renders the layer control and legend.
/// Tiles are fetched in the background on first draw and appear as they
/// arrive.
/// Checkbox clicks are not applied directly: they are emitted as
/// [`OverlayEvent`]s on [`events`](Self::events) for the map to handle.
///
/// ```rust,ignore
/// let mut events = widget.events();
/// ui.add(&mut widget);
/// map.drain_events(&mut events, &mut widget);
/// ```
pub struct QuakeMapWidget {
    viewport: Viewport,
    base_layer: Option<TileLayer>,
    overlays: Vec<WidgetOverlay>,
    legend: Option<(Legend, Position)>,
    errors: Vec<String>,
    sender: Sender<OverlayEvent>,
    receiver: Receiver<OverlayEvent>,
    tiles: Option<TileLoader>,
    tiles_disabled: bool,
    tile_textures: HashMap<TileCoord, TextureHandle>,
    failed_tiles: HashSet<TileCoord>,
}

impl QuakeMapWidget {
    pub fn new(config: &QuakeMapConfig) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            viewport: Viewport::new(config.center, config.zoom, Point::new(800.0, 600.0)),
            base_layer: None,
            overlays: Vec::new(),
            legend: None,
            errors: Vec::new(),
            sender,
            receiver,
            tiles: None,
            tiles_disabled: false,
            tile_textures: HashMap::new(),
            failed_tiles: HashSet::new(),
        }
    }

    /// Receiving end of the layer-control events
    pub fn events(&self) -> Receiver<OverlayEvent> {
        self.receiver.clone()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn legend(&self) -> Option<&(Legend, Position)> {
        self.legend.as_ref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn base_layer(&self) -> Option<&TileLayer> {
        self.base_layer.as_ref()
    }

    /// Tiles requested but not yet delivered
    pub fn pending_tiles(&self) -> usize {
        self.tiles.as_ref().map_or(0, TileLoader::pending_count)
    }

    pub fn is_overlay_visible(&self, name: &str) -> bool {
        self.overlays.iter().any(|o| o.name == name && o.visible)
    }

    /// Flips the checkbox for `name` and emits the matching event
    pub fn set_overlay_checked(&mut self, name: &str, checked: bool) {
        let Some(overlay) = self.overlays.iter_mut().find(|o| o.name == name) else {
            return;
        };
        if overlay.visible == checked {
            return;
        }
        overlay.visible = checked;
        if self.sender.send(OverlayEvent::toggled(name, checked)).is_err() {
            log::warn!("layer control event for '{}' dropped", name);
        }
    }

    /// Zooms to the visible overlays, keeping the view when nothing is shown
    pub fn fit_visible(&mut self) {
        let bounds = self
            .overlays
            .iter()
            .filter(|o| o.visible)
            .filter_map(|o| o.layer.bounds())
            .reduce(|a, b| a.union(&b));
        if let Some(bounds) = bounds {
            self.viewport.fit_bounds(&bounds, FIT_PADDING);
        }
    }

    /// Topmost visible marker under `pixel` (container coordinates)
    pub fn marker_at(&self, pixel: Point) -> Option<&CircleMarker> {
        self.overlays
            .iter()
            .rev()
            .filter(|o| o.visible)
            .filter_map(|o| match &o.layer {
                OverlayLayer::Earthquakes(markers) => Some(markers),
                OverlayLayer::TectonicPlates(_) => None,
            })
            .flat_map(|markers| markers.iter().rev())
            .find(|marker| {
                let center = self.viewport.lat_lng_to_pixel(&marker.position);
                center.distance_to(&pixel) <= marker.display_radius().max(MIN_HIT_RADIUS)
            })
    }

    fn to_screen(&self, rect: Rect, lat_lng: &LatLng) -> Pos2 {
        let p = self.viewport.lat_lng_to_pixel(lat_lng);
        Pos2::new(rect.min.x + p.x as f32, rect.min.y + p.y as f32)
    }

    fn handle_input(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if response.dragged() {
            let delta = response.drag_delta();
            self.viewport.pan(Point::new(delta.x as f64, delta.y as f64));
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                if let Some(pointer) = response.hover_pos() {
                    let focus = Point::new(
                        (pointer.x - rect.min.x) as f64,
                        (pointer.y - rect.min.y) as f64,
                    );
                    let zoom = self.viewport.zoom + scroll as f64 * 0.002;
                    self.viewport.zoom_around(zoom, focus);
                }
            }
        }
    }

    /// Uploads finished tiles, draws the ones covering the view and requests
    /// the missing ones
    fn paint_base_tiles(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: Rect) {
        let Some(base) = self.base_layer.as_ref() else {
            return;
        };
        if self.tiles.is_none() && !self.tiles_disabled {
            match TileLoader::with_default_config() {
                Ok(loader) => self.tiles = Some(loader),
                Err(e) => {
                    log::error!("base tiles disabled: {}", e);
                    self.tiles_disabled = true;
                }
            }
        }

        if let Some(loader) = self.tiles.as_mut() {
            for result in loader.try_recv_results() {
                let coord = result.coord;
                match result.data {
                    Ok(tile) => {
                        let image = ColorImage::from_rgba_unmultiplied(tile.size, &tile.pixels);
                        let name = format!("tile-{}-{}-{}", coord.z, coord.x, coord.y);
                        let texture = ctx.load_texture(name, image, TextureOptions::LINEAR);
                        self.tile_textures.insert(coord, texture);
                    }
                    Err(_) => {
                        self.failed_tiles.insert(coord);
                    }
                }
            }
        }

        let placements = self.viewport.visible_tiles(base.max_zoom);
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        for placement in &placements {
            let min = Pos2::new(
                rect.min.x + placement.min.x as f32,
                rect.min.y + placement.min.y as f32,
            );
            let tile_rect = Rect::from_min_size(min, Vec2::splat(placement.size as f32));

            match self.tile_textures.get(&placement.coord) {
                Some(texture) => {
                    painter.image(texture.id(), tile_rect, uv, Color32::WHITE);
                }
                None => {
                    if !self.failed_tiles.contains(&placement.coord) {
                        if let Some(loader) = self.tiles.as_mut() {
                            loader.queue_tile(base, placement.coord);
                        }
                    }
                }
            }
        }

        if self.tile_textures.len() > MAX_TILE_TEXTURES {
            let visible: HashSet<TileCoord> = placements.iter().map(|p| p.coord).collect();
            self.tile_textures.retain(|coord, _| visible.contains(coord));
        }

        if self.pending_tiles() > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn paint_overlays(&self, painter: &egui::Painter, rect: Rect) {
        for overlay in self.overlays.iter().filter(|o| o.visible) {
            match &overlay.layer {
                OverlayLayer::TectonicPlates(plates) => {
                    let stroke = Stroke::new(plates.weight, Color32::from(plates.color));
                    for boundary in plates.boundaries() {
                        for line in &boundary.lines {
                            let points: Vec<Pos2> =
                                line.iter().map(|ll| self.to_screen(rect, ll)).collect();
                            painter.add(egui::Shape::line(points, stroke));
                        }
                    }
                }
                OverlayLayer::Earthquakes(markers) => {
                    for marker in markers {
                        let c = marker.fill_color;
                        let fill = Color32::from_rgba_unmultiplied(
                            c.r,
                            c.g,
                            c.b,
                            (marker.fill_opacity * 255.0) as u8,
                        );
                        let s = marker.stroke_color;
                        let stroke = Stroke::new(
                            marker.weight,
                            Color32::from_rgba_unmultiplied(
                                s.r,
                                s.g,
                                s.b,
                                (marker.opacity * 255.0) as u8,
                            ),
                        );
                        painter.circle(
                            self.to_screen(rect, &marker.position),
                            marker.display_radius() as f32,
                            fill,
                            stroke,
                        );
                    }
                }
            }
        }
    }

    fn paint_legend(&self, painter: &egui::Painter, rect: Rect) {
        let Some((legend, position)) = &self.legend else {
            return;
        };

        let rows = legend.bins().len() as f32 + 1.0;
        let size = Vec2::new(LEGEND_WIDTH, rows * LEGEND_ROW_HEIGHT + 8.0);
        let area = position.calculate_rect(rect, size, CONTROL_MARGIN);

        painter.rect_filled(area, 5.0, Color32::from_white_alpha(220));
        painter.text(
            area.min + Vec2::new(8.0, 4.0),
            Align2::LEFT_TOP,
            &legend.title,
            FontId::proportional(14.0),
            Color32::BLACK,
        );

        for (i, bin) in legend.bins().iter().enumerate() {
            let top = area.min.y + 4.0 + (i as f32 + 1.0) * LEGEND_ROW_HEIGHT;
            let swatch = Rect::from_min_size(
                Pos2::new(area.min.x + 8.0, top + 2.0),
                Vec2::splat(LEGEND_ROW_HEIGHT - 4.0),
            );
            painter.rect_filled(swatch, 0.0, Color32::from(bin.color));
            painter.text(
                Pos2::new(swatch.max.x + 6.0, top),
                Align2::LEFT_TOP,
                &bin.label,
                FontId::proportional(13.0),
                Color32::BLACK,
            );
        }
    }

    fn show_layer_control(&mut self, ui: &mut Ui, rect: Rect) {
        let mut toggled = Vec::new();
        for (i, overlay) in self.overlays.iter().enumerate() {
            let row = Rect::from_min_size(
                Pos2::new(
                    rect.max.x - CONTROL_MARGIN - LAYER_CONTROL_SIZE.x,
                    rect.min.y + CONTROL_MARGIN + i as f32 * LAYER_CONTROL_SIZE.y,
                ),
                LAYER_CONTROL_SIZE,
            );
            ui.painter().rect_filled(row, 0.0, Color32::from_white_alpha(220));

            let mut checked = overlay.visible;
            if ui
                .put(row, egui::Checkbox::new(&mut checked, overlay.name.as_str()))
                .changed()
            {
                toggled.push((overlay.name.clone(), checked));
            }
        }

        for (name, checked) in toggled {
            self.set_overlay_checked(&name, checked);
        }
    }

    fn paint_status(&self, painter: &egui::Painter, rect: Rect) {
        for (i, message) in self.errors.iter().enumerate() {
            painter.text(
                Pos2::new(rect.center().x, rect.min.y + 20.0 + i as f32 * 20.0),
                Align2::CENTER_TOP,
                message,
                FontId::proportional(15.0),
                Color32::from_rgb(150, 0, 0),
            );
        }

        if let Some(base) = &self.base_layer {
            painter.text(
                rect.max - Vec2::new(4.0, 2.0),
                Align2::RIGHT_BOTTOM,
                &base.attribution,
                FontId::proportional(10.0),
                Color32::from_gray(90),
            );
        }
    }
}

impl MapSurface for QuakeMapWidget {
    fn set_base_layer(&mut self, layer: &TileLayer) {
        if self.base_layer.as_ref() == Some(layer) {
            return;
        }
        self.base_layer = Some(layer.clone());
        self.tiles = None;
        self.tile_textures.clear();
        self.failed_tiles.clear();
    }

    fn add_overlay(&mut self, name: &str, layer: &OverlayLayer, visible: bool) {
        let overlay = WidgetOverlay {
            name: name.to_string(),
            layer: layer.clone(),
            visible,
        };
        match self.overlays.iter_mut().find(|o| o.name == name) {
            Some(existing) => *existing = overlay,
            None => self.overlays.push(overlay),
        }
    }

    fn attach_legend(&mut self, legend: &Legend, position: Position) {
        self.legend = Some((legend.clone(), position));
    }

    fn detach_legend(&mut self) {
        self.legend = None;
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

impl Widget for &mut QuakeMapWidget {
    fn ui(self, ui: &mut Ui) -> Response {
        let desired_size = ui.available_size();
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());

        self.viewport.set_size(Point::new(rect.width() as f64, rect.height() as f64));
        self.handle_input(ui, rect, &response);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);
        self.paint_base_tiles(&ui.ctx().clone(), &painter, rect);
        self.paint_overlays(&painter, rect);
        self.paint_legend(&painter, rect);
        self.paint_status(&painter, rect);
        self.show_layer_control(ui, rect);

        if let Some(pointer) = response.hover_pos() {
            let local = Point::new(
                (pointer.x - rect.min.x) as f64,
                (pointer.y - rect.min.y) as f64,
            );
            if let Some(marker) = self.marker_at(local) {
                let popup = marker.popup.clone();
                egui::show_tooltip_at_pointer(ui.ctx(), response.id.with("popup"), |ui| {
                    ui.strong(&popup.title);
                    for line in &popup.lines {
                        ui.label(line);
                    }
                });
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::MAX_ZOOM;
    use crate::data::geojson::EarthquakeFeature;
    use crate::layers::marker::classify;
    use crate::style::scale::ColorScale;

    fn widget_with_markers() -> QuakeMapWidget {
        let config = QuakeMapConfig::default().with_center(LatLng::new(0.0, 0.0), 3.0);
        let mut widget = QuakeMapWidget::new(&config);
        let features = vec![
            EarthquakeFeature::new(2.0, (0.0, 0.0), "Gulf of Guinea"),
            EarthquakeFeature::new(4.0, (10.0, 0.0), "Gabon"),
        ];
        let scale = ColorScale::from_magnitudes(&[2.0, 4.0]).unwrap();
        widget.add_overlay(
            "Earthquakes",
            &OverlayLayer::Earthquakes(classify(&features, &scale)),
            true,
        );
        widget
    }

    #[test]
    fn test_marker_hit_test() {
        let widget = widget_with_markers();
        let center = widget.viewport().lat_lng_to_pixel(&LatLng::new(0.0, 0.0));

        let hit = widget.marker_at(center).unwrap();
        assert!(hit.popup.contains("Gulf of Guinea"));
        assert!(widget.marker_at(Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_hidden_overlay_is_not_hit() {
        let mut widget = widget_with_markers();
        widget.set_overlay_checked("Earthquakes", false);
        let center = widget.viewport().lat_lng_to_pixel(&LatLng::new(0.0, 0.0));
        assert!(widget.marker_at(center).is_none());
    }

    #[test]
    fn test_checkbox_emits_event_once() {
        let mut widget = widget_with_markers();
        let events = widget.events();

        widget.set_overlay_checked("Earthquakes", false);
        widget.set_overlay_checked("Earthquakes", false);
        widget.set_overlay_checked("Faults", true);

        assert_eq!(events.try_recv().ok(), Some(OverlayEvent::removed("Earthquakes")));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_fit_visible_centers_on_markers() {
        let mut widget = widget_with_markers();
        widget.fit_visible();
        assert!((widget.viewport().center.lng - 5.0).abs() < 1e-9);
        assert!(widget.viewport().zoom > 3.0);
    }

    #[test]
    fn test_first_frame_requests_base_tiles() {
        let mut widget = widget_with_markers();
        widget.set_base_layer(&TileLayer::new(
            "unreachable",
            "http://127.0.0.1:9/{z}/{x}/{y}.png",
        ));
        assert_eq!(widget.pending_tiles(), 0);

        let ctx = egui::Context::default();
        let input = egui::RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))),
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default()
                .frame(egui::Frame::none())
                .show(ctx, |ui| {
                    ui.add(&mut widget);
                });
        });

        let expected = widget.viewport().visible_tiles(MAX_ZOOM).len();
        assert!(expected > 0);
        assert!(widget.pending_tiles() > 0);
        assert!(widget.pending_tiles() <= expected);
    }

    #[test]
    fn test_switching_base_layer_resets_tiles() {
        let mut widget = widget_with_markers();
        let osm = TileLayer::openstreetmap();
        widget.set_base_layer(&osm);
        widget.failed_tiles.insert(TileCoord::new(0, 0, 0));

        widget.set_base_layer(&osm);
        assert_eq!(widget.failed_tiles.len(), 1);

        widget.set_base_layer(&TileLayer::mapbox_light("pk.test"));
        assert!(widget.failed_tiles.is_empty());
        assert_eq!(widget.base_layer().map(|l| l.name.as_str()), Some("Light Map"));
    }

    #[test]
    fn test_surface_calls() {
        let mut widget = widget_with_markers();
        let legend = Legend::build(&ColorScale::from_magnitudes(&[1.0, 5.0]).unwrap());

        widget.attach_legend(&legend, Position::BottomRight);
        assert_eq!(widget.legend().map(|(_, p)| *p), Some(Position::BottomRight));
        widget.detach_legend();
        assert!(widget.legend().is_none());

        widget.show_error("Earthquake data unavailable");
        assert_eq!(widget.errors().len(), 1);
        assert!(widget.is_overlay_visible("Earthquakes"));
    }
}
