//! Seams between the map logic and whatever draws it.

use crate::layers::{registry::OverlayLayer, tile::TileLayer};
use crate::ui::{elements::Position, legend::Legend};

/// A map rendering surface.
///
/// The surface receives drawable layers and controls; it owns no map logic.
/// Overlay visibility changes flow back out of the surface as
/// [`OverlayEvent`](crate::input::events::OverlayEvent)s.
pub trait MapSurface {
    /// Select the base tile layer
    fn set_base_layer(&mut self, layer: &TileLayer);

    /// Register a named overlay with the layer control
    fn add_overlay(&mut self, name: &str, layer: &OverlayLayer, visible: bool);

    /// Show the legend anchored to `position`
    fn attach_legend(&mut self, legend: &Legend, position: Position);

    /// Remove the legend
    fn detach_legend(&mut self);

    /// Render a visible error state
    fn show_error(&mut self, message: &str);
}
