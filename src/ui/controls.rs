use crate::input::events::{EventSource, OverlayEvent};
use crate::traits::MapSurface;
use crate::ui::{elements::Position, legend::Legend};

/// Whether the legend is currently attached to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendState {
    Visible,
    Hidden,
}

/// Keeps the legend in step with one designated overlay.
///
/// Adding the overlay attaches the legend, removing it detaches the legend.
/// Events for other overlays are ignored, and repeated adds or removes do not
/// touch the surface again.
#[derive(Debug, Clone)]
pub struct LayerVisibilityController {
    overlay: String,
    legend: Legend,
    position: Position,
    state: LegendState,
}

impl LayerVisibilityController {
    pub fn new(overlay: impl Into<String>, legend: Legend, position: Position) -> Self {
        Self {
            overlay: overlay.into(),
            legend,
            position,
            state: LegendState::Hidden,
        }
    }

    pub fn overlay(&self) -> &str {
        &self.overlay
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn state(&self) -> LegendState {
        self.state
    }

    /// Initial sync with the layer control: attach the legend if the
    /// designated overlay starts out visible
    pub fn mount<S>(&mut self, surface: &mut S, overlay_visible: bool)
    where
        S: MapSurface + ?Sized,
    {
        if overlay_visible {
            let event = OverlayEvent::Added(self.overlay.clone());
            self.handle(&event, surface);
        }
    }

    /// Applies one toggle event. Returns the new state when it changed.
    pub fn handle<S>(&mut self, event: &OverlayEvent, surface: &mut S) -> Option<LegendState>
    where
        S: MapSurface + ?Sized,
    {
        if event.overlay() != self.overlay {
            return None;
        }

        match (event, self.state) {
            (OverlayEvent::Added(_), LegendState::Hidden) => {
                surface.attach_legend(&self.legend, self.position);
                self.state = LegendState::Visible;
            }
            (OverlayEvent::Removed(_), LegendState::Visible) => {
                surface.detach_legend();
                self.state = LegendState::Hidden;
            }
            _ => {
                log::debug!("legend already {:?} for {:?}", self.state, event);
                return None;
            }
        }

        log::debug!("legend {:?} after {:?}", self.state, event);
        Some(self.state)
    }

    /// Handles every pending event from `source`
    pub fn drain<E, S>(&mut self, source: &mut E, surface: &mut S)
    where
        E: EventSource + ?Sized,
        S: MapSurface + ?Sized,
    {
        while let Some(event) = source.poll_event() {
            self.handle(&event, surface);
        }
    }
}
