use crate::{
    layers::{registry::OverlayLayer, tile::TileLayer},
    traits::MapSurface,
    ui::{elements::Position, legend::Legend},
};

/// A surface call as recorded by [`HeadlessSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    SetBaseLayer(String),
    AddOverlay {
        name: String,
        features: usize,
        visible: bool,
    },
    AttachLegend {
        position: Position,
    },
    DetachLegend,
    ShowError(String),
}

/// Surface that draws nothing and remembers everything it was asked to do
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    calls: Vec<SurfaceCall>,
    base_layer: Option<TileLayer>,
    overlays: Vec<(String, OverlayLayer, bool)>,
    legends: Vec<(Legend, Position)>,
    errors: Vec<String>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&SurfaceCall) -> bool,
    {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn base_layer(&self) -> Option<&TileLayer> {
        self.base_layer.as_ref()
    }

    pub fn overlay(&self, name: &str) -> Option<&OverlayLayer> {
        self.overlays
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, layer, _)| layer)
    }

    pub fn overlay_names(&self) -> Vec<&str> {
        self.overlays.iter().map(|(n, _, _)| n.as_str()).collect()
    }

    /// The most recently attached legend, if any is attached
    pub fn legend(&self) -> Option<&Legend> {
        self.legends.last().map(|(legend, _)| legend)
    }

    /// Number of legends currently attached
    pub fn legend_attachments(&self) -> usize {
        self.legends.len()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl MapSurface for HeadlessSurface {
    fn set_base_layer(&mut self, layer: &TileLayer) {
        self.calls.push(SurfaceCall::SetBaseLayer(layer.name.clone()));
        self.base_layer = Some(layer.clone());
    }

    fn add_overlay(&mut self, name: &str, layer: &OverlayLayer, visible: bool) {
        self.calls.push(SurfaceCall::AddOverlay {
            name: name.to_string(),
            features: layer.len(),
            visible,
        });
        self.overlays.push((name.to_string(), layer.clone(), visible));
    }

    fn attach_legend(&mut self, legend: &Legend, position: Position) {
        self.calls.push(SurfaceCall::AttachLegend { position });
        self.legends.push((legend.clone(), position));
    }

    fn detach_legend(&mut self) {
        self.calls.push(SurfaceCall::DetachLegend);
        self.legends.pop();
    }

    fn show_error(&mut self, message: &str) {
        self.calls.push(SurfaceCall::ShowError(message.to_string()));
        self.errors.push(message.to_string());
    }
}
