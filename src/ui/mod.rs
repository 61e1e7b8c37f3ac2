pub mod controls;
pub mod elements;
pub mod legend;
pub mod popup;

#[cfg(feature = "egui")]
pub mod widget;

pub use controls::{LayerVisibilityController, LegendState};
pub use elements::Position;
pub use legend::{Legend, LegendBin, LegendSampling};
pub use popup::Popup;

#[cfg(feature = "egui")]
pub use widget::QuakeMapWidget;
