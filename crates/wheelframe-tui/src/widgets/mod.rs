mod layer_panel;
mod position_gauge;
mod status_bar;

pub use layer_panel::LayerPanelWidget;
pub use position_gauge::PositionGaugeWidget;
pub use status_bar::StatusBarWidget;
