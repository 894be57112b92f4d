use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};
use wheelframe_core::track::format_number;

use crate::app::App;

pub struct PositionGaugeWidget;

impl PositionGaugeWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let session = app.session();
        let label = format!(
            "{} / {}  (target {})",
            format_number(round2(session.displayed_position())),
            format_number(session.config().max),
            format_number(round2(session.target_position())),
        );

        let block = Block::default()
            .title(format!(" Frame · {} ", session.config().overflow_behavior))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.grey0))
            .style(Style::default().bg(app.theme.bg0));

        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(app.theme.accent).bg(app.theme.bg1))
            .ratio(app.position_ratio())
            .label(label);
        frame.render_widget(gauge, area);
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
