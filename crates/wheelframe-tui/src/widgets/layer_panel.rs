use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use wheelframe_core::track::{format_number, select_windows, window_value};

use crate::app::{App, LayerView};

pub struct LayerPanelWidget;

impl LayerPanelWidget {
    /// One bordered panel per layer, stacked vertically
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if app.layers.is_empty() {
            let block = Block::default()
                .title(" Layers ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.grey0))
                .style(Style::default().bg(app.theme.bg0));
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "Scene has no layers. Pass --scene <file> to preview one.",
                Style::default().fg(app.theme.grey2),
            )))
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let constraints: Vec<Constraint> = app
            .layers
            .iter()
            .map(|_| Constraint::Ratio(1, app.layers.len() as u32))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let position = app.session().displayed_position();
        for (i, (layer, row)) in app.layers.iter().zip(rows.iter()).enumerate() {
            Self::render_layer(frame, *row, app, layer, position, i == app.selected);
        }
    }

    fn render_layer(
        frame: &mut Frame,
        area: Rect,
        app: &App,
        layer: &LayerView,
        position: f64,
        is_selected: bool,
    ) {
        let theme = &app.theme;
        let border_style = if is_selected {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.grey0)
        };

        let block = Block::default()
            .title(format!(" {} ", layer.name))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg0));

        let transform = layer.transform().unwrap_or_else(|| "(none)".to_string());
        let mut lines = vec![Line::from(vec![
            Span::styled("transform: ", Style::default().fg(theme.grey2)),
            Span::styled(
                transform,
                Style::default().fg(theme.fg0).add_modifier(Modifier::BOLD),
            ),
        ])];

        // Window breakdown only for the selected layer
        if is_selected {
            let windows = layer.element.windows();
            for (channel, window) in select_windows(position, windows) {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<10}", channel.as_str()),
                        Style::default().fg(theme.accent),
                    ),
                    Span::styled(
                        format!(
                            "[{} → {}] ",
                            format_number(window.start_frame),
                            format_number(window.end_frame)
                        ),
                        Style::default().fg(theme.grey2),
                    ),
                    Span::styled(
                        format!(
                            "{}{}",
                            format_number(window_value(position, window)),
                            window.unit()
                        ),
                        Style::default().fg(theme.fg0),
                    ),
                ]));
            }
            lines.push(Line::from(Span::styled(
                format!("  writes: {}", layer.writes()),
                Style::default().fg(theme.grey0),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}
