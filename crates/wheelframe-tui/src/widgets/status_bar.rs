use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let (input_str, input_color) = match app.last_outcome {
            Some(outcome) if outcome.captured => ("CAPTURED", theme.captured),
            Some(_) => ("RELEASED", theme.released),
            None => ("IDLE", theme.grey2),
        };

        let status_text = if let Some(msg) = &app.status_message {
            msg.clone()
        } else {
            format!(
                " Layers: {} | Subscribers: {} | Frames: {}",
                app.layers.len(),
                app.session().subscriber_count(),
                app.frames()
            )
        };

        let help_hint = " q:quit wheel/j/k:scroll tab:layer g:gauge ";
        let used = input_str.len() + 2 + status_text.len() + help_hint.len();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", input_str),
                Style::default().fg(theme.bg0).bg(input_color),
            ),
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
