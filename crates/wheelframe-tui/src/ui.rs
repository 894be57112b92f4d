use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::App;
use crate::widgets::{LayerPanelWidget, PositionGaugeWidget, StatusBarWidget};

/// Draw the whole preview: gauge on top (when enabled), layers, status bar
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let gauge_height = if app.show_position { 3 } else { 0 };
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(gauge_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(size);

    if app.show_position {
        PositionGaugeWidget::render(frame, main_layout[0], app);
    }
    LayerPanelWidget::render(frame, main_layout[1], app);
    StatusBarWidget::render(frame, main_layout[2], app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use ratatui::{backend::TestBackend, Terminal};
    use wheelframe_core::{AppConfig, Scene};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_draws_layers_and_status() {
        let scene = Scene::from_toml_str(
            r#"
            [session]
            max = 100

            [[layers]]
            name = "card"
            [[layers.animations]]
            startFrame = 0
            endFrame = 100
            start = 1
            end = 2
            type = "scale"
            "#,
        )
        .unwrap();
        let mut app = App::new(&AppConfig::default(), &scene, Theme::default()).unwrap();
        app.tick_at(0.0);

        let text = screen(&app);
        assert!(text.contains("card"));
        assert!(text.contains("scale(1)"));
        assert!(text.contains("IDLE"));
        assert!(text.contains("Frames: 1"));
    }

    #[test]
    fn test_draws_empty_scene() {
        let mut app = App::new(&AppConfig::default(), &Scene::default(), Theme::default()).unwrap();
        app.show_position = false;
        let text = screen(&app);
        assert!(text.contains("Scene has no layers"));
    }
}
