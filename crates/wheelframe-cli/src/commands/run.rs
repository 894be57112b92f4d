use std::io;
use std::path::Path;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use wheelframe_core::{AppConfig, Scene};
use wheelframe_tui::{
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    ui, App, Theme,
};

pub fn run(config: &AppConfig, scene_path: Option<&Path>) -> Result<()> {
    let scene = match scene_path {
        Some(path) => Scene::load(path)?,
        None => Scene::default(),
    };

    // Create app state before touching the terminal so config errors print normally
    let theme = Theme::with_accent(config.ui.accent.as_deref());
    let mut app = App::new(config, &scene, theme)?;
    let event_handler = EventHandler::new(config.ticker.tick_rate_ms);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("wheelframe"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!(frames = app.frames(), "Preview closed");
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        // Advance the session before drawing so the frame shows the newest composite
        app.tick();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = event_handler.next()? {
            match event {
                AppEvent::Key(key) => app.handle_action(handle_key_event(key)),
                AppEvent::Wheel(wheel) => app.on_wheel(wheel),
                AppEvent::Resize(_, _) | AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
