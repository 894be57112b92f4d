use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::event::WHEEL_NOTCH_DELTA;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// Feed a synthetic wheel delta into the session
    Nudge(f64),
    /// Cycle the selected layer
    NextLayer,
    PrevLayer,
    ToggleGauge,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Keyboard stand-ins for the wheel
        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::Nudge(WHEEL_NOTCH_DELTA),
        (KeyCode::Down, KeyModifiers::NONE) => Action::Nudge(WHEEL_NOTCH_DELTA),
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::Nudge(-WHEEL_NOTCH_DELTA),
        (KeyCode::Up, KeyModifiers::NONE) => Action::Nudge(-WHEEL_NOTCH_DELTA),
        (KeyCode::PageDown, KeyModifiers::NONE) => Action::Nudge(WHEEL_NOTCH_DELTA * 5.0),
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::Nudge(WHEEL_NOTCH_DELTA * 5.0),
        (KeyCode::PageUp, KeyModifiers::NONE) => Action::Nudge(-WHEEL_NOTCH_DELTA * 5.0),
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::Nudge(-WHEEL_NOTCH_DELTA * 5.0),

        // Layer selection
        (KeyCode::Tab, KeyModifiers::NONE) => Action::NextLayer,
        (KeyCode::Char('l'), KeyModifiers::NONE) => Action::NextLayer,
        (KeyCode::BackTab, _) => Action::PrevLayer,
        (KeyCode::Char('h'), KeyModifiers::NONE) => Action::PrevLayer,

        (KeyCode::Char('g'), KeyModifiers::NONE) => Action::ToggleGauge,

        _ => Action::None,
    }
}
