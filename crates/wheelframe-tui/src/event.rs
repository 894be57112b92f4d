use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind};
use wheelframe_core::WheelEvent;

/// Wheel delta reported for one notch of a terminal mouse wheel.
/// Terminals report notches, not pixel deltas.
pub const WHEEL_NOTCH_DELTA: f64 = 40.0;

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Option<AppEvent>> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => Ok(wheel_from_mouse(mouse.kind).map(AppEvent::Wheel)),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Map a mouse event to a wheel event; scrolling down moves forward
pub fn wheel_from_mouse(kind: MouseEventKind) -> Option<WheelEvent> {
    match kind {
        MouseEventKind::ScrollDown => Some(WheelEvent::new(WHEEL_NOTCH_DELTA)),
        MouseEventKind::ScrollUp => Some(WheelEvent::new(-WHEEL_NOTCH_DELTA)),
        _ => None,
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// The mouse wheel moved
    Wheel(WheelEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::MouseButton;

    #[test]
    fn test_wheel_from_mouse() {
        assert_eq!(
            wheel_from_mouse(MouseEventKind::ScrollDown),
            Some(WheelEvent::new(WHEEL_NOTCH_DELTA))
        );
        assert_eq!(
            wheel_from_mouse(MouseEventKind::ScrollUp),
            Some(WheelEvent::new(-WHEEL_NOTCH_DELTA))
        );
        assert_eq!(wheel_from_mouse(MouseEventKind::Down(MouseButton::Left)), None);
        assert_eq!(wheel_from_mouse(MouseEventKind::Moved), None);
    }
}
