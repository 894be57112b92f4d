//! Per-channel window selection and composite formatting.

use std::fmt::Write as _;

use super::window::{AnimationWindow, Channel};

/// Pick the governing window for each channel at `position`.
///
/// Channels appear in the order they are first declared. Within a channel:
/// - the first declared window is the fallback while `position` precedes
///   every start
/// - an active window (`start_frame <= position <= end_frame`) always wins
/// - among finished windows, the one ending latest wins
///
/// Overlapping active windows resolve to the last declared one.
pub fn select_windows(position: f64, windows: &[AnimationWindow]) -> Vec<(Channel, &AnimationWindow)> {
    let mut selected: Vec<(Channel, &AnimationWindow)> = Vec::with_capacity(4);

    for window in windows {
        let slot = match selected.iter().position(|(channel, _)| *channel == window.channel) {
            Some(idx) => idx,
            None => {
                selected.push((window.channel, window));
                selected.len() - 1
            }
        };

        if position >= window.start_frame {
            let current = &mut selected[slot].1;
            if position <= window.end_frame || current.end_frame < window.end_frame {
                *current = window;
            }
        }
    }

    selected
}

/// Interpolated value of `window` at `position`, held at the ends
pub fn window_value(position: f64, window: &AnimationWindow) -> f64 {
    if position < window.start_frame {
        return window.start;
    }
    if position > window.end_frame {
        return window.end;
    }
    let amount = window.end - window.start;
    let offset = position - window.start_frame;
    let progress = offset / (window.end_frame - window.start_frame);
    window.start + amount * progress
}

/// One composite term, e.g. `translateX(12.5px)`
pub fn generate_frame(position: f64, window: &AnimationWindow) -> String {
    let mut term = String::new();
    write_term(&mut term, position, window);
    term
}

/// Composite transform for `position`, or `None` when no channel has a window
pub fn evaluate(position: f64, windows: &[AnimationWindow]) -> Option<String> {
    let selected = select_windows(position, windows);
    if selected.is_empty() {
        return None;
    }

    let mut composite = String::new();
    for (idx, (_, window)) in selected.iter().enumerate() {
        if idx > 0 {
            composite.push(' ');
        }
        write_term(&mut composite, position, window);
    }
    Some(composite)
}

fn write_term(out: &mut String, position: f64, window: &AnimationWindow) {
    let _ = write!(
        out,
        "{}({}{})",
        window.channel,
        format_number(window_value(position, window)),
        window.unit()
    );
}

/// Shortest round-trip decimal form: `80`, `7.5`, `NaN`, `Infinity`.
/// Negative zero prints as `0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
