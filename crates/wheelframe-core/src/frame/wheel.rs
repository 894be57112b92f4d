//! L4 Atomic Layer: Wheel input accumulation
//!
//! Turns raw wheel deltas into a target frame position bounded by the
//! session's overflow policy.

use serde::{Deserialize, Serialize};

use super::policy::OverflowPolicy;

/// Largest magnitude a single wheel event may contribute.
/// High-resolution trackpads can report huge deltas in one event.
pub const MAX_WHEEL_DELTA: f64 = 200.0;

/// A discrete scroll input from the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelEvent {
    pub delta_y: f64,
}

impl WheelEvent {
    pub fn new(delta_y: f64) -> Self {
        Self { delta_y }
    }
}

/// Result of feeding one wheel event into the accumulator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelOutcome {
    /// Target position after the event
    pub target: f64,
    /// Whether the host must suppress its default scroll handling.
    /// `false` lets the scroll continue into the surrounding page.
    pub captured: bool,
}

/// Running target position fed by wheel events
#[derive(Debug, Clone)]
pub struct WheelDeltaAccumulator {
    target: f64,
    max: f64,
    policy: OverflowPolicy,
}

impl WheelDeltaAccumulator {
    pub fn new(start: f64, max: f64, policy: OverflowPolicy) -> Self {
        Self {
            target: start,
            max,
            policy,
        }
    }

    /// Current target position
    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Whether an event arriving now would be released to the host
    pub fn releases_input(&self) -> bool {
        self.policy == OverflowPolicy::Overflow && (self.target == 0.0 || self.target == self.max)
    }

    /// Add one wheel delta to the target.
    ///
    /// The capture decision looks at the position before the delta is applied:
    /// under `overflow`, an event arriving while the position already rests on
    /// `0` or `max` is released.
    pub fn accumulate(&mut self, raw_delta: f64) -> WheelOutcome {
        let captured = !self.releases_input();

        if !raw_delta.is_nan() {
            let delta = raw_delta.clamp(-MAX_WHEEL_DELTA, MAX_WHEEL_DELTA);
            self.target = self.policy.wrap(self.target + delta, self.max);
        }

        WheelOutcome {
            target: self.target,
            captured,
        }
    }
}
