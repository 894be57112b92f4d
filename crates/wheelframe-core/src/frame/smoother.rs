//! L4 Atomic Layer: Per-tick smoothing of the displayed frame position
//!
//! The displayed position chases the wheel target at a rate proportional to
//! both the remaining distance and the time since the previous tick, taking
//! the short way around the domain when the policy allows wrapping.

use super::policy::OverflowPolicy;

/// Fraction of the remaining distance covered per elapsed millisecond
pub const LERP: f64 = 0.005;

/// Distance below which the displayed position counts as settled
pub const PRECISION: f64 = 0.01;

/// Signed shortest movement from `current` to `target` in `[0, max]`.
///
/// A wrapping direction is only considered when the policy lets the position
/// cross that boundary. On equal distances the non-wrapping direction wins.
pub fn frame_delta(target: f64, current: f64, max: f64, policy: OverflowPolicy) -> f64 {
    let delta = target - current;
    if delta > 0.0 {
        let forward = delta;
        if !policy.loops_start() {
            return forward;
        }
        let backward = current + (max - target);
        if forward > backward {
            -backward
        } else {
            forward
        }
    } else {
        let backward = current - target;
        if !policy.loops_end() {
            return -backward;
        }
        let forward = (max - current) + target;
        if backward > forward {
            forward
        } else {
            -backward
        }
    }
}

/// Displayed half of the frame state
#[derive(Debug, Clone)]
pub struct FrameSmoother {
    displayed: f64,
    max: f64,
    policy: OverflowPolicy,
    /// Timestamp of the previous tick in milliseconds
    prev_time: Option<f64>,
    /// Whether the initial frame has been emitted
    primed: bool,
}

impl FrameSmoother {
    pub fn new(start: f64, max: f64, policy: OverflowPolicy) -> Self {
        Self {
            displayed: start,
            max,
            policy,
            prev_time: None,
            primed: false,
        }
    }

    /// Current displayed position
    #[inline]
    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    /// Check if the next tick would emit a frame
    #[inline]
    pub fn needs_update(&self, target: f64) -> bool {
        !self.primed || (self.displayed - target).abs() > PRECISION
    }

    /// Advance toward `target` for a tick at `now_ms`.
    ///
    /// Returns the new displayed position when a frame should be broadcast,
    /// `None` when the position is already settled. The very first tick emits
    /// the start position unchanged.
    pub fn step(&mut self, target: f64, now_ms: f64) -> Option<f64> {
        let elapsed = self
            .prev_time
            .map_or(0.0, |prev| (now_ms - prev).max(0.0));
        self.prev_time = Some(now_ms);

        if !self.primed {
            self.primed = true;
            return Some(self.displayed);
        }

        if (self.displayed - target).abs() <= PRECISION {
            return None;
        }

        let delta = frame_delta(target, self.displayed, self.max, self.policy);
        self.displayed = self
            .policy
            .wrap(self.displayed + delta * LERP * elapsed, self.max);
        Some(self.displayed)
    }
}
