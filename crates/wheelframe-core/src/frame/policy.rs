//! Boundary behavior of the frame position domain `[0, max]`.

use serde::{Deserialize, Serialize};

/// What happens when the frame position crosses `0` or `max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverflowPolicy {
    /// Wrap around at both ends
    LoopBoth,
    /// Wrap from below `0` to the top of the domain, clamp at `max`
    LoopStart,
    /// Wrap from above `max` to the bottom of the domain, clamp at `0`
    LoopEnd,
    /// Clamp at both ends, but release the input back to the host once the
    /// position rests on a boundary
    Overflow,
    /// Clamp at both ends and always capture the input
    #[default]
    Contain,
}

impl OverflowPolicy {
    pub const ALL: [OverflowPolicy; 5] = [
        OverflowPolicy::LoopBoth,
        OverflowPolicy::LoopStart,
        OverflowPolicy::LoopEnd,
        OverflowPolicy::Overflow,
        OverflowPolicy::Contain,
    ];

    /// Whether a position below `0` wraps to the top of the domain
    #[inline]
    pub fn loops_start(self) -> bool {
        matches!(self, OverflowPolicy::LoopStart | OverflowPolicy::LoopBoth)
    }

    /// Whether a position above `max` wraps to the bottom of the domain
    #[inline]
    pub fn loops_end(self) -> bool {
        matches!(self, OverflowPolicy::LoopEnd | OverflowPolicy::LoopBoth)
    }

    /// Bring `value` back into `[0, max]`.
    ///
    /// Wrapping applies a single period shift (`value + max` or `value - max`),
    /// which is enough for any step smaller than the domain.
    pub fn wrap(self, value: f64, max: f64) -> f64 {
        if value < 0.0 {
            if self.loops_start() {
                value + max
            } else {
                0.0
            }
        } else if value > max {
            if self.loops_end() {
                value - max
            } else {
                max
            }
        } else {
            value
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OverflowPolicy::LoopBoth => "loopBoth",
            OverflowPolicy::LoopStart => "loopStart",
            OverflowPolicy::LoopEnd => "loopEnd",
            OverflowPolicy::Overflow => "overflow",
            OverflowPolicy::Contain => "contain",
        }
    }
}

impl std::fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OverflowPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        OverflowPolicy::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::Error::Config(format!("unknown overflow behavior: {}", s)))
    }
}
