//! Frame position state machine
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `policy` - Overflow policy and the wrap/clamp rule
//! - `wheel` - Wheel delta accumulation into a target position
//! - `smoother` - Shortest-path, time-scaled smoothing of the displayed position
//!
//! Both halves of the frame state share one policy and one domain `[0, max]`;
//! [`crate::session::WheelSession`] wires them together.

pub mod policy;
pub mod smoother;
pub mod wheel;

pub use policy::OverflowPolicy;
pub use smoother::{frame_delta, FrameSmoother, LERP, PRECISION};
pub use wheel::{WheelDeltaAccumulator, WheelEvent, WheelOutcome, MAX_WHEEL_DELTA};
