//! One wheel animation session.
//!
//! A session owns both halves of the frame state, the overflow policy, and
//! the subscriber set. Hosts feed it wheel events and ticks; consumers reach it
//! through a [`SessionHandle`] instead of any ambient lookup.

use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::rc::{Rc, Weak};

use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::frame::{FrameSmoother, WheelDeltaAccumulator, WheelEvent, WheelOutcome};
use crate::registry::{CallbackRegistry, Subscription};
use crate::{Error, Result};

struct SessionInner {
    id: Uuid,
    config: SessionConfig,
    wheel: RefCell<WheelDeltaAccumulator>,
    smoother: RefCell<FrameSmoother>,
    registry: CallbackRegistry,
    live: Cell<bool>,
}

/// Owner of one session. Dropping it tears the session down.
pub struct WheelSession {
    inner: Rc<SessionInner>,
}

impl WheelSession {
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;

        let policy = config.overflow_behavior;
        let inner = SessionInner {
            id: Uuid::new_v4(),
            config,
            wheel: RefCell::new(WheelDeltaAccumulator::new(config.start, config.max, policy)),
            smoother: RefCell::new(FrameSmoother::new(config.start, config.max, policy)),
            registry: CallbackRegistry::new(),
            live: Cell::new(true),
        };
        info!(
            session_id = %inner.id,
            overflow = %policy,
            start = config.start,
            max = config.max,
            "Wheel session started"
        );

        Ok(Self {
            inner: Rc::new(inner),
        })
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Handle for subscribing to frames; valid while the session is live
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.inner.live.get()
    }

    /// Position the displayed frame is moving toward
    pub fn target_position(&self) -> f64 {
        self.inner.wheel.borrow().target()
    }

    /// Position most recently broadcast (or the start position)
    pub fn displayed_position(&self) -> f64 {
        self.inner.smoother.borrow().displayed()
    }

    /// Whether the next tick would broadcast a frame
    pub fn needs_update(&self) -> bool {
        let target = self.target_position();
        self.inner.smoother.borrow().needs_update(target)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.registry.len()
    }

    /// Apply one wheel event to the target position.
    ///
    /// Returns `None` once the session is torn down (the input listener is
    /// gone). Otherwise `captured` tells the host whether to suppress its
    /// default scroll handling.
    pub fn on_wheel(&self, event: WheelEvent) -> Option<WheelOutcome> {
        if !self.is_live() {
            return None;
        }

        let outcome = self.inner.wheel.borrow_mut().accumulate(event.delta_y);
        if outcome.captured {
            trace!(session_id = %self.inner.id, delta = event.delta_y, target = outcome.target, "Wheel captured");
        } else {
            debug!(session_id = %self.inner.id, target = outcome.target, "Wheel released to host");
        }
        Some(outcome)
    }

    /// One smoothing step for the tick at `now_ms` (host clock, milliseconds).
    ///
    /// Broadcasts the new displayed position when it moved. Returns
    /// `Break` when the loop must not be rescheduled because the session is
    /// torn down, including when a subscriber tore it down during this tick.
    pub fn tick(&self, now_ms: f64) -> ControlFlow<()> {
        if !self.is_live() {
            return ControlFlow::Break(());
        }

        let target = self.target_position();
        let frame = self.inner.smoother.borrow_mut().step(target, now_ms);
        if let Some(position) = frame {
            let invoked = self.inner.registry.run(position);
            trace!(session_id = %self.inner.id, position, target, invoked, "Frame broadcast");
        }

        if self.is_live() {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    }

    /// Stop ticking and input handling. Existing subscriptions stay harmless.
    pub fn teardown(&self) {
        if self.inner.live.replace(false) {
            info!(session_id = %self.inner.id, "Wheel session torn down");
        }
    }
}

impl Drop for WheelSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for WheelSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WheelSession")
            .field("id", &self.inner.id)
            .field("config", &self.inner.config)
            .field("live", &self.is_live())
            .field("target", &self.target_position())
            .field("displayed", &self.displayed_position())
            .finish()
    }
}

/// Non-owning reference to a session.
///
/// A detached handle (or one whose session is gone) refuses subscriptions
/// with [`Error::InvalidContext`].
#[derive(Clone, Debug, Default)]
pub struct SessionHandle {
    inner: Weak<SessionInner>,
}

impl SessionHandle {
    /// Handle that belongs to no session
    pub fn detached() -> Self {
        Self::default()
    }

    fn live_inner(&self) -> Result<Rc<SessionInner>> {
        self.inner
            .upgrade()
            .filter(|inner| inner.live.get())
            .ok_or(Error::InvalidContext(
                "frame subscription requires a live wheel session",
            ))
    }

    pub fn is_live(&self) -> bool {
        self.live_inner().is_ok()
    }

    /// Subscribe to every broadcast frame position of the session
    pub fn subscribe<F>(&self, callback: F) -> Result<Subscription>
    where
        F: FnMut(f64) + 'static,
    {
        let inner = self.live_inner()?;
        Ok(inner.registry.subscribe_guarded(callback))
    }

    /// Displayed position of the session
    pub fn displayed_position(&self) -> Result<f64> {
        let inner = self.live_inner()?;
        let displayed = inner.smoother.borrow().displayed();
        Ok(displayed)
    }

    pub fn config(&self) -> Result<SessionConfig> {
        Ok(self.live_inner()?.config)
    }
}
