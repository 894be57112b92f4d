use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::frame::{WheelEvent, WheelOutcome};
use crate::session::WheelSession;

/// Why the driver loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown signal fired
    Shutdown,
    /// The session was torn down, possibly by one of its subscribers
    SessionEnded,
}

/// Host-side frame scheduler: forwards wheel events to a session and ticks it
/// at a fixed interval until shutdown.
pub struct TickDriver {
    tick_interval: Duration,
    outcome_tx: Option<mpsc::UnboundedSender<WheelOutcome>>,
}

impl TickDriver {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            outcome_tx: None,
        }
    }

    /// Report every wheel outcome, so the host can decide on its default
    /// scroll handling
    pub fn with_outcome_sender(mut self, tx: mpsc::UnboundedSender<WheelOutcome>) -> Self {
        self.outcome_tx = Some(tx);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    fn send_outcome(&self, outcome: WheelOutcome) {
        if let Some(ref tx) = self.outcome_tx {
            if tx.send(outcome).is_err() {
                warn!("Failed to send wheel outcome: receiver dropped");
            }
        }
    }

    /// Drive `session` until shutdown or until the session ends.
    ///
    /// The session is torn down on return. The first tick fires immediately
    /// and broadcasts the start position.
    pub async fn run(
        &self,
        session: &WheelSession,
        mut wheel_rx: mpsc::UnboundedReceiver<WheelEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> StopReason {
        info!(
            session_id = %session.id(),
            tick_ms = self.tick_interval.as_millis() as u64,
            "Tick driver started"
        );

        let started = Instant::now();
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut wheel_open = true;

        let reason = loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!(session_id = %session.id(), "Tick driver received shutdown signal");
                        break StopReason::Shutdown;
                    }
                }

                event = wheel_rx.recv(), if wheel_open => {
                    match event {
                        Some(event) => match session.on_wheel(event) {
                            Some(outcome) => self.send_outcome(outcome),
                            None => break StopReason::SessionEnded,
                        },
                        None => {
                            debug!(session_id = %session.id(), "Wheel input closed");
                            wheel_open = false;
                        }
                    }
                }

                _ = interval.tick() => {
                    let now_ms = started.elapsed().as_secs_f64() * 1000.0;
                    if let ControlFlow::Break(()) = session.tick(now_ms) {
                        break StopReason::SessionEnded;
                    }
                }
            }
        };

        session.teardown();
        info!(session_id = %session.id(), reason = ?reason, "Tick driver stopped");
        reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::frame::{OverflowPolicy, PRECISION};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session(max: f64) -> WheelSession {
        WheelSession::new(SessionConfig::new(OverflowPolicy::Contain, 0.0, max)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_drives_session_until_shutdown() {
        let session = session(1000.0);
        let log = Rc::new(RefCell::new(Vec::new()));
        let _sub = session
            .handle()
            .subscribe({
                let log = Rc::clone(&log);
                move |position| log.borrow_mut().push(position)
            })
            .unwrap();

        let (wheel_tx, wheel_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let driver = TickDriver::new(Duration::from_millis(16));

        let script = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            wheel_tx.send(WheelEvent::new(100.0)).unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            shutdown_tx.send(true).unwrap();
        };
        let (reason, ()) = tokio::join!(driver.run(&session, wheel_rx, shutdown_rx), script);

        assert_eq!(reason, StopReason::Shutdown);
        assert!(!session.is_live());
        assert!((session.displayed_position() - 100.0).abs() <= PRECISION);

        let log = log.borrow();
        assert_eq!(log[0], 0.0);
        assert!(log.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reports_wheel_outcomes() {
        let session = session(100.0);
        let (wheel_tx, wheel_rx) = mpsc::unbounded_channel();
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let driver = TickDriver::new(Duration::from_millis(16)).with_outcome_sender(outcome_tx);

        let script = async {
            wheel_tx.send(WheelEvent::new(40.0)).unwrap();
            wheel_tx.send(WheelEvent::new(500.0)).unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            shutdown_tx.send(true).unwrap();
        };
        tokio::join!(driver.run(&session, wheel_rx, shutdown_rx), script);

        let first = outcome_rx.recv().await.unwrap();
        assert_eq!(first.target, 40.0);
        assert!(first.captured);
        let second = outcome_rx.recv().await.unwrap();
        // clamped to 200 per event, then contained at max
        assert_eq!(second.target, 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_subscriber_tears_down() {
        let session = Rc::new(session(100.0));
        let _sub = session
            .handle()
            .subscribe({
                let session = Rc::downgrade(&session);
                move |_| {
                    if let Some(session) = session.upgrade() {
                        session.teardown();
                    }
                }
            })
            .unwrap();

        let (_wheel_tx, wheel_rx) = mpsc::unbounded_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let reason = TickDriver::new(Duration::from_millis(16))
            .run(&session, wheel_rx, shutdown_rx)
            .await;

        assert_eq!(reason, StopReason::SessionEnded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_wheel_input_keeps_ticking() {
        let session = session(100.0);
        let (wheel_tx, wheel_rx) = mpsc::unbounded_channel();
        wheel_tx.send(WheelEvent::new(50.0)).unwrap();
        drop(wheel_tx);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let driver = TickDriver::new(Duration::from_millis(16));
        let script = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            shutdown_tx.send(true).unwrap();
        };
        let (reason, ()) = tokio::join!(driver.run(&session, wheel_rx, shutdown_rx), script);

        assert_eq!(reason, StopReason::Shutdown);
        assert!((session.displayed_position() - 50.0).abs() <= PRECISION);
    }
}
