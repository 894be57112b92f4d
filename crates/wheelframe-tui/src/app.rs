use std::cell::Cell;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Instant;

use tracing::debug;
use wheelframe_core::{
    AnimatedElement, AppConfig, RecordingSurface, Scene, Subscription, WheelEvent, WheelOutcome,
    WheelSession,
};

use crate::input::Action;
use crate::theme::Theme;

/// One scene layer mounted on the preview session
pub struct LayerView {
    pub name: String,
    pub element: AnimatedElement<RecordingSurface>,
}

impl LayerView {
    /// Composite currently shown by the layer
    pub fn transform(&self) -> Option<String> {
        self.element.last_transform()
    }

    /// How many times the layer's surface was written
    pub fn writes(&self) -> usize {
        self.element
            .surfaces()
            .iter()
            .flatten()
            .map(RecordingSurface::writes)
            .sum()
    }
}

/// Terminal preview state
pub struct App {
    pub theme: Theme,
    pub layers: Vec<LayerView>,
    pub selected: usize,
    pub show_position: bool,
    pub should_quit: bool,
    /// Outcome of the most recent wheel event
    pub last_outcome: Option<WheelOutcome>,
    pub status_message: Option<String>,
    frames: Rc<Cell<u64>>,
    _frame_counter: Subscription,
    session: WheelSession,
    started: Instant,
}

impl App {
    /// Start a session for `scene` and mount every layer on it
    pub fn new(config: &AppConfig, scene: &Scene, theme: Theme) -> wheelframe_core::Result<Self> {
        let session = WheelSession::new(scene.session_config(config.session))?;
        let handle = session.handle();

        let layers = scene
            .layers
            .iter()
            .map(|layer| {
                let element = AnimatedElement::mount(
                    &handle,
                    layer.animations.clone(),
                    vec![Some(RecordingSurface::new())],
                )?;
                Ok(LayerView {
                    name: layer.name.clone(),
                    element,
                })
            })
            .collect::<wheelframe_core::Result<Vec<_>>>()?;

        let frames = Rc::new(Cell::new(0));
        let frame_counter = handle.subscribe({
            let frames = Rc::clone(&frames);
            move |_| frames.set(frames.get() + 1)
        })?;

        debug!(session_id = %session.id(), layers = layers.len(), "Preview app ready");

        Ok(Self {
            theme,
            layers,
            selected: 0,
            show_position: config.ui.show_position,
            should_quit: false,
            last_outcome: None,
            status_message: None,
            frames,
            _frame_counter: frame_counter,
            session,
            started: Instant::now(),
        })
    }

    pub fn session(&self) -> &WheelSession {
        &self.session
    }

    /// Number of frames broadcast so far
    pub fn frames(&self) -> u64 {
        self.frames.get()
    }

    pub fn selected_layer(&self) -> Option<&LayerView> {
        self.layers.get(self.selected)
    }

    /// Displayed position as a fraction of the domain, for the gauge
    pub fn position_ratio(&self) -> f64 {
        let max = self.session.config().max;
        (self.session.displayed_position() / max).clamp(0.0, 1.0)
    }

    pub fn on_wheel(&mut self, event: WheelEvent) {
        if let Some(outcome) = self.session.on_wheel(event) {
            self.last_outcome = Some(outcome);
            self.status_message = None;
        }
    }

    /// Advance the session using the wall clock
    pub fn tick(&mut self) -> ControlFlow<()> {
        let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.tick_at(now_ms)
    }

    /// Advance the session to `now_ms`; quits once the session has ended
    pub fn tick_at(&mut self, now_ms: f64) -> ControlFlow<()> {
        let flow = self.session.tick(now_ms);
        if flow.is_break() {
            self.should_quit = true;
        }
        flow
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
                self.session.teardown();
            }
            Action::Nudge(delta) => self.on_wheel(WheelEvent::new(delta)),
            Action::NextLayer => {
                if !self.layers.is_empty() {
                    self.selected = (self.selected + 1) % self.layers.len();
                }
            }
            Action::PrevLayer => {
                if !self.layers.is_empty() {
                    self.selected = (self.selected + self.layers.len() - 1) % self.layers.len();
                }
            }
            Action::ToggleGauge => {
                self.show_position = !self.show_position;
                self.status_message = Some(if self.show_position {
                    " Position gauge on".to_string()
                } else {
                    " Position gauge off".to_string()
                });
            }
            Action::None => {}
        }
    }
}
