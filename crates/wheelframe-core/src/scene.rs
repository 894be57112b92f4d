//! Scene files: named layers of animation windows plus an optional session
//! override and a scripted wheel timeline.

use std::cell::Cell;
use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SessionConfig;
use crate::element::AnimatedElement;
use crate::frame::WheelEvent;
use crate::session::WheelSession;
use crate::track::{evaluate, AnimationWindow, RecordingSurface};
use crate::{Error, Result};

/// Longest timeline a scene may describe: event times and simulated
/// durations, in milliseconds (24 hours)
pub const MAX_SCENE_MS: u64 = 86_400_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Overrides the configured session parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    /// Wheel events replayed by [`Scene::simulate`]
    #[serde(default)]
    pub events: Vec<ScriptedEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub name: String,
    #[serde(default)]
    pub animations: Vec<AnimationWindow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptedEvent {
    pub at_ms: f64,
    pub delta_y: f64,
}

/// One broadcast observed during a simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedFrame {
    pub at_ms: f64,
    pub position: f64,
    /// Composite of every layer, in scene order
    pub transforms: Vec<(String, Option<String>)>,
}

impl Scene {
    /// Load a scene, choosing the format from the file extension
    /// (`.json` is JSON, anything else TOML)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let scene = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        debug!(path = %path.display(), layers = scene.layers.len(), "Loaded scene");
        Ok(scene)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scene: Self = toml::from_str(content).map_err(|e| Error::Scene(e.to_string()))?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let scene: Self = serde_json::from_str(content)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Layer names must be non-empty and unique, event times within
    /// `[0, MAX_SCENE_MS]`. Degenerate windows are accepted.
    pub fn validate(&self) -> Result<()> {
        if let Some(session) = &self.session {
            session.validate()?;
        }

        let mut seen = HashSet::new();
        for layer in &self.layers {
            if layer.name.trim().is_empty() {
                return Err(Error::Scene("layer name must not be empty".to_string()));
            }
            if !seen.insert(layer.name.as_str()) {
                return Err(Error::Scene(format!("duplicate layer name: {}", layer.name)));
            }
        }

        for event in &self.events {
            if !event.at_ms.is_finite() || event.at_ms < 0.0 {
                return Err(Error::Scene(format!(
                    "event time must be a non-negative number, got {}",
                    event.at_ms
                )));
            }
            if event.at_ms > MAX_SCENE_MS as f64 {
                return Err(Error::Scene(format!(
                    "event time must not exceed {}ms, got {}",
                    MAX_SCENE_MS, event.at_ms
                )));
            }
        }
        Ok(())
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    /// Session parameters of this scene, falling back to `configured`
    pub fn session_config(&self, configured: SessionConfig) -> SessionConfig {
        self.session.unwrap_or(configured)
    }

    /// Composite of every layer at `position`
    pub fn evaluate_layers(&self, position: f64) -> Vec<(&str, Option<String>)> {
        self.layers
            .iter()
            .map(|layer| (layer.name.as_str(), evaluate(position, &layer.animations)))
            .collect()
    }

    /// Replay the scripted events against a fresh session on a virtual clock.
    ///
    /// Ticks at `0, tick_ms, 2 * tick_ms, ..` up to `duration_ms`. Events due
    /// at or before a tick are delivered before it. Returns every broadcast.
    pub fn simulate(
        &self,
        config: SessionConfig,
        duration_ms: u64,
        tick_ms: u64,
    ) -> Result<Vec<SimulatedFrame>> {
        if tick_ms == 0 {
            return Err(Error::Config("tick interval must be greater than 0".to_string()));
        }
        if duration_ms > MAX_SCENE_MS {
            return Err(Error::Config(format!(
                "simulation duration must not exceed {}ms, got {}",
                MAX_SCENE_MS, duration_ms
            )));
        }

        let session = WheelSession::new(config)?;
        let handle = session.handle();

        let elements = self
            .layers
            .iter()
            .map(|layer| {
                AnimatedElement::mount(
                    &handle,
                    layer.animations.clone(),
                    vec![Some(RecordingSurface::new())],
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let broadcast = Rc::new(Cell::new(None));
        let _recorder = handle.subscribe({
            let broadcast = Rc::clone(&broadcast);
            move |position| broadcast.set(Some(position))
        })?;

        let mut events = self.events.clone();
        events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
        let mut pending = events.into_iter().peekable();

        let mut frames = Vec::new();
        let mut now = 0;
        while now <= duration_ms {
            let at_ms = now as f64;
            while let Some(event) = pending.next_if(|event| event.at_ms <= at_ms) {
                session.on_wheel(WheelEvent::new(event.delta_y));
            }

            if session.tick(at_ms).is_break() {
                break;
            }
            if let Some(position) = broadcast.take() {
                let transforms = self
                    .layers
                    .iter()
                    .zip(&elements)
                    .map(|(layer, element)| (layer.name.clone(), element.last_transform()))
                    .collect();
                frames.push(SimulatedFrame {
                    at_ms,
                    position,
                    transforms,
                });
            }
            match now.checked_add(tick_ms) {
                Some(next) => now = next,
                None => break,
            }
        }

        debug!(session_id = %session.id(), frames = frames.len(), "Simulation finished");
        Ok(frames)
    }
}
