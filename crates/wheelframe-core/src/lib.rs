pub mod config;
pub mod driver;
pub mod element;
pub mod error;
pub mod frame;
pub mod registry;
pub mod scene;
pub mod session;
pub mod track;

pub use config::{AppConfig, SessionConfig, DEFAULT_MAX};
pub use driver::{StopReason, TickDriver};
pub use element::AnimatedElement;
pub use error::{Error, Result};
pub use frame::{OverflowPolicy, WheelEvent, WheelOutcome};
pub use registry::{CallbackRegistry, Subscription, SubscriptionId};
pub use scene::{Layer, Scene, ScriptedEvent, SimulatedFrame, MAX_SCENE_MS};
pub use session::{SessionHandle, WheelSession};
pub use track::{AnimationWindow, Channel, RecordingSurface, RenderSurface};
