//! Animation tracks: declared windows, their evaluation against a frame
//! position, and application to rendering surfaces.

pub mod evaluate;
pub mod surface;
pub mod window;

pub use evaluate::{evaluate, format_number, generate_frame, select_windows, window_value};
pub use surface::{animate_surfaces, RecordingSurface, RenderSurface};
pub use window::{AnimationWindow, Channel};
