//! Rendering surface seam and composite application.

use std::cell::RefCell;
use std::rc::Rc;

use super::evaluate::evaluate;
use super::window::AnimationWindow;

/// A mutable style target that accepts a composite transform string
pub trait RenderSurface {
    fn set_transform(&mut self, transform: &str);
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn set_transform(&mut self, transform: &str) {
        (**self).set_transform(transform);
    }
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn set_transform(&mut self, transform: &str) {
        (**self).set_transform(transform);
    }
}

/// Shared surface, as held by an element and its host at the same time
impl<S: RenderSurface + ?Sized> RenderSurface for Rc<RefCell<S>> {
    fn set_transform(&mut self, transform: &str) {
        self.borrow_mut().set_transform(transform);
    }
}

/// In-memory surface that keeps the last transform it received
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    transform: Option<String>,
    writes: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last applied transform, if any
    pub fn transform(&self) -> Option<&str> {
        self.transform.as_deref()
    }

    /// Number of times a transform was applied
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl RenderSurface for RecordingSurface {
    fn set_transform(&mut self, transform: &str) {
        self.transform = Some(transform.to_string());
        self.writes += 1;
    }
}

/// Evaluate `windows` at `position` and write the composite verbatim to every
/// present surface.
///
/// Does nothing when there are no surfaces or no windows. Returns the
/// composite that was applied.
pub fn animate_surfaces<S: RenderSurface>(
    position: f64,
    windows: &[AnimationWindow],
    surfaces: &mut [Option<S>],
) -> Option<String> {
    if surfaces.is_empty() || windows.is_empty() {
        return None;
    }
    let transform = evaluate(position, windows)?;
    for surface in surfaces.iter_mut().flatten() {
        surface.set_transform(&transform);
    }
    Some(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Channel;

    #[test]
    fn test_identical_composite_on_every_surface() {
        let windows = [
            AnimationWindow::new(0.0, 10.0, 0.0, 100.0, Channel::TranslateX).with_unit("px"),
        ];
        let mut surfaces = [Some(RecordingSurface::new()), None, Some(RecordingSurface::new())];

        let applied = animate_surfaces(2.5, &windows, &mut surfaces);
        assert_eq!(applied.as_deref(), Some("translateX(25px)"));
        for surface in surfaces.iter().flatten() {
            assert_eq!(surface.transform(), Some("translateX(25px)"));
            assert_eq!(surface.writes(), 1);
        }
    }

    #[test]
    fn test_noop_without_windows_or_surfaces() {
        let mut surfaces = [Some(RecordingSurface::new())];
        assert_eq!(animate_surfaces(1.0, &[], &mut surfaces), None);
        assert_eq!(surfaces[0].as_ref().unwrap().writes(), 0);

        let windows = [AnimationWindow::new(0.0, 1.0, 0.0, 1.0, Channel::Scale)];
        let mut none: [Option<RecordingSurface>; 0] = [];
        assert_eq!(animate_surfaces(1.0, &windows, &mut none), None);
    }

    #[test]
    fn test_borrowed_surfaces() {
        let mut a = RecordingSurface::new();
        let mut b = RecordingSurface::new();
        let windows = [AnimationWindow::new(0.0, 4.0, 1.0, 2.0, Channel::Scale)];
        {
            let mut surfaces: [Option<&mut RecordingSurface>; 2] = [Some(&mut a), Some(&mut b)];
            animate_surfaces(1.0, &windows, &mut surfaces);
        }
        assert_eq!(a.transform(), Some("scale(1.25)"));
        assert_eq!(b.transform(), Some("scale(1.25)"));
    }
}
