//! Surfaces animated by a session.
//!
//! An [`AnimatedElement`] binds its own window list and surfaces to a session
//! for as long as it lives: every broadcast frame position is evaluated against
//! its windows and the composite lands on each of its surfaces.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::registry::Subscription;
use crate::session::SessionHandle;
use crate::track::{animate_surfaces, AnimationWindow, RenderSurface};
use crate::Result;

pub struct AnimatedElement<S: RenderSurface + 'static> {
    windows: Rc<[AnimationWindow]>,
    surfaces: Rc<RefCell<Vec<Option<S>>>>,
    last_transform: Rc<RefCell<Option<String>>>,
    _subscription: Subscription,
}

impl<S: RenderSurface + 'static> AnimatedElement<S> {
    /// Subscribe `surfaces` to the session behind `handle`.
    ///
    /// Fails with [`crate::Error::InvalidContext`] when the session is not live.
    pub fn mount(
        handle: &SessionHandle,
        windows: Vec<AnimationWindow>,
        surfaces: Vec<Option<S>>,
    ) -> Result<Self> {
        let windows: Rc<[AnimationWindow]> = windows.into();
        let surfaces = Rc::new(RefCell::new(surfaces));
        let last_transform = Rc::new(RefCell::new(None));

        let subscription = handle.subscribe({
            let windows = Rc::clone(&windows);
            let surfaces = Rc::clone(&surfaces);
            let last_transform = Rc::clone(&last_transform);
            move |position| {
                let applied = animate_surfaces(position, &windows, surfaces.borrow_mut().as_mut_slice());
                if applied.is_some() {
                    *last_transform.borrow_mut() = applied;
                }
            }
        })?;

        Ok(Self {
            windows,
            surfaces,
            last_transform,
            _subscription: subscription,
        })
    }

    pub fn windows(&self) -> &[AnimationWindow] {
        &self.windows
    }

    pub fn surfaces(&self) -> Ref<'_, Vec<Option<S>>> {
        self.surfaces.borrow()
    }

    /// Composite most recently applied to the surfaces
    pub fn last_transform(&self) -> Option<String> {
        self.last_transform.borrow().clone()
    }

    /// Apply the composite for `position` immediately, outside a broadcast
    pub fn render(&self, position: f64) -> Option<String> {
        let applied = animate_surfaces(position, &self.windows, self.surfaces.borrow_mut().as_mut_slice());
        if applied.is_some() {
            *self.last_transform.borrow_mut() = applied.clone();
        }
        applied
    }
}

impl<S: RenderSurface + 'static> std::fmt::Debug for AnimatedElement<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedElement")
            .field("windows", &self.windows.len())
            .field("surfaces", &self.surfaces.borrow().len())
            .field("last_transform", &self.last_transform.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::frame::{OverflowPolicy, WheelEvent};
    use crate::session::WheelSession;
    use crate::track::{Channel, RecordingSurface};

    fn session() -> WheelSession {
        WheelSession::new(SessionConfig::new(OverflowPolicy::Contain, 0.0, 1000.0)).unwrap()
    }

    fn fade_in() -> Vec<AnimationWindow> {
        vec![
            AnimationWindow::new(0.0, 100.0, 0.0, 100.0, Channel::TranslateY).with_unit("px"),
            AnimationWindow::new(0.0, 100.0, 0.5, 1.0, Channel::Scale),
        ]
    }

    #[test]
    fn test_initial_frame_applied_on_first_tick() {
        let session = session();
        let element =
            AnimatedElement::mount(&session.handle(), fade_in(), vec![Some(RecordingSurface::new())])
                .unwrap();
        assert_eq!(element.last_transform(), None);

        session.tick(0.0);
        assert_eq!(element.last_transform().as_deref(), Some("translateY(0px) scale(0.5)"));
        let surfaces = element.surfaces();
        assert_eq!(
            surfaces[0].as_ref().unwrap().transform(),
            Some("translateY(0px) scale(0.5)")
        );
    }

    #[test]
    fn test_surfaces_follow_session() {
        let session = session();
        let shared = Rc::new(RefCell::new(RecordingSurface::new()));
        let _element =
            AnimatedElement::mount(&session.handle(), fade_in(), vec![Some(Rc::clone(&shared)), None])
                .unwrap();

        session.tick(0.0);
        session.on_wheel(WheelEvent::new(200.0));
        let mut now = 0.0;
        while session.needs_update() {
            now += 16.0;
            session.tick(now);
        }
        // settled within the threshold of 200, past the end of both windows
        assert_eq!(shared.borrow().transform(), Some("translateY(100px) scale(1)"));
        assert!(shared.borrow().writes() > 2);
    }

    #[test]
    fn test_each_element_uses_its_own_windows() {
        let session = session();
        let a = AnimatedElement::mount(
            &session.handle(),
            vec![AnimationWindow::new(0.0, 10.0, 0.0, 10.0, Channel::Rotate).with_unit("deg")],
            vec![Some(RecordingSurface::new())],
        )
        .unwrap();
        let b = AnimatedElement::mount(
            &session.handle(),
            vec![AnimationWindow::new(0.0, 10.0, 1.0, 2.0, Channel::Scale)],
            vec![Some(RecordingSurface::new())],
        )
        .unwrap();

        session.tick(0.0);
        assert_eq!(a.last_transform().as_deref(), Some("rotate(0deg)"));
        assert_eq!(b.last_transform().as_deref(), Some("scale(1)"));
    }

    #[test]
    fn test_empty_declarations_never_touch_surfaces() {
        let session = session();
        let element =
            AnimatedElement::mount(&session.handle(), Vec::new(), vec![Some(RecordingSurface::new())])
                .unwrap();
        session.tick(0.0);
        assert_eq!(element.last_transform(), None);
        assert_eq!(element.surfaces()[0].as_ref().unwrap().writes(), 0);
    }

    #[test]
    fn test_mount_requires_live_session() {
        let result = AnimatedElement::<RecordingSurface>::mount(
            &SessionHandle::detached(),
            fade_in(),
            vec![Some(RecordingSurface::new())],
        );
        assert!(matches!(result, Err(crate::Error::InvalidContext(_))));
    }

    #[test]
    fn test_drop_unmounts() {
        let session = session();
        let element =
            AnimatedElement::mount(&session.handle(), fade_in(), vec![Some(RecordingSurface::new())])
                .unwrap();
        assert_eq!(session.subscriber_count(), 1);
        drop(element);
        assert_eq!(session.subscriber_count(), 0);
    }

    #[test]
    fn test_render_outside_broadcast() {
        let session = session();
        let element =
            AnimatedElement::mount(&session.handle(), fade_in(), vec![Some(RecordingSurface::new())])
                .unwrap();
        assert_eq!(element.render(50.0).as_deref(), Some("translateY(50px) scale(0.75)"));
        assert_eq!(element.last_transform().as_deref(), Some("translateY(50px) scale(0.75)"));
    }
}
