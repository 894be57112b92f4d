//! Frame subscribers.
//!
//! Callbacks live in an id-keyed arena. A broadcast iterates over a snapshot of
//! the arena, so subscribers may add or remove members (themselves included)
//! while a broadcast is in progress.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

type FrameCallback = Rc<RefCell<dyn FnMut(f64)>>;

/// Identity of one subscription, stable for its lifetime and never reused
/// within a registry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Members {
    next_id: u64,
    callbacks: BTreeMap<SubscriptionId, FrameCallback>,
}

impl Members {
    fn alloc_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

/// Shared set of frame callbacks. Clones refer to the same set.
#[derive(Clone, Default)]
pub struct CallbackRegistry {
    members: Rc<RefCell<Members>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked with the position on every broadcast
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: FnMut(f64) + 'static,
    {
        let mut members = self.members.borrow_mut();
        let id = members.alloc_id();
        members
            .callbacks
            .insert(id, Rc::new(RefCell::new(callback)));
        id
    }

    /// Like [`subscribe`](Self::subscribe), but removed when the returned
    /// guard is dropped
    pub fn subscribe_guarded<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(f64) + 'static,
    {
        let id = self.subscribe(callback);
        Subscription {
            members: Rc::downgrade(&self.members),
            id,
        }
    }

    /// Remove a subscription. Unknown ids are ignored.
    ///
    /// Returns whether a callback was removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        // Released outside the borrow: dropping a callback may drop guards
        // that touch this registry.
        let removed = self.members.borrow_mut().callbacks.remove(&id);
        removed.is_some()
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.members.borrow().callbacks.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.members.borrow().callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.borrow().callbacks.is_empty()
    }

    pub fn clear(&self) {
        let removed = std::mem::take(&mut self.members.borrow_mut().callbacks);
        drop(removed);
    }

    /// Invoke every registered callback with `position`, in registration order.
    ///
    /// Members added during the broadcast are first called on the next one.
    /// Members removed before being reached are skipped. A callback that
    /// triggers a nested broadcast is not invoked again by it.
    ///
    /// Returns the number of callbacks invoked.
    pub fn run(&self, position: f64) -> usize {
        let snapshot: Vec<(SubscriptionId, FrameCallback)> = self
            .members
            .borrow()
            .callbacks
            .iter()
            .map(|(id, callback)| (*id, Rc::clone(callback)))
            .collect();

        let mut invoked = 0;
        for (id, callback) in snapshot {
            if !self.contains(id) {
                continue;
            }
            let Ok(mut callback) = callback.try_borrow_mut() else {
                continue;
            };
            (&mut *callback)(position);
            invoked += 1;
        }
        invoked
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("len", &self.len())
            .finish()
    }
}

/// Guard returned by [`CallbackRegistry::subscribe_guarded`].
///
/// Holds only a weak reference, so it never keeps a discarded registry alive.
#[derive(Debug)]
#[must_use = "dropping a Subscription unsubscribes it"]
pub struct Subscription {
    members: Weak<RefCell<Members>>,
    id: SubscriptionId,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Whether the callback is still registered
    pub fn is_active(&self) -> bool {
        self.members
            .upgrade()
            .is_some_and(|members| members.borrow().callbacks.contains_key(&self.id))
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(members) = self.members.upgrade() {
            let removed = members.borrow_mut().callbacks.remove(&self.id);
            drop(removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder(log: &Rc<RefCell<Vec<(&'static str, f64)>>>, name: &'static str) -> impl FnMut(f64) {
        let log = Rc::clone(log);
        move |position| log.borrow_mut().push((name, position))
    }

    #[test]
    fn test_run_invokes_in_registration_order() {
        let registry = CallbackRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        registry.subscribe(recorder(&log, "a"));
        registry.subscribe(recorder(&log, "b"));
        registry.subscribe(recorder(&log, "c"));

        assert_eq!(registry.run(4.0), 3);
        assert_eq!(*log.borrow(), vec![("a", 4.0), ("b", 4.0), ("c", 4.0)]);
    }

    #[test]
    fn test_unsubscribe_unknown_is_noop() {
        let registry = CallbackRegistry::new();
        let id = registry.subscribe(|_| {});
        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let registry = CallbackRegistry::new();
        let first = registry.subscribe(|_| {});
        registry.unsubscribe(first);
        let second = registry.subscribe(|_| {});
        assert_ne!(first, second);
    }

    #[test]
    fn test_self_unsubscribe_during_run() {
        let registry = CallbackRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let own_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        registry.subscribe(recorder(&log, "a"));
        let id = registry.subscribe({
            let registry = registry.clone();
            let own_id = Rc::clone(&own_id);
            let mut inner = recorder(&log, "b");
            move |position| {
                inner(position);
                if let Some(id) = own_id.get() {
                    registry.unsubscribe(id);
                }
            }
        });
        own_id.set(Some(id));
        registry.subscribe(recorder(&log, "c"));

        registry.run(1.0);
        registry.run(2.0);
        assert_eq!(
            *log.borrow(),
            vec![("a", 1.0), ("b", 1.0), ("c", 1.0), ("a", 2.0), ("c", 2.0)]
        );
    }

    #[test]
    fn test_removing_later_member_during_run_skips_it() {
        let registry = CallbackRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let victim: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        registry.subscribe({
            let registry = registry.clone();
            let victim = Rc::clone(&victim);
            let mut inner = recorder(&log, "a");
            move |position| {
                inner(position);
                if let Some(id) = victim.take() {
                    registry.unsubscribe(id);
                }
            }
        });
        victim.set(Some(registry.subscribe(recorder(&log, "b"))));
        registry.subscribe(recorder(&log, "c"));

        registry.run(1.0);
        assert_eq!(*log.borrow(), vec![("a", 1.0), ("c", 1.0)]);
    }

    #[test]
    fn test_subscribe_during_run_waits_for_next_run() {
        let registry = CallbackRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let added = Rc::new(Cell::new(false));

        registry.subscribe({
            let registry = registry.clone();
            let log = Rc::clone(&log);
            let added = Rc::clone(&added);
            move |_| {
                if !added.replace(true) {
                    registry.subscribe(recorder(&log, "late"));
                }
            }
        });

        registry.run(1.0);
        assert!(log.borrow().is_empty());
        registry.run(2.0);
        assert_eq!(*log.borrow(), vec![("late", 2.0)]);
    }

    #[test]
    fn test_nested_run_skips_running_callback() {
        let registry = CallbackRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        registry.subscribe({
            let registry = registry.clone();
            let mut inner = recorder(&log, "outer");
            move |position| {
                inner(position);
                if position < 10.0 {
                    registry.run(position + 10.0);
                }
            }
        });
        registry.subscribe(recorder(&log, "b"));

        registry.run(1.0);
        assert_eq!(
            *log.borrow(),
            vec![("outer", 1.0), ("b", 11.0), ("b", 1.0)]
        );
    }

    #[test]
    fn test_guard_unsubscribes_on_drop() {
        let registry = CallbackRegistry::new();
        let hits = Rc::new(Cell::new(0));
        let guard = registry.subscribe_guarded({
            let hits = Rc::clone(&hits);
            move |_| hits.set(hits.get() + 1)
        });
        assert!(guard.is_active());
        registry.run(0.0);
        drop(guard);
        registry.run(0.0);
        assert_eq!(hits.get(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dropping_callback_may_drop_other_guards() {
        let registry = CallbackRegistry::new();
        let inner_guard = registry.subscribe_guarded(|_| {});
        let outer = registry.subscribe_guarded(move |_| {
            let _ = inner_guard.id();
        });
        assert_eq!(registry.len(), 2);
        drop(outer);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_guard_outlives_registry() {
        let registry = CallbackRegistry::new();
        let guard = registry.subscribe_guarded(|_| {});
        drop(registry);
        assert!(!guard.is_active());
        guard.unsubscribe();
    }
}
