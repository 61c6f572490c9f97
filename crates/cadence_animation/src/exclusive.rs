//! Target exclusivity
//!
//! At most one task may be bound to a given target identity at a time.
//! Binding a new task destroys the previous occupant. The registry is a
//! plain relation: it stores identities, not targets, and never extends a
//! target's lifetime — target ownership stays with the caller.

use std::rc::Rc;

use crate::handle::TaskHandle;
use crate::scheduler::{mark_destroyed, Scheduler};

/// Opaque identity of a task's target.
///
/// Usually derived from the address of the shared target allocation via
/// [`TargetId::of`]; any caller-chosen token works through
/// [`TargetId::from_raw`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetId(usize);

impl TargetId {
    /// Identity of a shared target allocation.
    pub fn of<T: ?Sized>(target: &Rc<T>) -> Self {
        Self(Rc::as_ptr(target).cast::<()>() as usize)
    }

    /// Identity from an arbitrary caller-chosen token.
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }
}

impl Scheduler {
    /// Bind `handle` as the sole task for `target`, destroying any
    /// previous occupant. Binding an already-destroyed task just clears
    /// the slot.
    pub fn set_for(&self, target: TargetId, handle: &TaskHandle) {
        if handle.is_destroyed() {
            self.cancel_for(target);
            return;
        }

        let key = handle.key();
        let previous = {
            let mut inner = self.inner.borrow_mut();
            inner.exclusive.insert(target, key)
        };
        if let Some(previous) = previous {
            if previous != key {
                tracing::debug!(?target, "exclusive target replaced");
                mark_destroyed(&self.inner, previous);
            }
        }

        // Self-removing cleanup, guarded against running stale: by the
        // time this task is destroyed the slot may already belong to a
        // replacement.
        let inner_weak = Rc::downgrade(&self.inner);
        handle.on_destroy(move || {
            if let Some(inner) = inner_weak.upgrade() {
                let mut inner = inner.borrow_mut();
                if inner.exclusive.get(&target) == Some(&key) {
                    inner.exclusive.remove(&target);
                }
            }
        });
    }

    /// The task currently bound to `target`, if any.
    pub fn get_for(&self, target: TargetId) -> Option<TaskHandle> {
        let key = self.inner.borrow().exclusive.get(&target).copied()?;
        Some(TaskHandle::new(Rc::downgrade(&self.inner), key))
    }

    /// Destroy the task currently bound to `target`, if any. The entry is
    /// removed by the task's own cleanup callback.
    pub fn cancel_for(&self, target: TargetId) {
        let key = self.inner.borrow().exclusive.get(&target).copied();
        if let Some(key) = key {
            mark_destroyed(&self.inner, key);
        }
    }
}
