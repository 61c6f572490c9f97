//! Task handles
//!
//! A [`TaskHandle`] is a cheap, cloneable reference to a scheduled task.
//! It never keeps the scheduler alive, and every mutation on a destroyed
//! task is a silent no-op — that is what makes the two-phase destroy
//! protocol idempotent from the caller's side.

use std::cell::RefCell;
use std::rc::Weak;

use crate::callbacks::FrameResult;
use crate::scheduler::{self, Inner};
use crate::signal::{fulfilled, one_shot, OneShot};
use crate::task::{FrameInfo, Task, TaskKey};

/// Handle to a scheduled task instance.
///
/// A per-frame stream is derivable by re-awaiting [`TaskHandle::next_frame`]
/// until it yields `None`; each call starts a fresh one-shot signal, nothing
/// is shared between callers.
#[derive(Clone)]
pub struct TaskHandle {
    inner: Weak<RefCell<Inner>>,
    key: TaskKey,
}

impl TaskHandle {
    pub(crate) fn new(inner: Weak<RefCell<Inner>>, key: TaskKey) -> Self {
        Self { inner, key }
    }

    /// Stable identity of the task; never reused by the scheduler.
    pub fn key(&self) -> TaskKey {
        self.key
    }

    /// Run `f` against the task if it is still alive. Destroyed tasks (and
    /// dropped schedulers) short-circuit to `None`.
    fn with_task<R>(&self, f: impl FnOnce(&mut Task) -> R) -> Option<R> {
        let inner = self.inner.upgrade()?;
        let mut inner = inner.borrow_mut();
        let task = inner.tasks.get_mut(self.key)?;
        if task.destroyed {
            return None;
        }
        Some(f(task))
    }

    /// Timing snapshot, or `None` once the task's storage is gone.
    ///
    /// Unlike the mutation methods this still answers while the task is
    /// marked destroyed, so destroy callbacks can observe the final state.
    pub fn state(&self) -> Option<FrameInfo> {
        let inner = self.inner.upgrade()?;
        let inner = inner.borrow();
        inner.tasks.get(self.key).map(|task| task.info())
    }

    pub fn pause(&self) {
        self.with_task(|task| task.paused = true);
    }

    pub fn resume(&self) {
        self.with_task(|task| task.paused = false);
    }

    pub fn is_paused(&self) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let inner = inner.borrow();
        inner.tasks.get(self.key).is_some_and(|task| task.paused)
    }

    /// Multiplier applied to every tick delta; negative plays in reverse.
    pub fn set_time_scale(&self, scale: f32) {
        self.with_task(|task| task.time_scale = scale);
    }

    pub fn is_destroyed(&self) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return true;
        };
        let inner = inner.borrow();
        inner
            .tasks
            .get(self.key)
            .map_or(true, |task| task.destroyed)
    }

    pub fn is_complete(&self) -> bool {
        self.state().is_some_and(|info| info.is_complete())
    }

    pub fn progress(&self) -> f32 {
        self.state().map_or(0.0, |info| info.progress())
    }

    /// Request destruction. Idempotent, and safe to call from within the
    /// task's own callbacks: application is deferred to the end of the
    /// current tick (or immediate between ticks).
    pub fn destroy(&self) {
        if let Some(inner) = self.inner.upgrade() {
            scheduler::mark_destroyed(&inner, self.key);
        }
    }

    /// Register a recurring frame callback. No-op if already destroyed.
    pub fn on_frame(&self, callback: impl FnMut(&FrameInfo) -> FrameResult + 'static) {
        self.with_task(|task| task.registries.frame.push(Box::new(callback)));
    }

    /// Register a one-shot callback for the next successful advance.
    /// No-op if already destroyed.
    pub fn on_next_frame(&self, callback: impl FnOnce(&FrameInfo) + 'static) {
        self.with_task(|task| task.registries.next_frame.push(Box::new(callback)));
    }

    /// Register a completion callback. Fires at most once, on the tick
    /// where elapsed time first reaches the duration. No-op if already
    /// destroyed.
    pub fn on_complete(&self, callback: impl FnMut() + 'static) {
        self.with_task(|task| task.registries.complete.push(Box::new(callback)));
    }

    /// Register a destroy callback. Fires exactly once, during the
    /// destroy-application phase. No-op if already destroyed.
    pub fn on_destroy(&self, callback: impl FnMut() + 'static) {
        self.with_task(|task| task.registries.destroy.push(Box::new(callback)));
    }

    /// Resolves after the task's next successful advance, with that frame's
    /// snapshot — or `None` if the task is destroyed first (immediately, if
    /// it already was).
    pub fn next_frame(&self) -> OneShot<Option<FrameInfo>> {
        self.with_task(|task| {
            let (fulfill, signal) = one_shot();
            task.registries.next_frame_waiters.push(fulfill);
            signal
        })
        .unwrap_or_else(|| fulfilled(None))
    }

    /// Resolves once when the task first completes, with the completing
    /// frame's snapshot. Resolves immediately to `None` if the task is
    /// already complete or destroyed, and to `None` later if it is
    /// destroyed without completing.
    pub fn completion(&self) -> OneShot<Option<FrameInfo>> {
        self.with_task(|task| {
            if task.is_complete() {
                fulfilled(None)
            } else {
                let (fulfill, signal) = one_shot();
                task.registries.completion_waiters.push(fulfill);
                signal
            }
        })
        .unwrap_or_else(|| fulfilled(None))
    }

    /// Resolves exactly once when the task is destroyed; immediately if it
    /// already was.
    pub fn destruction(&self) -> OneShot<()> {
        self.with_task(|task| {
            let (fulfill, signal) = one_shot();
            task.registries.destruction_waiters.push(fulfill);
            signal
        })
        .unwrap_or_else(|| fulfilled(()))
    }
}
