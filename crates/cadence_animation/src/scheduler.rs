//! Tick-driven task scheduler
//!
//! One external driver calls [`Scheduler::tick`] once per frame. The tick
//! advances every live, non-paused task in insertion order, then applies
//! deferred destructions, then merges tasks created during the tick into
//! the live set. Because neither creation nor destruction mutates the list
//! being iterated, callbacks are free to schedule and destroy tasks —
//! including their own — while the tick is running.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use cadence_core::Clock;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::callbacks::{FrameCallback, FrameResult};
use crate::exclusive::TargetId;
use crate::handle::TaskHandle;
use crate::task::{FrameInfo, Task, TaskKey};

/// Timing configuration for [`Scheduler::schedule_for`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Timing {
    /// Seconds until natural completion; `None` runs unbounded
    pub duration: Option<f32>,
    /// Seconds before the task starts advancing (stored as negative time)
    pub delay: f32,
    /// Invoke the creation callback synchronously once, before any tick
    pub immediate: bool,
}

impl Timing {
    /// A task that runs until explicitly destroyed.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A task that completes after `seconds`.
    pub fn duration(seconds: f32) -> Self {
        Self {
            duration: Some(seconds),
            ..Self::default()
        }
    }

    /// Builder: delay the start by `seconds`.
    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds;
        self
    }

    /// Builder: invoke the creation callback once at creation.
    pub fn immediate(mut self) -> Self {
        self.immediate = true;
        self
    }
}

impl From<f32> for Timing {
    /// A bare number means duration-only.
    fn from(duration: f32) -> Self {
        Timing::duration(duration)
    }
}

impl From<f64> for Timing {
    fn from(duration: f64) -> Self {
        Timing::duration(duration as f32)
    }
}

impl From<(f32, f32)> for Timing {
    /// `(duration, delay)`.
    fn from((duration, delay): (f32, f32)) -> Self {
        Timing::duration(duration).delay(delay)
    }
}

impl From<(f64, f64)> for Timing {
    fn from((duration, delay): (f64, f64)) -> Self {
        Timing::duration(duration as f32).delay(delay as f32)
    }
}

pub(crate) struct Inner {
    pub clock: Clock,
    pub tasks: SlotMap<TaskKey, Task>,
    /// Live set, in insertion order
    pub order: Vec<TaskKey>,
    /// Created while a tick was running; merged at the tick boundary
    pub pending_add: Vec<TaskKey>,
    /// Marked for destruction; applied at the tick boundary
    pub pending_destroy: Vec<TaskKey>,
    /// Target identity -> sole bound task
    pub exclusive: FxHashMap<TargetId, TaskKey>,
    pub ticking: bool,
}

/// The scheduler. Cheap to clone; clones share one task set.
#[derive(Clone)]
pub struct Scheduler {
    pub(crate) inner: Rc<RefCell<Inner>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                clock: Clock::new(),
                tasks: SlotMap::with_key(),
                order: Vec::new(),
                pending_add: Vec::new(),
                pending_destroy: Vec::new(),
                exclusive: FxHashMap::default(),
                ticking: false,
            })),
        }
    }

    /// Snapshot of the frame clock, written exactly once per tick.
    pub fn clock(&self) -> Clock {
        self.inner.borrow().clock
    }

    /// Number of tasks in the live set.
    pub fn task_count(&self) -> usize {
        self.inner.borrow().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.task_count() == 0
    }

    /// Create an unbounded task; it begins advancing on the next tick.
    pub fn schedule(&self) -> TaskHandle {
        self.spawn(Timing::unbounded(), None)
    }

    /// Create an unbounded task with a frame callback.
    pub fn schedule_with(
        &self,
        callback: impl FnMut(&FrameInfo) -> FrameResult + 'static,
    ) -> TaskHandle {
        self.spawn(Timing::unbounded(), Some(Box::new(callback)))
    }

    /// Create a timed task.
    pub fn schedule_for(&self, timing: impl Into<Timing>) -> TaskHandle {
        self.spawn(timing.into(), None)
    }

    /// Create a timed task with a frame callback. With
    /// [`Timing::immediate`], the callback also runs synchronously once at
    /// creation, independent of scheduling.
    pub fn schedule_for_with(
        &self,
        timing: impl Into<Timing>,
        callback: impl FnMut(&FrameInfo) -> FrameResult + 'static,
    ) -> TaskHandle {
        self.spawn(timing.into(), Some(Box::new(callback)))
    }

    fn spawn(&self, timing: Timing, callback: Option<FrameCallback>) -> TaskHandle {
        let run_now = timing.immediate && callback.is_some();
        let key = {
            let mut inner = self.inner.borrow_mut();
            let mut task = Task::new(&inner.clock, timing.duration, timing.delay);
            if let Some(callback) = callback {
                task.registries.frame.push(callback);
            }
            let key = inner.tasks.insert(task);
            if inner.ticking {
                inner.pending_add.push(key);
            } else {
                inner.order.push(key);
            }
            key
        };
        tracing::debug!(?key, "task scheduled");
        if run_now {
            self.run_immediate(key);
        }
        TaskHandle::new(Rc::downgrade(&self.inner), key)
    }

    /// Invoke the creation callback synchronously once, outside any tick.
    fn run_immediate(&self, key: TaskKey) {
        let (mut callbacks, info) = {
            let mut inner = self.inner.borrow_mut();
            let Some(task) = inner.tasks.get_mut(key) else {
                return;
            };
            (mem::take(&mut task.registries.frame), task.info())
        };

        let mut wants_destroy = false;
        for callback in callbacks.iter_mut() {
            if callback(&info) == FrameResult::Destroy {
                wants_destroy = true;
            }
        }

        {
            let mut inner = self.inner.borrow_mut();
            if let Some(task) = inner.tasks.get_mut(key) {
                let registered = mem::replace(&mut task.registries.frame, callbacks);
                task.registries.frame.extend(registered);
            }
        }
        if wants_destroy {
            mark_destroyed(&self.inner, key);
        }
    }

    /// Advance the clock and every live task by `delta_seconds`.
    ///
    /// Zero or negative deltas are accepted and simply produce no forward
    /// progress (or regression, for reverse playback). Re-entrant calls
    /// from inside a callback are ignored.
    pub fn tick(&self, delta_seconds: f32) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.ticking {
                tracing::warn!("re-entrant tick ignored");
                return;
            }
            inner.ticking = true;
            inner.clock.advance(delta_seconds);
        }

        // Advancement pass over a snapshot of the live set: the set itself
        // is only mutated at the boundary below.
        let live: Vec<TaskKey> = self.inner.borrow().order.clone();
        for key in live {
            self.advance_task(key, delta_seconds);
        }

        apply_pending(&self.inner);

        let mut inner = self.inner.borrow_mut();
        let created: Vec<TaskKey> = inner.pending_add.drain(..).collect();
        for key in created {
            // Skip tasks created and destroyed within this same tick
            if inner.tasks.contains_key(key) {
                inner.order.push(key);
            }
        }
        inner.ticking = false;
    }

    fn advance_task(&self, key: TaskKey, delta_seconds: f32) {
        // Take the callbacks out before invoking them: they may reborrow
        // the scheduler to create or destroy tasks.
        let (mut frame_cbs, next_cbs, next_waiters, info) = {
            let mut inner = self.inner.borrow_mut();
            let Some(task) = inner.tasks.get_mut(key) else {
                return;
            };
            if task.destroyed || task.paused {
                return;
            }
            if !task.advance(delta_seconds) {
                // Still delayed: time advanced, frame counter did not
                return;
            }
            (
                mem::take(&mut task.registries.frame),
                mem::take(&mut task.registries.next_frame),
                mem::take(&mut task.registries.next_frame_waiters),
                task.info(),
            )
        };

        let mut wants_destroy = false;
        for callback in frame_cbs.iter_mut() {
            if callback(&info) == FrameResult::Destroy {
                wants_destroy = true;
            }
        }
        for callback in next_cbs {
            callback(&info);
        }
        for waiter in next_waiters {
            waiter.fulfill(Some(info));
        }

        // Put the recurring callbacks back, ahead of any registered while
        // they ran, and pick up completion work.
        let (complete, mut complete_cbs, completion_waiters) = {
            let mut inner = self.inner.borrow_mut();
            let Some(task) = inner.tasks.get_mut(key) else {
                return;
            };
            let registered = mem::replace(&mut task.registries.frame, frame_cbs);
            task.registries.frame.extend(registered);
            if task.is_complete() {
                (
                    true,
                    mem::take(&mut task.registries.complete),
                    mem::take(&mut task.registries.completion_waiters),
                )
            } else {
                (false, SmallVec::new(), SmallVec::new())
            }
        };

        for callback in complete_cbs.iter_mut() {
            callback();
        }
        for waiter in completion_waiters {
            waiter.fulfill(Some(info));
        }

        if wants_destroy || complete {
            mark_destroyed(&self.inner, key);
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Mark a task for destruction. Idempotent: the flag is monotonic and the
/// key is queued at most once. Between ticks the destruction is applied
/// immediately; during a tick it is deferred to the apply phase.
pub(crate) fn mark_destroyed(inner_rc: &Rc<RefCell<Inner>>, key: TaskKey) {
    let apply_now = {
        let mut inner = inner_rc.borrow_mut();
        let Some(task) = inner.tasks.get_mut(key) else {
            return;
        };
        if task.destroyed {
            return;
        }
        task.destroyed = true;
        inner.pending_destroy.push(key);
        !inner.ticking
    };
    if apply_now {
        apply_pending(inner_rc);
    }
}

/// Destroy-application phase: remove each marked task from the live set,
/// clear its frame registries, and fire its destroy callbacks exactly once.
/// Destroy callbacks may mark further tasks; the loop drains those too.
pub(crate) fn apply_pending(inner_rc: &Rc<RefCell<Inner>>) {
    loop {
        let key = {
            let mut inner = inner_rc.borrow_mut();
            if inner.pending_destroy.is_empty() {
                break;
            }
            inner.pending_destroy.remove(0)
        };

        let (mut destroy_cbs, destruction_waiters, next_waiters, completion_waiters) = {
            let mut inner = inner_rc.borrow_mut();
            let Some(task) = inner.tasks.get_mut(key) else {
                continue;
            };
            task.registries.clear_frame_registries();
            let next_waiters = mem::take(&mut task.registries.next_frame_waiters);
            let completion_waiters = mem::take(&mut task.registries.completion_waiters);
            let destroy_cbs = mem::take(&mut task.registries.destroy);
            let destruction_waiters = mem::take(&mut task.registries.destruction_waiters);
            inner.order.retain(|k| *k != key);
            (destroy_cbs, destruction_waiters, next_waiters, completion_waiters)
        };

        // Outstanding one-shot signals resolve to "none": the task will
        // never advance or complete now.
        for waiter in next_waiters {
            waiter.fulfill(None);
        }
        for waiter in completion_waiters {
            waiter.fulfill(None);
        }
        for callback in destroy_cbs.iter_mut() {
            callback();
        }
        for waiter in destruction_waiters {
            waiter.fulfill(());
        }

        // Storage goes last so destroy callbacks can still query state
        inner_rc.borrow_mut().tasks.remove(key);
        tracing::debug!(?key, "task destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_written_once_per_tick() {
        let scheduler = Scheduler::new();
        scheduler.tick(0.1);
        scheduler.tick(0.2);

        let clock = scheduler.clock();
        assert_eq!(clock.frame, 2);
        assert!((clock.time - 0.3).abs() < 1e-6);
        assert!((clock.time_old - 0.1).abs() < 1e-6);
        assert!((clock.delta_time - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_timing_conversions() {
        let t = Timing::from(2.0);
        assert_eq!(t.duration, Some(2.0));
        assert_eq!(t.delay, 0.0);

        let t = Timing::from((2.0, 0.5));
        assert_eq!(t.duration, Some(2.0));
        assert_eq!(t.delay, 0.5);
        assert!(!t.immediate);
    }

    #[test]
    fn test_schedule_enters_live_set() {
        let scheduler = Scheduler::new();
        let handle = scheduler.schedule();
        assert_eq!(scheduler.task_count(), 1);

        handle.destroy();
        assert_eq!(scheduler.task_count(), 0);
        assert!(handle.is_destroyed());
    }
}
