//! Property tweens
//!
//! A tween is one scheduled task that interpolates named properties of a
//! shared target between two endpoint snapshots. Endpoints are captured at
//! spawn time — composite values clone their field maps — so mutating the
//! live target afterwards never moves the goalposts. Tweens are
//! target-exclusive: spawning a second tween for the same target cancels
//! the first.

use std::cell::RefCell;
use std::rc::Rc;

use cadence_core::{Animatable, Easing, Value};
use rustc_hash::FxHashMap;

use crate::callbacks::FrameResult;
use crate::exclusive::TargetId;
use crate::handle::TaskHandle;
use crate::scheduler::{Scheduler, Timing};
use crate::task::FrameInfo;

/// Builder for a property tween.
///
/// The key set is the union of the `from` and `to` keys; a key given on
/// only one side snapshots the target's current value for the other.
#[derive(Default)]
pub struct Tween {
    from: FxHashMap<String, Value>,
    to: FxHashMap<String, Value>,
    easing: Easing,
    on_change: Option<Box<dyn FnMut()>>,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl Tween {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit starting value for `key`.
    pub fn from(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.from.insert(key.into(), value.into());
        self
    }

    /// Ending value for `key`.
    pub fn to(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.to.insert(key.into(), value.into());
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Easing by table name; unknown names fall back to linear.
    pub fn ease_named(self, name: &str) -> Self {
        self.ease(Easing::by_name(name))
    }

    /// Fires every frame, after interpolation has been applied.
    pub fn on_change(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn on_complete(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Snapshot the endpoints against `target` and schedule the tween.
    ///
    /// Replaces any tween already bound to the same target allocation.
    pub fn spawn<T: Animatable + 'static>(
        self,
        scheduler: &Scheduler,
        target: &Rc<RefCell<T>>,
        timing: impl Into<Timing>,
    ) -> TaskHandle {
        let Tween {
            mut from,
            mut to,
            easing,
            on_change,
            on_complete,
        } = self;

        // Union of keys; a missing side snapshots the target's current value
        {
            let current = target.borrow();
            let mut keys: Vec<String> = from.keys().cloned().collect();
            for key in to.keys() {
                if !from.contains_key(key) {
                    keys.push(key.clone());
                }
            }
            for key in keys {
                if !from.contains_key(&key) {
                    if let Some(value) = current.read(&key) {
                        from.insert(key.clone(), value);
                    }
                }
                if !to.contains_key(&key) {
                    if let Some(value) = current.read(&key) {
                        to.insert(key, value);
                    }
                }
            }
        }

        // Only keys with both endpoints resolved can interpolate
        let keys: Vec<String> = from
            .keys()
            .filter(|key| to.contains_key(*key))
            .cloned()
            .collect();

        let target_rc = Rc::clone(target);
        let handle = scheduler.schedule_for_with(timing, move |info: &FrameInfo| {
            let t = easing.apply(info.progress());
            let mut target = target_rc.borrow_mut();
            for key in &keys {
                let (Some(a), Some(b)) = (from.get(key), to.get(key)) else {
                    continue;
                };
                target.write(key, &a.lerp(b, t));
            }
            FrameResult::Continue
        });

        if let Some(mut callback) = on_change {
            handle.on_frame(move |_| {
                callback();
                FrameResult::Continue
            });
        }
        if let Some(callback) = on_complete {
            handle.on_complete(callback);
        }

        scheduler.set_for(TargetId::of(target), &handle);
        handle
    }
}
