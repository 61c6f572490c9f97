//! Task instance state
//!
//! A task owns its timing state and callback registries; the scheduler
//! advances it once per tick. Negative time encodes a start delay: the
//! frame counter (and with it every frame callback) only advances once
//! `time >= 0`.

use cadence_core::Clock;
use slotmap::new_key_type;

use crate::callbacks::Registries;

new_key_type! {
    /// Stable, never-reused identity of a task instance.
    pub struct TaskKey;
}

/// Read-only snapshot of a task's timing state, passed to frame callbacks
/// and returned by [`TaskHandle::state`](crate::TaskHandle::state).
#[derive(Clone, Copy, Debug)]
pub struct FrameInfo {
    /// Seconds of scaled time elapsed (negative while delayed)
    pub time: f32,
    /// `time` as of the previous advance
    pub time_old: f32,
    /// Scaled delta applied by the latest advance
    pub delta_time: f32,
    /// Multiplier applied to the driver delta (negative plays in reverse)
    pub time_scale: f32,
    /// Seconds until natural completion; `None` runs unbounded
    pub duration: Option<f32>,
    /// Successful advances so far (stays 0 while delayed)
    pub frame: u64,
    /// Clock time at creation
    pub start_time: f32,
    /// Clock frame at creation
    pub start_frame: u64,
}

impl FrameInfo {
    /// `time` clamped to `[0, duration]`.
    pub fn normalized_time(&self) -> f32 {
        match self.duration {
            Some(duration) => self.time.clamp(0.0, duration.max(0.0)),
            None => self.time.max(0.0),
        }
    }

    /// Fraction of the duration elapsed, in `[0, 1]`.
    ///
    /// Unbounded tasks report 0. A non-positive duration jumps straight to 1
    /// once the delay has elapsed.
    pub fn progress(&self) -> f32 {
        match self.duration {
            Some(duration) if duration > 0.0 => (self.time / duration).clamp(0.0, 1.0),
            Some(_) => {
                if self.time >= 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            None => 0.0,
        }
    }

    /// Whether elapsed time has reached the duration.
    pub fn is_complete(&self) -> bool {
        self.duration.is_some_and(|duration| self.time >= duration)
    }
}

pub(crate) struct Task {
    pub start_time: f32,
    pub start_frame: u64,
    pub time: f32,
    pub time_old: f32,
    pub delta_time: f32,
    pub time_scale: f32,
    pub duration: Option<f32>,
    pub frame: u64,
    pub paused: bool,
    /// Monotonic: set at the moment destruction is requested, applied at
    /// the end of the tick (or immediately between ticks).
    pub destroyed: bool,
    pub registries: Registries,
}

impl Task {
    pub fn new(clock: &Clock, duration: Option<f32>, delay: f32) -> Self {
        Self {
            start_time: clock.time,
            start_frame: clock.frame,
            time: -delay,
            time_old: -delay,
            delta_time: 0.0,
            time_scale: 1.0,
            duration,
            frame: 0,
            paused: false,
            destroyed: false,
            registries: Registries::default(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.duration.is_some_and(|duration| self.time >= duration)
    }

    /// Apply one tick's delta. Returns whether the frame counter advanced
    /// (i.e. the delay has elapsed and callbacks should fire).
    pub fn advance(&mut self, delta_seconds: f32) -> bool {
        self.delta_time = delta_seconds * self.time_scale;
        self.time_old = self.time;
        self.time += self.delta_time;
        if self.time >= 0.0 {
            self.frame += 1;
            true
        } else {
            false
        }
    }

    pub fn info(&self) -> FrameInfo {
        FrameInfo {
            time: self.time,
            time_old: self.time_old,
            delta_time: self.delta_time,
            time_scale: self.time_scale,
            duration: self.duration,
            frame: self.frame,
            start_time: self.start_time,
            start_frame: self.start_frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_gates_frame_counter() {
        let mut task = Task::new(&Clock::new(), Some(1.0), 0.25);

        assert!(!task.advance(0.1));
        assert!(!task.advance(0.1));
        assert_eq!(task.frame, 0);

        // Crosses zero on this advance
        assert!(task.advance(0.1));
        assert_eq!(task.frame, 1);
        assert!((task.time - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_time_scale_applies_to_delta() {
        let mut task = Task::new(&Clock::new(), None, 0.0);
        task.time_scale = 2.0;
        task.advance(0.5);

        assert!((task.time - 1.0).abs() < 1e-6);
        assert!((task.delta_time - 1.0).abs() < 1e-6);
        assert!((task.time_old - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_progress_bounds() {
        let mut task = Task::new(&Clock::new(), Some(2.0), 0.5);
        assert_eq!(task.info().progress(), 0.0);
        assert_eq!(task.info().normalized_time(), 0.0);

        task.advance(5.0);
        assert_eq!(task.info().progress(), 1.0);
        assert_eq!(task.info().normalized_time(), 2.0);
        assert!(task.is_complete());
    }

    #[test]
    fn test_non_positive_duration_completes_at_zero() {
        let mut task = Task::new(&Clock::new(), Some(0.0), 0.0);
        assert!(task.advance(0.0));
        assert!(task.is_complete());
        assert_eq!(task.info().progress(), 1.0);
    }
}
