//! Per-task callback registries
//!
//! Each task instance owns insertion-ordered registries for its recurring
//! frame callbacks, one-shot next-frame callbacks, completion and destroy
//! callbacks, and the pending one-shot signal waiters. Invocation order is
//! registration order.

use smallvec::SmallVec;

use crate::signal::Fulfill;
use crate::task::FrameInfo;

/// Return value of a frame callback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameResult {
    /// Keep the task alive
    #[default]
    Continue,
    /// Destroy the task once the current tick's advancement pass finishes
    Destroy,
}

/// Recurring per-frame callback. May request self-destruction by returning
/// [`FrameResult::Destroy`].
pub type FrameCallback = Box<dyn FnMut(&FrameInfo) -> FrameResult>;

/// One-shot callback for the task's next successful advance.
pub type NextFrameCallback = Box<dyn FnOnce(&FrameInfo)>;

/// Completion / destruction callback.
pub type Callback = Box<dyn FnMut()>;

#[derive(Default)]
pub(crate) struct Registries {
    pub frame: SmallVec<[FrameCallback; 2]>,
    pub next_frame: SmallVec<[NextFrameCallback; 2]>,
    pub complete: SmallVec<[Callback; 2]>,
    pub destroy: SmallVec<[Callback; 2]>,
    pub next_frame_waiters: SmallVec<[Fulfill<Option<FrameInfo>>; 1]>,
    pub completion_waiters: SmallVec<[Fulfill<Option<FrameInfo>>; 1]>,
    pub destruction_waiters: SmallVec<[Fulfill<()>; 1]>,
}

impl Registries {
    /// Drop every callback that could still fire on a future frame.
    /// Destroy callbacks and waiters are taken separately by the
    /// destroy-application phase.
    pub fn clear_frame_registries(&mut self) {
        self.frame.clear();
        self.next_frame.clear();
        self.complete.clear();
    }
}
