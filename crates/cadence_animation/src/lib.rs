//! Cadence Animation System
//!
//! A single-threaded, tick-driven scheduler for many concurrent timed
//! tasks, plus a property-tween layer on top of it.
//!
//! # Features
//!
//! - **Two-phase ticks**: creations and destructions requested from inside
//!   callbacks are staged and applied at the tick boundary, so callbacks
//!   never mutate the set being iterated
//! - **Deterministic completion**: completion fires at most once, on the
//!   tick where elapsed time first reaches the duration, and destroys the
//!   task in that same tick
//! - **Target exclusivity**: at most one task per target identity; binding
//!   a replacement cancels the previous occupant
//! - **One-shot signals**: awaitable next-frame / completion / destruction
//!   notifications, resolved synchronously from inside the tick
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use cadence_animation::{Properties, Scheduler, Tween};
//!
//! let scheduler = Scheduler::new();
//! let target = Rc::new(RefCell::new(Properties::new().with("value", 0.0)));
//!
//! Tween::new()
//!     .to("value", 10.0)
//!     .ease_named("out3")
//!     .spawn(&scheduler, &target, 1.0);
//!
//! // The external driver delivers one tick per display frame
//! for _ in 0..10 {
//!     scheduler.tick(0.1);
//! }
//! assert_eq!(target.borrow().number("value"), Some(10.0));
//! ```

pub mod callbacks;
pub mod exclusive;
pub mod handle;
pub mod scheduler;
pub mod signal;
pub mod task;
pub mod tween;

pub use callbacks::FrameResult;
pub use exclusive::TargetId;
pub use handle::TaskHandle;
pub use scheduler::{Scheduler, Timing};
pub use signal::OneShot;
pub use task::{FrameInfo, TaskKey};
pub use tween::Tween;

// Core primitives, re-exported for downstream convenience
pub use cadence_core::{lerp, Animatable, Clock, Easing, Properties, Value};
