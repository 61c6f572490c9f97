//! Cadence Core Primitives
//!
//! This crate provides the leaf building blocks for the Cadence scheduler:
//!
//! - **Clock**: per-driver snapshot of current/previous time, delta, and frame count
//! - **Easing**: pure progress-mapping curves, addressable by name or supplied directly
//! - **Value model**: numeric and composite tween payloads plus the [`Animatable`]
//!   trait that tween targets implement
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Easing, Value};
//!
//! let ease = Easing::by_name("out3");
//! let t = ease.apply(0.5);
//! assert!((t - 0.875).abs() < 1e-6);
//!
//! let from = Value::Number(0.0);
//! let to = Value::Number(10.0);
//! assert_eq!(from.lerp(&to, t), Value::Number(8.75));
//! ```

pub mod clock;
pub mod easing;
pub mod value;

pub use clock::Clock;
pub use easing::Easing;
pub use value::{lerp, Animatable, Properties, Value};
