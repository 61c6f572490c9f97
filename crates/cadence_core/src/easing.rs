//! Easing functions for tween progress

use std::fmt;
use std::rc::Rc;

/// Easing curve applied to a progress value in `[0, 1]`.
///
/// The named curves are power curves: `InN` is `t^n`, `OutN` is the
/// complement `1 - (1-t)^n`. Anything else goes through [`Easing::Custom`].
#[derive(Clone, Default)]
pub enum Easing {
    /// Identity: eased progress equals raw progress
    #[default]
    Linear,
    In2,
    In3,
    In4,
    In5,
    In6,
    Out2,
    Out3,
    Out4,
    Out5,
    Out6,
    /// Caller-supplied curve
    Custom(Rc<dyn Fn(f32) -> f32>),
}

impl Easing {
    /// Look up a curve by name (`"in2"`..`"in6"`, `"out2"`..`"out6"`).
    ///
    /// Unknown or empty names fall back to [`Easing::Linear`].
    pub fn by_name(name: &str) -> Self {
        match name {
            "in2" => Easing::In2,
            "in3" => Easing::In3,
            "in4" => Easing::In4,
            "in5" => Easing::In5,
            "in6" => Easing::In6,
            "out2" => Easing::Out2,
            "out3" => Easing::Out3,
            "out4" => Easing::Out4,
            "out5" => Easing::Out5,
            "out6" => Easing::Out6,
            _ => Easing::Linear,
        }
    }

    /// Wrap a caller-supplied function as a curve.
    pub fn custom(f: impl Fn(f32) -> f32 + 'static) -> Self {
        Easing::Custom(Rc::new(f))
    }

    /// Apply the curve to a progress value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::In2 => t.powi(2),
            Easing::In3 => t.powi(3),
            Easing::In4 => t.powi(4),
            Easing::In5 => t.powi(5),
            Easing::In6 => t.powi(6),
            Easing::Out2 => 1.0 - (1.0 - t).powi(2),
            Easing::Out3 => 1.0 - (1.0 - t).powi(3),
            Easing::Out4 => 1.0 - (1.0 - t).powi(4),
            Easing::Out5 => 1.0 - (1.0 - t).powi(5),
            Easing::Out6 => 1.0 - (1.0 - t).powi(6),
            Easing::Custom(f) => f(t),
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Easing::Linear => "Linear",
            Easing::In2 => "In2",
            Easing::In3 => "In3",
            Easing::In4 => "In4",
            Easing::In5 => "In5",
            Easing::In6 => "In6",
            Easing::Out2 => "Out2",
            Easing::Out3 => "Out3",
            Easing::Out4 => "Out4",
            Easing::Out5 => "Out5",
            Easing::Out6 => "Out6",
            Easing::Custom(_) => "Custom",
        };
        f.write_str(name)
    }
}
