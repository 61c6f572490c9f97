//! Tween value model
//!
//! Tweens move named properties of a target between two snapshotted
//! endpoints. A property is either a plain number or a *composite*: a named
//! set of numeric fields (vector or rotation-like payloads) interpolated
//! field by field. Non-numeric state on a target is never touched; targets
//! simply do not expose it through [`Animatable`].

use rustc_hash::FxHashMap;

/// Linear interpolation between `a` and `b` at `t`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// A property value a tween can capture and interpolate.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f32),
    Composite(FxHashMap<String, f32>),
}

impl Value {
    /// Build a composite value from named numeric fields.
    pub fn composite<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, f32)>,
        K: Into<String>,
    {
        Value::Composite(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Numeric payload, if this is a plain number.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Composite(_) => None,
        }
    }

    /// One field of a composite payload.
    pub fn field(&self, name: &str) -> Option<f32> {
        match self {
            Value::Number(_) => None,
            Value::Composite(fields) => fields.get(name).copied(),
        }
    }

    /// Linear interpolation between two endpoints at `t`.
    ///
    /// Composite fields present on only one side keep that side's value;
    /// mismatched kinds hold the starting endpoint.
    pub fn lerp(&self, other: &Value, t: f32) -> Value {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Value::Number(lerp(*a, *b, t)),
            (Value::Composite(a), Value::Composite(b)) => {
                let mut out = FxHashMap::default();
                for (name, va) in a {
                    let v = match b.get(name) {
                        Some(vb) => lerp(*va, *vb, t),
                        None => *va,
                    };
                    out.insert(name.clone(), v);
                }
                for (name, vb) in b {
                    if !a.contains_key(name) {
                        out.insert(name.clone(), *vb);
                    }
                }
                Value::Composite(out)
            }
            (a, _) => a.clone(),
        }
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n as f32)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f32)
    }
}

/// A tween target: anything exposing named, interpolatable properties.
///
/// Reading hands out a *copy* of the current value (composites clone their
/// field map), so a snapshot taken at tween creation is immune to later
/// mutation of the live target.
pub trait Animatable {
    /// Current value of `key`, or `None` if the target has no such property.
    fn read(&self, key: &str) -> Option<Value>;

    /// Write an interpolated value back.
    ///
    /// Composite writes merge field by field; fields the target does not
    /// carry are left untouched.
    fn write(&mut self, key: &str, value: &Value);
}

/// String-keyed property bag, the zero-boilerplate [`Animatable`] target.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties {
    values: FxHashMap<String, Value>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a property.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Numeric property shortcut.
    pub fn number(&self, key: &str) -> Option<f32> {
        self.values.get(key).and_then(Value::as_number)
    }
}

impl Animatable for Properties {
    fn read(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &Value) {
        match (self.values.get_mut(key), value) {
            (Some(Value::Number(slot)), Value::Number(n)) => *slot = *n,
            (Some(Value::Composite(fields)), Value::Composite(incoming)) => {
                for (name, n) in incoming {
                    if let Some(slot) = fields.get_mut(name) {
                        *slot = *n;
                    }
                }
            }
            // Unknown keys and kind mismatches are ignored
            _ => {}
        }
    }
}
