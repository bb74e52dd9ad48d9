//! Sample values as they appear on the wire.

use std::fmt;

use serde::Deserialize;

/// Numeric sample value.
///
/// Integers render as plain digits (`42`). Floats render in shortest
/// round-trip form and always contain a `.` (`6000.0`, `22.33`, `1.0e-5`);
/// the server treats a value without one as a long.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// Integers are always finite; floats must not be NaN or infinite.
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Int(_) => true,
            Value::Float(f) => f.is_finite(),
        }
    }

    /// Lossy view as `f64`.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Int(i) => i as f64,
            Value::Float(f) => f,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => {
                // Debug keeps `.0` on whole numbers but not on whole mantissas.
                let s = format!("{v:?}");
                match s.find('e') {
                    Some(at) if !s.contains('.') => write!(f, "{}.0{}", &s[..at], &s[at..]),
                    _ => f.write_str(&s),
                }
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

/// One emitted data point.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Dotted metric name (unsanitized).
    pub name: String,
    pub value: Value,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl Sample {
    pub fn new(name: impl Into<String>, value: impl Into<Value>, timestamp: i64) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            timestamp,
        }
    }
}
