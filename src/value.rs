//! Tagged cell values
//!
//! Metric and hyperparameter values are caller-defined and heterogeneous:
//! a run may record a scalar loss, a boolean flag, or the file name of a
//! rendered chart. `Value` is the sum type carried at the storage boundary;
//! deciding whether a text value names an image belongs to the viewer.

use serde::{Deserialize, Serialize};

/// A single cell value in the summary table.
///
/// Serializes untagged, so `Value::Number(0.5)` is plain JSON `0.5` inside
/// the hyperparameters cell text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent cell (rows appended before a column existed)
    Null,
    /// Boolean flag
    Bool(bool),
    /// Numeric value (all numbers are f64 at the storage boundary)
    Number(f64),
    /// Free text, including image file references
    Text(String),
}

impl Value {
    /// True if the value is `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The numeric value, if this is a `Number`.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean value, if this is a `Bool`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The text value, if this is `Text`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    /// Renders the value as it appears in a CSV cell: `Null` is empty.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&Value> for serde_json::Value {
    /// JSON projection used for the features/hyperparameters cell text.
    /// Non-finite numbers have no JSON representation and map to `null`.
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => {
                serde_json::Number::from_f64(*n).map_or(Self::Null, Self::Number)
            }
            Value::Text(s) => Self::String(s.clone()),
        }
    }
}
