//! Setting values.
//!
//! `PropertyValue` is the closed set of shapes a setting may hold. The untyped
//! side of the store is `serde_json::Value`; JSON keeps numbers and booleans
//! apart, so classification never has to guess between them.

use serde_json::{Number, Value};
use std::fmt;

/// Integer reading of a JSON number, shared by every classifier.
///
/// Integral floats (`1.0`) always read as integers. Fractional values read as
/// `None` unless `truncate` is set, in which case they round toward zero.
/// Values outside the `i64` range are `None`.
pub(crate) fn number_to_int(n: &Number, truncate: bool) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if !f.is_finite() || f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return None;
    }
    if f.fract() != 0.0 && !truncate {
        return None;
    }
    Some(f.trunc() as i64)
}

#[derive(Debug, Clone, Default)]
pub enum PropertyValue {
    Integer(i64),
    Text(String),
    Boolean(bool),
    #[default]
    Absent,
}

impl PropertyValue {
    /// Classify an untyped value: integer, then string, then boolean, else `Absent`.
    ///
    /// Integral floats such as `1.0` are integers. `None` ("no value"), `null`,
    /// fractional or out-of-range numbers, arrays and objects all classify as
    /// `Absent`. Never fails.
    pub fn from_dynamic(input: Option<&Value>) -> Self {
        match input {
            Some(Value::Number(n)) => number_to_int(n, false)
                .map(PropertyValue::Integer)
                .unwrap_or(PropertyValue::Absent),
            Some(Value::String(s)) => PropertyValue::Text(s.clone()),
            Some(Value::Bool(b)) => PropertyValue::Boolean(*b),
            _ => PropertyValue::Absent,
        }
    }

    /// Inverse of `from_dynamic`. `Absent` projects to `None`.
    pub fn to_dynamic(&self) -> Option<Value> {
        match self {
            PropertyValue::Integer(i) => Some(Value::from(*i)),
            PropertyValue::Text(s) => Some(Value::String(s.clone())),
            PropertyValue::Boolean(b) => Some(Value::Bool(*b)),
            PropertyValue::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, PropertyValue::Absent)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean view. Integers read as `true` when non-zero.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            PropertyValue::Integer(i) => Some(*i != 0),
            _ => None,
        }
    }

    /// Short name of the variant, for listings and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Integer(_) => "integer",
            PropertyValue::Text(_) => "text",
            PropertyValue::Boolean(_) => "boolean",
            PropertyValue::Absent => "none",
        }
    }
}

// Not Eq/Hash: Integer(1) == Boolean(true) == Integer(2) but Integer(1) != Integer(2).
impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        use PropertyValue::*;

        match (self, other) {
            (Text(a), Text(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Boolean(a), Boolean(b)) => a == b,
            (Absent, Absent) => true,

            (Integer(n), Boolean(b)) => (*n == 0 && !*b) || (*n > 0 && *b),
            (Boolean(b), Integer(n)) => (!*b && *n == 0) || (*b && *n > 0),

            _ => false,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Integer(i) => write!(f, "{i}"),
            PropertyValue::Text(s) => write!(f, "{s:?}"),
            PropertyValue::Boolean(b) => write!(f, "{b}"),
            PropertyValue::Absent => f.write_str("<none>"),
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Integer(value.into())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(PropertyValue::Absent)
    }
}
