//! Scalar values for attributes, filters, and error payloads.

use chrono::{DateTime, Utc};
use std::fmt;

/// A single attribute-level value.
///
/// This is the common currency between model instances, query filters,
/// scope parameters, and the `fields` payload of constraint errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// NULL / absent value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Timestamp value (UTC).
    Timestamp(DateTime<Utc>),
}

impl ScalarValue {
    /// Returns true for [`ScalarValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content, if this is an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

/// Trait for types that can be converted into a [`ScalarValue`].
pub trait ToScalarValue {
    /// Converts the value.
    fn to_scalar_value(self) -> ScalarValue;
}

impl ToScalarValue for ScalarValue {
    fn to_scalar_value(self) -> ScalarValue {
        self
    }
}

impl ToScalarValue for bool {
    fn to_scalar_value(self) -> ScalarValue {
        ScalarValue::Bool(self)
    }
}

impl ToScalarValue for i64 {
    fn to_scalar_value(self) -> ScalarValue {
        ScalarValue::Int(self)
    }
}

impl ToScalarValue for i32 {
    fn to_scalar_value(self) -> ScalarValue {
        ScalarValue::Int(i64::from(self))
    }
}

impl ToScalarValue for i16 {
    fn to_scalar_value(self) -> ScalarValue {
        ScalarValue::Int(i64::from(self))
    }
}

impl ToScalarValue for u32 {
    fn to_scalar_value(self) -> ScalarValue {
        ScalarValue::Int(i64::from(self))
    }
}

impl ToScalarValue for f64 {
    fn to_scalar_value(self) -> ScalarValue {
        ScalarValue::Float(self)
    }
}

impl ToScalarValue for f32 {
    fn to_scalar_value(self) -> ScalarValue {
        ScalarValue::Float(f64::from(self))
    }
}

impl ToScalarValue for &str {
    fn to_scalar_value(self) -> ScalarValue {
        ScalarValue::Text(self.to_string())
    }
}

impl ToScalarValue for String {
    fn to_scalar_value(self) -> ScalarValue {
        ScalarValue::Text(self)
    }
}

impl ToScalarValue for DateTime<Utc> {
    fn to_scalar_value(self) -> ScalarValue {
        ScalarValue::Timestamp(self)
    }
}

impl<T: ToScalarValue> ToScalarValue for Option<T> {
    fn to_scalar_value(self) -> ScalarValue {
        self.map_or(ScalarValue::Null, ToScalarValue::to_scalar_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(5i32.to_scalar_value(), ScalarValue::Int(5));
        assert_eq!("x".to_scalar_value(), ScalarValue::Text("x".to_string()));
        assert_eq!(None::<i64>.to_scalar_value(), ScalarValue::Null);
        assert_eq!(Some(true).to_scalar_value(), ScalarValue::Bool(true));
    }

    #[test]
    fn test_accessors() {
        assert!(ScalarValue::Null.is_null());
        assert_eq!(ScalarValue::Int(7).as_int(), Some(7));
        assert_eq!(ScalarValue::Text("a".into()).as_text(), Some("a"));
        assert_eq!(ScalarValue::Int(7).as_text(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ScalarValue::Null.to_string(), "NULL");
        assert_eq!(ScalarValue::Float(1.5).to_string(), "1.5");
    }
}
