use serde::ser::{Serialize, Serializer};
use smol_str::SmolStr;

use crate::types::FieldType;

// ─── SpookyValue ────────────────────────────────────────────────────────────

/// Dynamically typed value of a single row field.
///
/// `Date` is a day count since 1970-01-01 and `Timestamp` a microsecond
/// count since 1970-01-01T00:00:00; see `crate::temporal` for conversions.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SpookyValue {
    #[default]
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(SmolStr),
    Binary(Vec<u8>),
    Date(i32),
    Timestamp(i64),
}

impl SpookyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SpookyValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SpookyValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            SpookyValue::Binary(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// Integer-family value widened to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SpookyValue::Byte(v) => Some(*v as i64),
            SpookyValue::Short(v) => Some(*v as i64),
            SpookyValue::Int(v) | SpookyValue::Date(v) => Some(*v as i64),
            SpookyValue::Long(v) | SpookyValue::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SpookyValue::Float(v) => Some(*v as f64),
            SpookyValue::Double(v) => Some(*v),
            other => other.as_i64().map(|i| i as f64),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SpookyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The schema type this value encodes as.
    pub fn field_type(&self) -> FieldType {
        match self {
            SpookyValue::Null => FieldType::Null,
            SpookyValue::Bool(_) => FieldType::Boolean,
            SpookyValue::Byte(_) => FieldType::Byte,
            SpookyValue::Short(_) => FieldType::Short,
            SpookyValue::Int(_) => FieldType::Int,
            SpookyValue::Long(_) => FieldType::Long,
            SpookyValue::Float(_) => FieldType::Float,
            SpookyValue::Double(_) => FieldType::Double,
            SpookyValue::Str(_) => FieldType::String,
            SpookyValue::Binary(_) => FieldType::Binary,
            SpookyValue::Date(_) => FieldType::Date,
            SpookyValue::Timestamp(_) => FieldType::Timestamp,
        }
    }

    /// Bit-exact comparison: NaN equals NaN with the same payload.
    pub fn bit_eq(&self, other: &SpookyValue) -> bool {
        match (self, other) {
            (SpookyValue::Float(a), SpookyValue::Float(b)) => a.to_bits() == b.to_bits(),
            (SpookyValue::Double(a), SpookyValue::Double(b)) => a.to_bits() == b.to_bits(),
            (a, b) => a == b,
        }
    }
}

// ─── Serialize ──────────────────────────────────────────────────────────────

impl Serialize for SpookyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SpookyValue::Null => serializer.serialize_none(),
            SpookyValue::Bool(b) => serializer.serialize_bool(*b),
            SpookyValue::Byte(v) => serializer.serialize_i8(*v),
            SpookyValue::Short(v) => serializer.serialize_i16(*v),
            SpookyValue::Int(v) | SpookyValue::Date(v) => serializer.serialize_i32(*v),
            SpookyValue::Long(v) | SpookyValue::Timestamp(v) => serializer.serialize_i64(*v),
            SpookyValue::Float(v) => serializer.serialize_f32(*v),
            SpookyValue::Double(v) => serializer.serialize_f64(*v),
            SpookyValue::Str(s) => serializer.serialize_str(s.as_str()),
            SpookyValue::Binary(b) => serializer.serialize_bytes(b),
        }
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<bool> for SpookyValue {
    fn from(b: bool) -> Self {
        SpookyValue::Bool(b)
    }
}

impl From<i8> for SpookyValue {
    fn from(n: i8) -> Self {
        SpookyValue::Byte(n)
    }
}

impl From<i16> for SpookyValue {
    fn from(n: i16) -> Self {
        SpookyValue::Short(n)
    }
}

impl From<i32> for SpookyValue {
    fn from(n: i32) -> Self {
        SpookyValue::Int(n)
    }
}

impl From<i64> for SpookyValue {
    fn from(n: i64) -> Self {
        SpookyValue::Long(n)
    }
}

impl From<f32> for SpookyValue {
    fn from(n: f32) -> Self {
        SpookyValue::Float(n)
    }
}

impl From<f64> for SpookyValue {
    fn from(n: f64) -> Self {
        SpookyValue::Double(n)
    }
}

impl From<&str> for SpookyValue {
    fn from(s: &str) -> Self {
        SpookyValue::Str(SmolStr::from(s))
    }
}

impl From<String> for SpookyValue {
    fn from(s: String) -> Self {
        SpookyValue::Str(SmolStr::from(s))
    }
}

impl From<&[u8]> for SpookyValue {
    fn from(b: &[u8]) -> Self {
        SpookyValue::Binary(b.to_vec())
    }
}

impl From<Vec<u8>> for SpookyValue {
    fn from(b: Vec<u8>) -> Self {
        SpookyValue::Binary(b)
    }
}

impl<T: Into<SpookyValue>> From<Option<T>> for SpookyValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SpookyValue::Null, Into::into)
    }
}

// ─── Into serde_json::Value ─────────────────────────────────────────────────

impl From<SpookyValue> for serde_json::Value {
    fn from(val: SpookyValue) -> Self {
        match val {
            SpookyValue::Null => serde_json::Value::Null,
            SpookyValue::Bool(b) => serde_json::Value::Bool(b),
            SpookyValue::Byte(v) => serde_json::json!(v),
            SpookyValue::Short(v) => serde_json::json!(v),
            SpookyValue::Int(v) | SpookyValue::Date(v) => serde_json::json!(v),
            SpookyValue::Long(v) | SpookyValue::Timestamp(v) => serde_json::json!(v),
            // NaN and infinities have no JSON form and become null
            SpookyValue::Float(v) => serde_json::json!(v),
            SpookyValue::Double(v) => serde_json::json!(v),
            SpookyValue::Str(s) => serde_json::Value::String(s.to_string()),
            SpookyValue::Binary(b) => {
                serde_json::Value::Array(b.into_iter().map(serde_json::Value::from).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_option_maps_none_to_null() {
        assert_eq!(SpookyValue::from(None::<i64>), SpookyValue::Null);
        assert_eq!(SpookyValue::from(Some(7i64)), SpookyValue::Long(7));
    }

    #[test]
    fn bit_eq_treats_nan_as_equal() {
        let a = SpookyValue::Double(f64::NAN);
        assert_ne!(a, a.clone());
        assert!(a.bit_eq(&SpookyValue::Double(f64::NAN)));
        assert!(!SpookyValue::Double(0.0).bit_eq(&SpookyValue::Double(-0.0)));
    }

    #[test]
    fn field_type_of_values() {
        assert_eq!(SpookyValue::from("x").field_type(), FieldType::String);
        assert_eq!(SpookyValue::Date(3).field_type(), FieldType::Date);
        assert_eq!(SpookyValue::from(vec![1u8]).field_type(), FieldType::Binary);
    }

    #[test]
    fn into_json() {
        assert_eq!(serde_json::Value::from(SpookyValue::Int(5)), serde_json::json!(5));
        assert_eq!(serde_json::Value::from(SpookyValue::Double(f64::NAN)), serde_json::Value::Null);
        assert_eq!(
            serde_json::Value::from(SpookyValue::from(&b"ab"[..])),
            serde_json::json!([97, 98])
        );
    }
}
