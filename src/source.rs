use std::borrow::Cow;

use crate::error::RowError;
use crate::spooky_value::SpookyValue;
use crate::temporal;

// ─── SourceRecord Trait ─────────────────────────────────────────────────────

/// A logical row that can be encoded into the binary row format.
///
/// This trait abstracts over the row representations the surrounding engine
/// uses (`[SpookyValue]`, `[serde_json::Value]`, `[cbor4ii::core::Value]`),
/// so the converter never depends on one concrete row type.
///
/// The converter only calls the getter matching the schema type of field `i`
/// and only after `is_null_at(i)` returned false.
pub trait SourceRecord {
    fn num_fields(&self) -> usize;

    fn is_null_at(&self, i: usize) -> bool;

    fn get_bool(&self, i: usize) -> Result<bool, RowError>;

    fn get_byte(&self, i: usize) -> Result<i8, RowError>;

    fn get_short(&self, i: usize) -> Result<i16, RowError>;

    fn get_int(&self, i: usize) -> Result<i32, RowError>;

    fn get_long(&self, i: usize) -> Result<i64, RowError>;

    fn get_float(&self, i: usize) -> Result<f32, RowError>;

    fn get_double(&self, i: usize) -> Result<f64, RowError>;

    /// Days since 1970-01-01.
    fn get_date(&self, i: usize) -> Result<i32, RowError>;

    /// Microseconds since 1970-01-01T00:00:00.
    fn get_timestamp(&self, i: usize) -> Result<i64, RowError>;

    fn get_string(&self, i: usize) -> Result<&str, RowError>;

    fn get_binary(&self, i: usize) -> Result<Cow<'_, [u8]>, RowError>;
}

#[inline]
fn mismatch(index: usize, expected: &'static str) -> RowError {
    RowError::SourceTypeMismatch { index, expected }
}

// ─── SourceRecord for [SpookyValue] ─────────────────────────────────────────

impl SourceRecord for [SpookyValue] {
    #[inline]
    fn num_fields(&self) -> usize {
        self.len()
    }

    #[inline]
    fn is_null_at(&self, i: usize) -> bool {
        self.get(i).is_none_or(SpookyValue::is_null)
    }

    #[inline]
    fn get_bool(&self, i: usize) -> Result<bool, RowError> {
        match self.get(i) {
            Some(SpookyValue::Bool(b)) => Ok(*b),
            _ => Err(mismatch(i, "boolean")),
        }
    }

    #[inline]
    fn get_byte(&self, i: usize) -> Result<i8, RowError> {
        match self.get(i) {
            Some(SpookyValue::Byte(v)) => Ok(*v),
            _ => Err(mismatch(i, "byte")),
        }
    }

    #[inline]
    fn get_short(&self, i: usize) -> Result<i16, RowError> {
        match self.get(i) {
            Some(SpookyValue::Short(v)) => Ok(*v),
            _ => Err(mismatch(i, "short")),
        }
    }

    #[inline]
    fn get_int(&self, i: usize) -> Result<i32, RowError> {
        match self.get(i) {
            Some(SpookyValue::Int(v)) => Ok(*v),
            _ => Err(mismatch(i, "int")),
        }
    }

    #[inline]
    fn get_long(&self, i: usize) -> Result<i64, RowError> {
        match self.get(i) {
            Some(SpookyValue::Long(v)) => Ok(*v),
            _ => Err(mismatch(i, "long")),
        }
    }

    #[inline]
    fn get_float(&self, i: usize) -> Result<f32, RowError> {
        match self.get(i) {
            Some(SpookyValue::Float(v)) => Ok(*v),
            _ => Err(mismatch(i, "float")),
        }
    }

    #[inline]
    fn get_double(&self, i: usize) -> Result<f64, RowError> {
        match self.get(i) {
            Some(SpookyValue::Double(v)) => Ok(*v),
            _ => Err(mismatch(i, "double")),
        }
    }

    #[inline]
    fn get_date(&self, i: usize) -> Result<i32, RowError> {
        match self.get(i) {
            Some(SpookyValue::Date(v)) => Ok(*v),
            _ => Err(mismatch(i, "date")),
        }
    }

    #[inline]
    fn get_timestamp(&self, i: usize) -> Result<i64, RowError> {
        match self.get(i) {
            Some(SpookyValue::Timestamp(v)) => Ok(*v),
            _ => Err(mismatch(i, "timestamp")),
        }
    }

    #[inline]
    fn get_string(&self, i: usize) -> Result<&str, RowError> {
        match self.get(i) {
            Some(SpookyValue::Str(s)) => Ok(s.as_str()),
            _ => Err(mismatch(i, "string")),
        }
    }

    #[inline]
    fn get_binary(&self, i: usize) -> Result<Cow<'_, [u8]>, RowError> {
        match self.get(i) {
            Some(SpookyValue::Binary(b)) => Ok(Cow::Borrowed(b.as_slice())),
            _ => Err(mismatch(i, "binary")),
        }
    }
}

// ─── SourceRecord for [serde_json::Value] ───────────────────────────────────
//
// JSON has no native date, timestamp or binary. Dates and timestamps are
// accepted either as their integer encoding or as ISO-8601 strings. Binary
// is accepted as a string (its UTF-8 bytes) or as an array of byte values,
// the form a decoded binary field takes.

impl SourceRecord for [serde_json::Value] {
    #[inline]
    fn num_fields(&self) -> usize {
        self.len()
    }

    #[inline]
    fn is_null_at(&self, i: usize) -> bool {
        self.get(i).is_none_or(serde_json::Value::is_null)
    }

    fn get_bool(&self, i: usize) -> Result<bool, RowError> {
        self.get(i)
            .and_then(serde_json::Value::as_bool)
            .ok_or_else(|| mismatch(i, "boolean"))
    }

    fn get_byte(&self, i: usize) -> Result<i8, RowError> {
        self.get(i)
            .and_then(serde_json::Value::as_i64)
            .and_then(|v| i8::try_from(v).ok())
            .ok_or_else(|| mismatch(i, "byte"))
    }

    fn get_short(&self, i: usize) -> Result<i16, RowError> {
        self.get(i)
            .and_then(serde_json::Value::as_i64)
            .and_then(|v| i16::try_from(v).ok())
            .ok_or_else(|| mismatch(i, "short"))
    }

    fn get_int(&self, i: usize) -> Result<i32, RowError> {
        self.get(i)
            .and_then(serde_json::Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| mismatch(i, "int"))
    }

    fn get_long(&self, i: usize) -> Result<i64, RowError> {
        self.get(i)
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| mismatch(i, "long"))
    }

    fn get_float(&self, i: usize) -> Result<f32, RowError> {
        self.get(i)
            .and_then(serde_json::Value::as_f64)
            .map(|v| v as f32)
            .ok_or_else(|| mismatch(i, "float"))
    }

    fn get_double(&self, i: usize) -> Result<f64, RowError> {
        self.get(i)
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| mismatch(i, "double"))
    }

    fn get_date(&self, i: usize) -> Result<i32, RowError> {
        match self.get(i) {
            Some(serde_json::Value::String(s)) => temporal::parse_date(s),
            Some(v) => v.as_i64().and_then(|d| i32::try_from(d).ok()),
            None => None,
        }
        .ok_or_else(|| mismatch(i, "date"))
    }

    fn get_timestamp(&self, i: usize) -> Result<i64, RowError> {
        match self.get(i) {
            Some(serde_json::Value::String(s)) => temporal::parse_timestamp(s),
            Some(v) => v.as_i64(),
            None => None,
        }
        .ok_or_else(|| mismatch(i, "timestamp"))
    }

    fn get_string(&self, i: usize) -> Result<&str, RowError> {
        self.get(i)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| mismatch(i, "string"))
    }

    fn get_binary(&self, i: usize) -> Result<Cow<'_, [u8]>, RowError> {
        match self.get(i) {
            Some(serde_json::Value::String(s)) => Some(Cow::Borrowed(s.as_bytes())),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(|v| v.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect::<Option<Vec<u8>>>()
                .map(Cow::Owned),
            _ => None,
        }
        .ok_or_else(|| mismatch(i, "binary"))
    }
}

// ─── SourceRecord for [cbor4ii::core::Value] ────────────────────────────────

#[inline]
fn cbor_integer(v: Option<&cbor4ii::core::Value>) -> Option<i128> {
    match v {
        Some(cbor4ii::core::Value::Integer(i)) => Some(*i),
        _ => None,
    }
}

impl SourceRecord for [cbor4ii::core::Value] {
    #[inline]
    fn num_fields(&self) -> usize {
        self.len()
    }

    #[inline]
    fn is_null_at(&self, i: usize) -> bool {
        matches!(self.get(i), None | Some(cbor4ii::core::Value::Null))
    }

    fn get_bool(&self, i: usize) -> Result<bool, RowError> {
        match self.get(i) {
            Some(cbor4ii::core::Value::Bool(b)) => Ok(*b),
            _ => Err(mismatch(i, "boolean")),
        }
    }

    fn get_byte(&self, i: usize) -> Result<i8, RowError> {
        cbor_integer(self.get(i))
            .and_then(|v| i8::try_from(v).ok())
            .ok_or_else(|| mismatch(i, "byte"))
    }

    fn get_short(&self, i: usize) -> Result<i16, RowError> {
        cbor_integer(self.get(i))
            .and_then(|v| i16::try_from(v).ok())
            .ok_or_else(|| mismatch(i, "short"))
    }

    fn get_int(&self, i: usize) -> Result<i32, RowError> {
        cbor_integer(self.get(i))
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| mismatch(i, "int"))
    }

    fn get_long(&self, i: usize) -> Result<i64, RowError> {
        cbor_integer(self.get(i))
            .and_then(|v| i64::try_from(v).ok())
            .ok_or_else(|| mismatch(i, "long"))
    }

    fn get_float(&self, i: usize) -> Result<f32, RowError> {
        match self.get(i) {
            Some(cbor4ii::core::Value::Float(f)) => Ok(*f as f32),
            _ => Err(mismatch(i, "float")),
        }
    }

    fn get_double(&self, i: usize) -> Result<f64, RowError> {
        match self.get(i) {
            Some(cbor4ii::core::Value::Float(f)) => Ok(*f),
            _ => Err(mismatch(i, "double")),
        }
    }

    fn get_date(&self, i: usize) -> Result<i32, RowError> {
        cbor_integer(self.get(i))
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| mismatch(i, "date"))
    }

    fn get_timestamp(&self, i: usize) -> Result<i64, RowError> {
        cbor_integer(self.get(i))
            .and_then(|v| i64::try_from(v).ok())
            .ok_or_else(|| mismatch(i, "timestamp"))
    }

    fn get_string(&self, i: usize) -> Result<&str, RowError> {
        match self.get(i) {
            Some(cbor4ii::core::Value::Text(s)) => Ok(s.as_str()),
            _ => Err(mismatch(i, "string")),
        }
    }

    fn get_binary(&self, i: usize) -> Result<Cow<'_, [u8]>, RowError> {
        match self.get(i) {
            Some(cbor4ii::core::Value::Bytes(b)) => Ok(Cow::Borrowed(b.as_slice())),
            _ => Err(mismatch(i, "binary")),
        }
    }
}

// ─── SourceRecord for Vec<T> / &T ───────────────────────────────────────────

impl<T> SourceRecord for Vec<T>
where
    [T]: SourceRecord,
{
    #[inline]
    fn num_fields(&self) -> usize {
        self.as_slice().num_fields()
    }
    #[inline]
    fn is_null_at(&self, i: usize) -> bool {
        self.as_slice().is_null_at(i)
    }
    #[inline]
    fn get_bool(&self, i: usize) -> Result<bool, RowError> {
        self.as_slice().get_bool(i)
    }
    #[inline]
    fn get_byte(&self, i: usize) -> Result<i8, RowError> {
        self.as_slice().get_byte(i)
    }
    #[inline]
    fn get_short(&self, i: usize) -> Result<i16, RowError> {
        self.as_slice().get_short(i)
    }
    #[inline]
    fn get_int(&self, i: usize) -> Result<i32, RowError> {
        self.as_slice().get_int(i)
    }
    #[inline]
    fn get_long(&self, i: usize) -> Result<i64, RowError> {
        self.as_slice().get_long(i)
    }
    #[inline]
    fn get_float(&self, i: usize) -> Result<f32, RowError> {
        self.as_slice().get_float(i)
    }
    #[inline]
    fn get_double(&self, i: usize) -> Result<f64, RowError> {
        self.as_slice().get_double(i)
    }
    #[inline]
    fn get_date(&self, i: usize) -> Result<i32, RowError> {
        self.as_slice().get_date(i)
    }
    #[inline]
    fn get_timestamp(&self, i: usize) -> Result<i64, RowError> {
        self.as_slice().get_timestamp(i)
    }
    #[inline]
    fn get_string(&self, i: usize) -> Result<&str, RowError> {
        self.as_slice().get_string(i)
    }
    #[inline]
    fn get_binary(&self, i: usize) -> Result<Cow<'_, [u8]>, RowError> {
        self.as_slice().get_binary(i)
    }
}

/// Blanket implementation for references, so `&&[SpookyValue]` etc. also work.
impl<T: SourceRecord + ?Sized> SourceRecord for &T {
    #[inline]
    fn num_fields(&self) -> usize {
        (**self).num_fields()
    }
    #[inline]
    fn is_null_at(&self, i: usize) -> bool {
        (**self).is_null_at(i)
    }
    #[inline]
    fn get_bool(&self, i: usize) -> Result<bool, RowError> {
        (**self).get_bool(i)
    }
    #[inline]
    fn get_byte(&self, i: usize) -> Result<i8, RowError> {
        (**self).get_byte(i)
    }
    #[inline]
    fn get_short(&self, i: usize) -> Result<i16, RowError> {
        (**self).get_short(i)
    }
    #[inline]
    fn get_int(&self, i: usize) -> Result<i32, RowError> {
        (**self).get_int(i)
    }
    #[inline]
    fn get_long(&self, i: usize) -> Result<i64, RowError> {
        (**self).get_long(i)
    }
    #[inline]
    fn get_float(&self, i: usize) -> Result<f32, RowError> {
        (**self).get_float(i)
    }
    #[inline]
    fn get_double(&self, i: usize) -> Result<f64, RowError> {
        (**self).get_double(i)
    }
    #[inline]
    fn get_date(&self, i: usize) -> Result<i32, RowError> {
        (**self).get_date(i)
    }
    #[inline]
    fn get_timestamp(&self, i: usize) -> Result<i64, RowError> {
        (**self).get_timestamp(i)
    }
    #[inline]
    fn get_string(&self, i: usize) -> Result<&str, RowError> {
        (**self).get_string(i)
    }
    #[inline]
    fn get_binary(&self, i: usize) -> Result<Cow<'_, [u8]>, RowError> {
        (**self).get_binary(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spooky_values_report_nulls_and_types() {
        let row = vec![SpookyValue::Null, SpookyValue::Long(4), SpookyValue::from("x")];
        assert_eq!(row.num_fields(), 3);
        assert!(row.is_null_at(0));
        assert!(!row.is_null_at(1));
        assert_eq!(row.get_long(1), Ok(4));
        assert_eq!(row.get_string(2), Ok("x"));
        assert_eq!(row.get_int(1), Err(RowError::SourceTypeMismatch { index: 1, expected: "int" }));
    }

    #[test]
    fn json_values_narrow_with_range_check() {
        let row = vec![serde_json::json!(300), serde_json::json!(-5)];
        assert!(row.get_byte(0).is_err());
        assert_eq!(row.get_short(0), Ok(300));
        assert_eq!(row.get_byte(1), Ok(-5));
    }

    #[test]
    fn json_dates_accept_iso_strings() {
        let row = vec![
            serde_json::json!("1970-01-03"),
            serde_json::json!("1970-01-01T00:00:02"),
            serde_json::json!(7),
        ];
        assert_eq!(row.get_date(0), Ok(2));
        assert_eq!(row.get_timestamp(1), Ok(2_000_000));
        assert_eq!(row.get_date(2), Ok(7));
        assert!(row.get_date(1).is_err());
    }

    #[test]
    fn json_binary_accepts_strings_and_byte_arrays() {
        let row = vec![
            serde_json::json!("ab"),
            serde_json::json!([0, 255, 7]),
            serde_json::json!([1, 256]),
            serde_json::json!([1, -1]),
        ];
        assert_eq!(&*row.get_binary(0).unwrap(), b"ab");
        assert_eq!(&*row.get_binary(1).unwrap(), &[0u8, 255, 7][..]);
        assert!(row.get_binary(2).is_err());
        assert!(row.get_binary(3).is_err());
    }

    #[test]
    fn cbor_values() {
        use cbor4ii::core::Value;
        let row = vec![
            Value::Integer(12),
            Value::Bytes(vec![1, 2]),
            Value::Null,
            Value::Float(1.5),
        ];
        assert_eq!(row.get_int(0), Ok(12));
        assert_eq!(&*row.get_binary(1).unwrap(), &[1u8, 2][..]);
        assert!(row.is_null_at(2));
        assert_eq!(row.get_double(3), Ok(1.5));
        assert!(row.get_string(0).is_err());
    }
}
