use super::error::RowError;
use super::spooky_row::RowReadable;
use super::spooky_value::SpookyValue;
use super::temporal;
use super::types::*;
use smol_str::SmolStr;

// ─── RecordDeserialize Trait ────────────────────────────────────────────────

/// Trait for value types that can be materialised from an encoded row field.
///
/// This trait abstracts over different value representations (SpookyValue,
/// serde_json::Value, cbor4ii::core::Value) so a row can be decoded into
/// whichever one the caller works with.
pub trait RecordDeserialize: Sized {
    fn from_null() -> Self;

    fn from_bool(b: bool) -> Self;

    fn from_byte(v: i8) -> Self;

    fn from_short(v: i16) -> Self;

    fn from_int(v: i32) -> Self;

    fn from_long(v: i64) -> Self;

    fn from_float(v: f32) -> Self;

    fn from_double(v: f64) -> Self;

    fn from_str(s: &str) -> Self;

    fn from_binary(b: &[u8]) -> Self;

    /// Days since 1970-01-01.
    fn from_date(days: i32) -> Self;

    /// Microseconds since 1970-01-01T00:00:00.
    fn from_timestamp(micros: i64) -> Self;
}

// ─── RecordDeserialize for SpookyValue ──────────────────────────────────────

impl RecordDeserialize for SpookyValue {
    #[inline]
    fn from_null() -> Self {
        SpookyValue::Null
    }

    #[inline]
    fn from_bool(b: bool) -> Self {
        SpookyValue::Bool(b)
    }

    #[inline]
    fn from_byte(v: i8) -> Self {
        SpookyValue::Byte(v)
    }

    #[inline]
    fn from_short(v: i16) -> Self {
        SpookyValue::Short(v)
    }

    #[inline]
    fn from_int(v: i32) -> Self {
        SpookyValue::Int(v)
    }

    #[inline]
    fn from_long(v: i64) -> Self {
        SpookyValue::Long(v)
    }

    #[inline]
    fn from_float(v: f32) -> Self {
        SpookyValue::Float(v)
    }

    #[inline]
    fn from_double(v: f64) -> Self {
        SpookyValue::Double(v)
    }

    #[inline]
    fn from_str(s: &str) -> Self {
        SpookyValue::Str(SmolStr::from(s))
    }

    #[inline]
    fn from_binary(b: &[u8]) -> Self {
        SpookyValue::Binary(b.to_vec())
    }

    #[inline]
    fn from_date(days: i32) -> Self {
        SpookyValue::Date(days)
    }

    #[inline]
    fn from_timestamp(micros: i64) -> Self {
        SpookyValue::Timestamp(micros)
    }
}

// ─── RecordDeserialize for serde_json::Value ────────────────────────────────
//
// Dates and timestamps come out as ISO-8601 strings, which is also what the
// JSON source record accepts. Non-finite floats have no JSON form and become
// null.

impl RecordDeserialize for serde_json::Value {
    #[inline]
    fn from_null() -> Self {
        serde_json::Value::Null
    }

    #[inline]
    fn from_bool(b: bool) -> Self {
        serde_json::Value::Bool(b)
    }

    #[inline]
    fn from_byte(v: i8) -> Self {
        serde_json::Value::Number(v.into())
    }

    #[inline]
    fn from_short(v: i16) -> Self {
        serde_json::Value::Number(v.into())
    }

    #[inline]
    fn from_int(v: i32) -> Self {
        serde_json::Value::Number(v.into())
    }

    #[inline]
    fn from_long(v: i64) -> Self {
        serde_json::Value::Number(v.into())
    }

    #[inline]
    fn from_float(v: f32) -> Self {
        Self::from_double(v as f64)
    }

    #[inline]
    fn from_double(v: f64) -> Self {
        serde_json::Number::from_f64(v)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }

    #[inline]
    fn from_str(s: &str) -> Self {
        serde_json::Value::String(s.to_string())
    }

    fn from_binary(b: &[u8]) -> Self {
        serde_json::Value::Array(b.iter().map(|&x| serde_json::Value::from(x)).collect())
    }

    fn from_date(days: i32) -> Self {
        temporal::format_date(days)
            .map(serde_json::Value::String)
            .unwrap_or_else(|| serde_json::Value::Number(days.into()))
    }

    fn from_timestamp(micros: i64) -> Self {
        temporal::format_timestamp(micros)
            .map(serde_json::Value::String)
            .unwrap_or_else(|| serde_json::Value::Number(micros.into()))
    }
}

// ─── RecordDeserialize for cbor4ii::core::Value ─────────────────────────────

impl RecordDeserialize for cbor4ii::core::Value {
    #[inline]
    fn from_null() -> Self {
        cbor4ii::core::Value::Null
    }

    #[inline]
    fn from_bool(b: bool) -> Self {
        cbor4ii::core::Value::Bool(b)
    }

    #[inline]
    fn from_byte(v: i8) -> Self {
        cbor4ii::core::Value::Integer(v as i128)
    }

    #[inline]
    fn from_short(v: i16) -> Self {
        cbor4ii::core::Value::Integer(v as i128)
    }

    #[inline]
    fn from_int(v: i32) -> Self {
        cbor4ii::core::Value::Integer(v as i128)
    }

    #[inline]
    fn from_long(v: i64) -> Self {
        cbor4ii::core::Value::Integer(v as i128)
    }

    #[inline]
    fn from_float(v: f32) -> Self {
        cbor4ii::core::Value::Float(v as f64)
    }

    #[inline]
    fn from_double(v: f64) -> Self {
        cbor4ii::core::Value::Float(v)
    }

    #[inline]
    fn from_str(s: &str) -> Self {
        cbor4ii::core::Value::Text(s.to_string())
    }

    #[inline]
    fn from_binary(b: &[u8]) -> Self {
        cbor4ii::core::Value::Bytes(b.to_vec())
    }

    #[inline]
    fn from_date(days: i32) -> Self {
        cbor4ii::core::Value::Integer(days as i128)
    }

    #[inline]
    fn from_timestamp(micros: i64) -> Self {
        cbor4ii::core::Value::Integer(micros as i128)
    }
}

// ─── Decode Field ───────────────────────────────────────────────────────────

/// Decode field `i` of an encoded row into any value type that implements
/// RecordDeserialize. Unlike the raw getters this honours the null bit.
pub fn decode_field<R, V>(row: &R, i: usize) -> Result<V, RowError>
where
    R: RowReadable + ?Sized,
    V: RecordDeserialize,
{
    if row.is_null_at(i)? {
        return Ok(V::from_null());
    }
    // is_null_at checked the index
    let field_type = &row.layout().fields()[i];
    Ok(match field_type {
        FieldType::Null => V::from_null(),
        FieldType::Boolean => V::from_bool(row.get_bool(i)?),
        FieldType::Byte => V::from_byte(row.get_byte(i)?),
        FieldType::Short => V::from_short(row.get_short(i)?),
        FieldType::Int => V::from_int(row.get_int(i)?),
        FieldType::Long => V::from_long(row.get_long(i)?),
        FieldType::Float => V::from_float(row.get_float(i)?),
        FieldType::Double => V::from_double(row.get_double(i)?),
        FieldType::String => V::from_str(row.get_string(i)?),
        FieldType::Binary => V::from_binary(row.get_binary(i)?),
        FieldType::Date => V::from_date(row.get_date(i)?),
        FieldType::Timestamp => V::from_timestamp(row.get_timestamp(i)?),
        other => {
            return Err(RowError::UnsupportedFieldType {
                index: i,
                field_type: other.clone(),
            });
        }
    })
}
