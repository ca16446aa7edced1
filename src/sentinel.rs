use crate::types::FieldType;

// ─── Null Sentinels ─────────────────────────────────────────────────────────
//
// The slot word written for a null field. Shared by the writer and
// `SpookyRowMut::set_null_at`, so both null paths produce identical bytes.
//
//   null, boolean, byte, short, int, long, date, timestamp  →  0
//   float                                                    →  f32 NaN bits, zero-extended
//   double                                                   →  f64 NaN bits
//   string, binary                                           →  (offset 0, length 0)
//
// Floats use NaN because 0.0 is a real value a numeric fast path could
// consume without looking at the null bit.

pub const FLOAT_NULL_BITS: u32 = 0x7FC0_0000;
pub const DOUBLE_NULL_BITS: u64 = 0x7FF8_0000_0000_0000;

#[inline]
pub fn null_sentinel(field_type: &FieldType) -> u64 {
    match field_type {
        FieldType::Float => FLOAT_NULL_BITS as u64,
        FieldType::Double => DOUBLE_NULL_BITS,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_sentinels_are_canonical_nan() {
        assert_eq!(FLOAT_NULL_BITS, f32::NAN.to_bits());
        assert_eq!(DOUBLE_NULL_BITS, f64::NAN.to_bits());
        assert!(f32::from_bits(null_sentinel(&FieldType::Float) as u32).is_nan());
        assert!(f64::from_bits(null_sentinel(&FieldType::Double)).is_nan());
        // upper half of a float slot stays zero
        assert_eq!(null_sentinel(&FieldType::Float) >> 32, 0);
    }

    #[test]
    fn everything_else_is_zero() {
        for ft in [
            FieldType::Null,
            FieldType::Boolean,
            FieldType::Byte,
            FieldType::Short,
            FieldType::Int,
            FieldType::Long,
            FieldType::Date,
            FieldType::Timestamp,
            FieldType::String,
            FieldType::Binary,
        ] {
            assert_eq!(null_sentinel(&ft), 0, "{ft:?}");
        }
    }
}
