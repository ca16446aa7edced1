use serde::{Deserialize, Serialize};

use crate::error::RowError;
use crate::spooky_row::SpookyRow;

// ─── Field Types ────────────────────────────────────────────────────────────

/// Logical type of one field in a row schema.
///
/// `Decimal`, `Array` and `Map` are valid schema types but the row codec
/// cannot encode them; `RowConverter::new` rejects schemas containing them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Null,
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Binary,
    Date,
    Timestamp,
    Decimal { precision: u8, scale: u8 },
    Array(Box<FieldType>),
    Map(Box<FieldType>, Box<FieldType>),
}

impl FieldType {
    /// Stored directly in the 8-byte slot.
    #[inline]
    pub fn is_fixed_width(&self) -> bool {
        matches!(
            self,
            FieldType::Null
                | FieldType::Boolean
                | FieldType::Byte
                | FieldType::Short
                | FieldType::Int
                | FieldType::Long
                | FieldType::Float
                | FieldType::Double
                | FieldType::Date
                | FieldType::Timestamp
        )
    }

    /// Slot holds an (offset, length) pair into the variable-length region.
    #[inline]
    pub fn is_variable_length(&self) -> bool {
        matches!(self, FieldType::String | FieldType::Binary)
    }

    #[inline]
    pub fn is_supported(&self) -> bool {
        self.is_fixed_width() || self.is_variable_length()
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Null => "null",
            FieldType::Boolean => "boolean",
            FieldType::Byte => "byte",
            FieldType::Short => "short",
            FieldType::Int => "int",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::String => "string",
            FieldType::Binary => "binary",
            FieldType::Date => "date",
            FieldType::Timestamp => "timestamp",
            FieldType::Decimal { .. } => "decimal",
            FieldType::Array(_) => "array",
            FieldType::Map(_, _) => "map",
        }
    }
}

// ─── Binary Layout ──────────────────────────────────────────────────────────
//
//  ┌──────────────────────────────────────────────┐
//  │ Null bitmap (ceil(n / 64) × 8 bytes)         │
//  │   bit i set  ⇔  field i is null              │
//  │   u64 words, little-endian                   │
//  ├──────────────────────────────────────────────┤
//  │ Fixed slots (n × 8 bytes)                    │
//  │   fixed-width: raw LE value, zero-extended   │
//  │   variable:    offset << 32 | length         │
//  ├──────────────────────────────────────────────┤
//  │ Variable region                              │
//  │   string/binary bytes in field order,        │
//  │   each zero-padded to 8 bytes                │
//  └──────────────────────────────────────────────┘
//
// Offsets in the variable slots are relative to the row base, so a row can
// be copied anywhere as a unit.

pub const WORD_SIZE: usize = 8;
pub const BITS_PER_WORD: usize = 64;

/// Bytes occupied by the null bitmap for `num_fields` fields.
#[inline]
pub const fn null_bitmap_bytes(num_fields: usize) -> usize {
    num_fields.div_ceil(BITS_PER_WORD) * WORD_SIZE
}

#[inline]
pub const fn round_up_to_word(n: usize) -> usize {
    n.div_ceil(WORD_SIZE) * WORD_SIZE
}

#[inline]
pub const fn pack_offset_and_len(offset: u32, len: u32) -> u64 {
    ((offset as u64) << 32) | len as u64
}

#[inline]
pub const fn unpack_offset_and_len(slot: u64) -> (usize, usize) {
    ((slot >> 32) as usize, (slot & 0xFFFF_FFFF) as usize)
}

// ─── FieldRef ───────────────────────────────────────────────────────────────

/// A raw, zero-copy reference to one field of an encoded row.
///
/// `data` is the variable-length content for string/binary fields and the
/// 8 slot bytes for everything else.
#[derive(Debug, Clone, Copy)]
pub struct FieldRef<'a> {
    pub index: usize,
    pub field_type: &'a FieldType,
    pub is_null: bool,
    pub slot: u64,
    pub data: &'a [u8],
}

// ─── Iterator ───────────────────────────────────────────────────────────────

pub struct FieldIter<'a> {
    pub row: SpookyRow<'a>,
    pub pos: usize,
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = Result<FieldRef<'a>, RowError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.row.layout.num_fields() {
            return None;
        }
        let field = self.row.field_ref(self.pos);
        self.pos += 1;
        Some(field)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.row.layout.num_fields() - self.pos;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for FieldIter<'a> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_is_one_word_per_64_fields() {
        assert_eq!(null_bitmap_bytes(0), 0);
        assert_eq!(null_bitmap_bytes(1), 8);
        assert_eq!(null_bitmap_bytes(64), 8);
        assert_eq!(null_bitmap_bytes(65), 16);
        assert_eq!(null_bitmap_bytes(128), 16);
        assert_eq!(null_bitmap_bytes(129), 24);
    }

    #[test]
    fn round_up_pads_to_word() {
        assert_eq!(round_up_to_word(0), 0);
        assert_eq!(round_up_to_word(1), 8);
        assert_eq!(round_up_to_word(5), 8);
        assert_eq!(round_up_to_word(8), 8);
        assert_eq!(round_up_to_word(9), 16);
    }

    #[test]
    fn offset_and_len_pack_into_one_word() {
        let slot = pack_offset_and_len(40, 5);
        assert_eq!(slot, (40u64 << 32) | 5);
        assert_eq!(unpack_offset_and_len(slot), (40, 5));
        assert_eq!(unpack_offset_and_len(pack_offset_and_len(u32::MAX, u32::MAX)), (u32::MAX as usize, u32::MAX as usize));
    }

    #[test]
    fn field_type_classification() {
        assert!(FieldType::Long.is_fixed_width());
        assert!(FieldType::Date.is_fixed_width());
        assert!(FieldType::Null.is_fixed_width());
        assert!(FieldType::String.is_variable_length());
        assert!(FieldType::Binary.is_variable_length());
        assert!(!FieldType::Decimal { precision: 10, scale: 2 }.is_supported());
        assert!(!FieldType::Array(Box::new(FieldType::Int)).is_supported());
    }

    #[test]
    fn field_type_serde_names() {
        let json = serde_json::to_string(&FieldType::Timestamp).unwrap();
        assert_eq!(json, "\"timestamp\"");
        let parsed: FieldType = serde_json::from_str("{\"array\":\"long\"}").unwrap();
        assert_eq!(parsed, FieldType::Array(Box::new(FieldType::Long)));
    }
}
