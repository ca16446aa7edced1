use std::borrow::Cow;

use tracing::{debug, warn};

use crate::error::RowError;
use crate::layout::RowLayout;
use crate::sentinel::null_sentinel;
use crate::source::SourceRecord;
use crate::types::*;

// ─── RowConverter ───────────────────────────────────────────────────────────

/// Encodes `SourceRecord`s of one schema into the binary row format.
///
/// Built once per schema and reused for any number of rows. Holds no mutable
/// state, so one converter can be shared across threads.
#[derive(Debug, Clone)]
pub struct RowConverter {
    layout: RowLayout,
}

impl RowConverter {
    /// Fails with `UnsupportedFieldType` if the schema contains a type the
    /// row format cannot encode.
    pub fn new(layout: RowLayout) -> Result<Self, RowError> {
        if let Err(e) = layout.validate() {
            warn!(error = %e, "rejecting row schema");
            return Err(e);
        }
        debug!(
            num_fields = layout.num_fields(),
            null_bitmap_bytes = layout.null_bitmap_bytes(),
            variable_fields = layout.variable_fields().len(),
            "row converter ready"
        );
        Ok(Self { layout })
    }

    #[inline]
    pub fn layout(&self) -> &RowLayout {
        &self.layout
    }

    #[inline]
    fn check_field_count<R: SourceRecord + ?Sized>(&self, record: &R) -> Result<(), RowError> {
        let expected = self.layout.num_fields();
        let actual = record.num_fields();
        if expected != actual {
            debug!(expected, actual, "source record field count mismatch");
            return Err(RowError::SchemaFieldCountMismatch { expected, actual });
        }
        Ok(())
    }

    /// Bytes of a non-null string/binary field.
    #[inline]
    fn variable_bytes<'r, R: SourceRecord + ?Sized>(
        &self,
        record: &'r R,
        i: usize,
    ) -> Result<Cow<'r, [u8]>, RowError> {
        match &self.layout.fields()[i] {
            FieldType::String => record.get_string(i).map(|s| Cow::Borrowed(s.as_bytes())),
            _ => record.get_binary(i),
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Size estimation
    // ════════════════════════════════════════════════════════════════════════

    /// Exact number of bytes `write_row` will write for `record`.
    ///
    /// `null bitmap + 8 × num_fields + Σ round_up_to_word(len)` over the
    /// non-null string/binary fields. Always a multiple of 8.
    pub fn get_size_requirement<R: SourceRecord + ?Sized>(
        &self,
        record: &R,
    ) -> Result<usize, RowError> {
        self.check_field_count(record)?;
        let mut size = self.layout.fixed_region_bytes();
        for &i in self.layout.variable_fields() {
            if record.is_null_at(i) {
                continue;
            }
            size += round_up_to_word(self.variable_bytes(record, i)?.len());
        }
        Ok(size)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Writer
    // ════════════════════════════════════════════════════════════════════════

    /// Encode `record` into `buf` starting at `base_offset`.
    ///
    /// `buf` must hold at least `get_size_requirement(record)` bytes past
    /// `base_offset`; this is checked before anything is written. Returns the
    /// number of bytes written. Bytes outside the row are left untouched.
    pub fn write_row<R: SourceRecord + ?Sized>(
        &self,
        record: &R,
        buf: &mut [u8],
        base_offset: usize,
    ) -> Result<usize, RowError> {
        let size = self.get_size_requirement(record)?;
        let available = buf.len().saturating_sub(base_offset);
        let Some(row) = base_offset
            .checked_add(size)
            .and_then(|end| buf.get_mut(base_offset..end))
        else {
            debug!(required = size, available, "row buffer too small");
            return Err(RowError::BufferTooSmall {
                required: size,
                available,
            });
        };

        // Bitmap starts clear, null fields set their bit below.
        row[..self.layout.null_bitmap_bytes()].fill(0);

        // Append cursor into the variable region, row-relative.
        let mut cursor = self.layout.fixed_region_bytes();

        for (i, field_type) in self.layout.fields().iter().enumerate() {
            if matches!(field_type, FieldType::Null) || record.is_null_at(i) {
                set_null_bit(row, i);
                write_word(row, self.layout.slot_offset(i), null_sentinel(field_type));
                continue;
            }

            let word = match field_type {
                FieldType::Boolean => record.get_bool(i)? as u64,
                FieldType::Byte => record.get_byte(i)? as u8 as u64,
                FieldType::Short => record.get_short(i)? as u16 as u64,
                FieldType::Int => record.get_int(i)? as u32 as u64,
                FieldType::Long => record.get_long(i)? as u64,
                FieldType::Float => record.get_float(i)?.to_bits() as u64,
                FieldType::Double => record.get_double(i)?.to_bits(),
                FieldType::Date => record.get_date(i)? as u32 as u64,
                FieldType::Timestamp => record.get_timestamp(i)? as u64,
                FieldType::String | FieldType::Binary => {
                    let bytes = self.variable_bytes(record, i)?;
                    let len = bytes.len();
                    let padded = round_up_to_word(len);
                    let (Ok(offset32), Ok(len32)) = (u32::try_from(cursor), u32::try_from(len))
                    else {
                        return Err(RowError::VariableLengthTooLarge { index: i, len });
                    };
                    row[cursor..cursor + len].copy_from_slice(&bytes);
                    row[cursor + len..cursor + padded].fill(0);
                    cursor += padded;
                    pack_offset_and_len(offset32, len32)
                }
                other => {
                    return Err(RowError::UnsupportedFieldType {
                        index: i,
                        field_type: other.clone(),
                    });
                }
            };
            write_word(row, self.layout.slot_offset(i), word);
        }

        debug_assert_eq!(cursor, size, "variable region did not fill the estimated size");
        Ok(size)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Serializations patterns
    // ════════════════════════════════════════════════════════════════════════

    /// Encode into a reusable buffer.
    ///
    /// The buffer is cleared but retains its capacity, so encoding many rows
    /// in sequence allocates only when a row outgrows every previous one.
    pub fn write_to_vec<R: SourceRecord + ?Sized>(
        &self,
        record: &R,
        buf: &mut Vec<u8>,
    ) -> Result<usize, RowError> {
        let size = self.get_size_requirement(record)?;
        buf.clear();
        buf.resize(size, 0);
        self.write_row(record, buf, 0)
    }

    pub fn to_bytes<R: SourceRecord + ?Sized>(&self, record: &R) -> Result<Vec<u8>, RowError> {
        let mut buf = Vec::new();
        self.write_to_vec(record, &mut buf)?;
        Ok(buf)
    }
}

// ─── Raw word helpers (row-relative, caller guarantees bounds) ─────────────

#[inline]
fn write_word(row: &mut [u8], offset: usize, word: u64) {
    row[offset..offset + WORD_SIZE].copy_from_slice(&word.to_le_bytes());
}

#[inline]
fn set_null_bit(row: &mut [u8], i: usize) {
    let at = (i / BITS_PER_WORD) * WORD_SIZE;
    let mut word = [0u8; WORD_SIZE];
    word.copy_from_slice(&row[at..at + WORD_SIZE]);
    let bits = u64::from_le_bytes(word) | (1u64 << (i % BITS_PER_WORD));
    write_word(row, at, bits);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spooky_value::SpookyValue;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn converter(fields: Vec<FieldType>) -> RowConverter {
        RowConverter::new(RowLayout::new(fields)).unwrap()
    }

    #[test]
    fn rejects_unsupported_schema() {
        init_tracing();
        let err = RowConverter::new(RowLayout::new(vec![
            FieldType::Long,
            FieldType::Map(Box::new(FieldType::String), Box::new(FieldType::Long)),
        ]))
        .unwrap_err();
        assert!(matches!(err, RowError::UnsupportedFieldType { index: 1, .. }));
    }

    #[test]
    fn size_counts_only_non_null_variable_bytes() {
        let conv = converter(vec![FieldType::Long, FieldType::String, FieldType::Binary]);
        let full = vec![
            SpookyValue::Long(1),
            SpookyValue::from("abcdefghi"),
            SpookyValue::from(&b""[..]),
        ];
        assert_eq!(conv.get_size_requirement(&full), Ok(8 + 24 + 16));

        let nulls = vec![SpookyValue::Long(1), SpookyValue::Null, SpookyValue::Null];
        assert_eq!(conv.get_size_requirement(&nulls), Ok(32));
    }

    #[test]
    fn size_rejects_field_count_mismatch() {
        let conv = converter(vec![FieldType::Long, FieldType::Long]);
        let row = vec![SpookyValue::Long(1)];
        assert_eq!(
            conv.get_size_requirement(&row),
            Err(RowError::SchemaFieldCountMismatch { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn narrow_values_are_zero_extended() {
        let conv = converter(vec![FieldType::Byte, FieldType::Short, FieldType::Int]);
        let row = vec![SpookyValue::Byte(-1), SpookyValue::Short(-2), SpookyValue::Int(-3)];
        let bytes = conv.to_bytes(&row).unwrap();
        assert_eq!(&bytes[8..16], &[0xFF, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&bytes[16..24], &[0xFE, 0xFF, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&bytes[24..32], &[0xFD, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]);
    }

    #[test]
    fn variable_bytes_are_zero_padded() {
        let conv = converter(vec![FieldType::String]);
        let row = vec![SpookyValue::from("Hello")];
        // dirty buffer so padding has to be written explicitly
        let mut buf = vec![0xAAu8; 24];
        assert_eq!(conv.write_row(&row, &mut buf, 0), Ok(24));
        assert_eq!(&buf[16..24], b"Hello\0\0\0");
        assert_eq!(u64::from_le_bytes(buf[8..16].try_into().unwrap()), (16u64 << 32) | 5);
        assert_eq!(&buf[0..8], &[0u8; 8]);
    }

    #[test]
    fn write_checks_buffer_before_writing() {
        init_tracing();
        let conv = converter(vec![FieldType::Long, FieldType::String]);
        let row = vec![SpookyValue::Long(7), SpookyValue::from("Hello")];
        let mut buf = vec![0xAAu8; 31];
        assert_eq!(
            conv.write_row(&row, &mut buf, 0),
            Err(RowError::BufferTooSmall { required: 32, available: 31 })
        );
        assert!(buf.iter().all(|&b| b == 0xAA));

        let mut buf = vec![0u8; 40];
        assert_eq!(
            conv.write_row(&row, &mut buf, 16),
            Err(RowError::BufferTooSmall { required: 32, available: 24 })
        );
        assert_eq!(
            conv.write_row(&row, &mut buf, 64),
            Err(RowError::BufferTooSmall { required: 32, available: 0 })
        );
    }

    #[test]
    fn empty_schema_rejects_offset_past_buffer_end() {
        let conv = converter(vec![]);
        let row: Vec<SpookyValue> = Vec::new();
        let mut buf = vec![0u8; 4];
        assert_eq!(
            conv.write_row(&row, &mut buf, 16),
            Err(RowError::BufferTooSmall { required: 0, available: 0 })
        );
        assert_eq!(conv.write_row(&row, &mut buf, 4), Ok(0));
        assert_eq!(buf, vec![0u8; 4]);
    }

    #[test]
    fn write_at_base_offset_leaves_surroundings_alone() {
        let conv = converter(vec![FieldType::Long, FieldType::String]);
        let row = vec![SpookyValue::Long(7), SpookyValue::from("Hi")];
        let mut buf = vec![0xAAu8; 8 + 32 + 8];
        assert_eq!(conv.write_row(&row, &mut buf, 8), Ok(32));
        assert!(buf[..8].iter().all(|&b| b == 0xAA));
        assert!(buf[40..].iter().all(|&b| b == 0xAA));
        // offset is relative to the row, not the buffer
        let slot = u64::from_le_bytes(buf[8 + 16..8 + 24].try_into().unwrap());
        assert_eq!(unpack_offset_and_len(slot), (24, 2));
    }

    #[test]
    fn source_type_mismatch_surfaces() {
        let conv = converter(vec![FieldType::Int]);
        let row = vec![SpookyValue::from("nope")];
        assert_eq!(
            conv.to_bytes(&row),
            Err(RowError::SourceTypeMismatch { index: 0, expected: "int" })
        );
    }

    #[test]
    fn write_to_vec_reuses_buffer() {
        let conv = converter(vec![FieldType::String]);
        let mut buf = Vec::with_capacity(128);
        let cap = buf.capacity();
        assert_eq!(conv.write_to_vec(&vec![SpookyValue::from("a long string value")], &mut buf), Ok(40));
        assert_eq!(buf.len(), 40);
        assert_eq!(conv.write_to_vec(&vec![SpookyValue::from("x")], &mut buf), Ok(24));
        assert_eq!(buf.len(), 24);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn null_type_field_is_always_null() {
        let conv = converter(vec![FieldType::Null]);
        let bytes = conv.to_bytes(&vec![SpookyValue::Long(3)]).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[8..16], &[0u8; 8]);
    }
}
