use crate::deserialization::{RecordDeserialize, decode_field};
use crate::error::RowError;
use crate::layout::RowLayout;
use crate::types::*;
use xxhash_rust::xxh64::xxh64;

use super::row::SpookyRow;

pub trait RowReadable {
    fn buf(&self) -> &[u8];
    fn base_offset(&self) -> usize;
    fn layout(&self) -> &RowLayout;

    #[inline]
    fn num_fields(&self) -> usize {
        self.layout().num_fields()
    }

    /// Shared, `Copy` view over the same bytes.
    #[inline]
    fn row(&self) -> SpookyRow<'_> {
        SpookyRow::bind(self.buf(), self.base_offset(), self.layout())
    }

    /// Iterate over all raw fields (zero-copy)
    #[inline]
    fn iter_fields(&self) -> FieldIter<'_> {
        FieldIter {
            row: self.row(),
            pos: 0,
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Internal: bounds-checked raw access
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    fn check_index(&self, i: usize) -> Result<(), RowError> {
        let num_fields = self.num_fields();
        if i >= num_fields {
            return Err(RowError::IndexOutOfBounds {
                index: i,
                num_fields,
            });
        }
        Ok(())
    }

    /// `len` bytes at row-relative `offset`.
    #[inline]
    fn bytes_at(&self, offset: usize, len: usize) -> Result<&[u8], RowError> {
        let buf = self.buf();
        self.base_offset()
            .checked_add(offset)
            .and_then(|start| Some(start..start.checked_add(len)?))
            .and_then(|range| buf.get(range))
            .ok_or(RowError::OutOfRange {
                offset: self.base_offset().saturating_add(offset),
                len,
                buf_len: buf.len(),
            })
    }

    #[inline]
    fn read_word(&self, offset: usize) -> Result<u64, RowError> {
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(self.bytes_at(offset, WORD_SIZE)?);
        Ok(u64::from_le_bytes(word))
    }

    /// Raw 8-byte slot of field `i`.
    #[inline]
    fn read_slot(&self, i: usize) -> Result<u64, RowError> {
        self.check_index(i)?;
        self.read_word(self.layout().slot_offset(i))
    }

    // ════════════════════════════════════════════════════════════════════════
    // Null bitmap
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    fn is_null_at(&self, i: usize) -> Result<bool, RowError> {
        self.check_index(i)?;
        let word = self.read_word((i / BITS_PER_WORD) * WORD_SIZE)?;
        Ok(word & (1u64 << (i % BITS_PER_WORD)) != 0)
    }

    fn any_null(&self) -> Result<bool, RowError> {
        let words = self.layout().null_bitmap_bytes() / WORD_SIZE;
        for w in 0..words {
            if self.read_word(w * WORD_SIZE)? != 0 {
                return Ok(true);
            }
        }
        Ok(false)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Typed getters. None of them look at the null bit; a null field reads
    // back as its sentinel (0, false or NaN).
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    fn get_bool(&self, i: usize) -> Result<bool, RowError> {
        Ok(self.read_slot(i)? as u8 != 0)
    }

    #[inline]
    fn get_byte(&self, i: usize) -> Result<i8, RowError> {
        Ok(self.read_slot(i)? as u8 as i8)
    }

    #[inline]
    fn get_short(&self, i: usize) -> Result<i16, RowError> {
        Ok(self.read_slot(i)? as u16 as i16)
    }

    #[inline]
    fn get_int(&self, i: usize) -> Result<i32, RowError> {
        Ok(self.read_slot(i)? as u32 as i32)
    }

    #[inline]
    fn get_long(&self, i: usize) -> Result<i64, RowError> {
        Ok(self.read_slot(i)? as i64)
    }

    #[inline]
    fn get_float(&self, i: usize) -> Result<f32, RowError> {
        Ok(f32::from_bits(self.read_slot(i)? as u32))
    }

    #[inline]
    fn get_double(&self, i: usize) -> Result<f64, RowError> {
        Ok(f64::from_bits(self.read_slot(i)?))
    }

    /// Days since 1970-01-01.
    #[inline]
    fn get_date(&self, i: usize) -> Result<i32, RowError> {
        self.get_int(i)
    }

    /// Microseconds since 1970-01-01T00:00:00.
    #[inline]
    fn get_timestamp(&self, i: usize) -> Result<i64, RowError> {
        self.get_long(i)
    }

    /// Get a binary field (zero-copy).
    #[inline]
    fn get_binary(&self, i: usize) -> Result<&[u8], RowError> {
        let (offset, len) = unpack_offset_and_len(self.read_slot(i)?);
        self.bytes_at(offset, len)
    }

    /// Get a string field (zero-copy).
    #[inline]
    fn get_string(&self, i: usize) -> Result<&str, RowError> {
        std::str::from_utf8(self.get_binary(i)?).map_err(|_| RowError::InvalidUtf8 { index: i })
    }

    // ════════════════════════════════════════════════════════════════════════
    // Whole-row access
    // ════════════════════════════════════════════════════════════════════════

    /// Encoded size of the row: the fixed region plus the end of the furthest
    /// variable-length chunk a non-null slot references, word-padded.
    fn size_in_bytes(&self) -> Result<usize, RowError> {
        let layout = self.layout();
        let mut end = layout.fixed_region_bytes();
        for &i in layout.variable_fields() {
            if self.is_null_at(i)? {
                continue;
            }
            let (offset, len) = unpack_offset_and_len(self.read_slot(i)?);
            if len > 0 {
                end = end.max(offset.saturating_add(round_up_to_word(len)));
            }
        }
        Ok(end)
    }

    /// The encoded row as one contiguous, relocatable byte range.
    fn as_bytes(&self) -> Result<&[u8], RowError> {
        self.bytes_at(0, self.size_in_bytes()?)
    }

    /// Owned copy of the encoded row; bind a view at offset 0 to read it.
    fn copy_to_vec(&self) -> Result<Vec<u8>, RowError> {
        Ok(self.as_bytes()?.to_vec())
    }

    /// Hash of the encoded bytes. Equal rows hash equally.
    #[inline]
    fn hash64(&self, seed: u64) -> Result<u64, RowError> {
        Ok(xxh64(self.as_bytes()?, seed))
    }

    /// Byte-wise equality of two encoded rows of the same schema.
    fn row_eq<O: RowReadable + ?Sized>(&self, other: &O) -> Result<bool, RowError> {
        Ok(self.layout().fields() == other.layout().fields()
            && self.as_bytes()? == other.as_bytes()?)
    }

    /// Decode field `i` into a dynamic value, honouring the null bit.
    fn get_field<V: RecordDeserialize>(&self, i: usize) -> Result<V, RowError> {
        decode_field(self, i)
    }

    /// Decode every field.
    fn to_values<V: RecordDeserialize>(&self) -> Result<Vec<V>, RowError> {
        (0..self.num_fields()).map(|i| decode_field(self, i)).collect()
    }
}
