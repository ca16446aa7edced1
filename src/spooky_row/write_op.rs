use super::read_op::RowReadable;
use super::row_mut::SpookyRowMut;
use crate::error::RowError;
use crate::sentinel::null_sentinel;
use crate::types::*;

impl<'a> SpookyRowMut<'a> {
    // ════════════════════════════════════════════════════════════════════════
    // Internal: word writes
    // ════════════════════════════════════════════════════════════════════════

    /// Overwrite the word at row-relative `offset`.
    #[inline]
    fn write_word(&mut self, offset: usize, word: u64) -> Result<(), RowError> {
        let buf_len = self.buf.len();
        let start = self.base_offset.saturating_add(offset);
        let dst = start
            .checked_add(WORD_SIZE)
            .and_then(|end| self.buf.get_mut(start..end))
            .ok_or(RowError::OutOfRange {
                offset: start,
                len: WORD_SIZE,
                buf_len,
            })?;
        dst.copy_from_slice(&word.to_le_bytes());
        Ok(())
    }

    #[inline]
    fn update_null_bit(&mut self, i: usize, null: bool) -> Result<(), RowError> {
        let at = (i / BITS_PER_WORD) * WORD_SIZE;
        let mask = 1u64 << (i % BITS_PER_WORD);
        let word = self.read_word(at)?;
        let word = if null { word | mask } else { word & !mask };
        self.write_word(at, word)
    }

    /// Fixed-width value write: the whole slot is replaced and the field
    /// becomes non-null.
    #[inline]
    fn set_slot(&mut self, i: usize, word: u64) -> Result<(), RowError> {
        self.check_index(i)?;
        let layout = self.layout;
        let field_type = &layout.fields()[i];
        if !field_type.is_fixed_width() || matches!(field_type, FieldType::Null) {
            return Err(RowError::FieldNotMutable {
                index: i,
                field_type: field_type.clone(),
            });
        }
        self.write_word(layout.slot_offset(i), word)?;
        self.update_null_bit(i, false)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Null mutation
    // ════════════════════════════════════════════════════════════════════════

    /// Mark field `i` null and overwrite its slot with the type's sentinel.
    ///
    /// Produces the same bitmap and slot bytes the writer produces for a null
    /// field. Variable-length bytes the slot referenced stay in the buffer
    /// but are no longer reachable.
    pub fn set_null_at(&mut self, i: usize) -> Result<(), RowError> {
        self.check_index(i)?;
        let sentinel = null_sentinel(&self.layout.fields()[i]);
        // Slot before bitmap: the slot lies past the bitmap, so once it is
        // writable the bit update cannot go out of range.
        self.write_word(self.layout.slot_offset(i), sentinel)?;
        self.update_null_bit(i, true)
    }

    /// Clear the null bit of field `i` without touching its slot.
    pub fn set_not_null_at(&mut self, i: usize) -> Result<(), RowError> {
        self.check_index(i)?;
        self.update_null_bit(i, false)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Typed setters (in place, no allocation)
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn set_bool(&mut self, i: usize, value: bool) -> Result<(), RowError> {
        self.set_slot(i, value as u64)
    }

    #[inline]
    pub fn set_byte(&mut self, i: usize, value: i8) -> Result<(), RowError> {
        self.set_slot(i, value as u8 as u64)
    }

    #[inline]
    pub fn set_short(&mut self, i: usize, value: i16) -> Result<(), RowError> {
        self.set_slot(i, value as u16 as u64)
    }

    #[inline]
    pub fn set_int(&mut self, i: usize, value: i32) -> Result<(), RowError> {
        self.set_slot(i, value as u32 as u64)
    }

    #[inline]
    pub fn set_long(&mut self, i: usize, value: i64) -> Result<(), RowError> {
        self.set_slot(i, value as u64)
    }

    #[inline]
    pub fn set_float(&mut self, i: usize, value: f32) -> Result<(), RowError> {
        self.set_slot(i, value.to_bits() as u64)
    }

    #[inline]
    pub fn set_double(&mut self, i: usize, value: f64) -> Result<(), RowError> {
        self.set_slot(i, value.to_bits())
    }

    /// Days since 1970-01-01.
    #[inline]
    pub fn set_date(&mut self, i: usize, days: i32) -> Result<(), RowError> {
        self.set_int(i, days)
    }

    /// Microseconds since 1970-01-01T00:00:00.
    #[inline]
    pub fn set_timestamp(&mut self, i: usize, micros: i64) -> Result<(), RowError> {
        self.set_long(i, micros)
    }
}
