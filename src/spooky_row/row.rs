use super::read_op::RowReadable;
use crate::error::RowError;
use crate::layout::RowLayout;
use crate::types::*;

// ─── Reader (zero-copy) ────────────────────────────────────────────────────
/// Zero-copy view over one encoded row inside a caller-owned buffer.
///
/// A view is just `(buffer, base offset, layout)`. It never owns or frees
/// the bytes and does not validate the buffer when bound; every accessor
/// bounds-checks the bytes it touches instead.
#[derive(Debug, Clone, Copy)]
pub struct SpookyRow<'a> {
    pub(crate) buf: &'a [u8],
    pub(crate) base_offset: usize,
    pub(crate) layout: &'a RowLayout,
}

impl<'a> SpookyRow<'a> {
    #[inline]
    pub fn bind(buf: &'a [u8], base_offset: usize, layout: &'a RowLayout) -> Self {
        Self {
            buf,
            base_offset,
            layout,
        }
    }

    /// Point this view at another row of the same schema. O(1), no copy.
    #[inline]
    pub fn rebind(&mut self, buf: &'a [u8], base_offset: usize) {
        self.buf = buf;
        self.base_offset = base_offset;
    }

    /// Same as `RowReadable::bytes_at` but borrowing for the buffer's
    /// lifetime instead of the view's.
    #[inline]
    fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], RowError> {
        let buf: &'a [u8] = self.buf;
        self.base_offset
            .checked_add(offset)
            .and_then(|start| Some(start..start.checked_add(len)?))
            .and_then(|range| buf.get(range))
            .ok_or(RowError::OutOfRange {
                offset: self.base_offset.saturating_add(offset),
                len,
                buf_len: buf.len(),
            })
    }

    /// Raw reference to field `i`.
    pub fn field_ref(&self, i: usize) -> Result<FieldRef<'a>, RowError> {
        let layout: &'a RowLayout = self.layout;
        let field_type = layout
            .field_type(i)
            .ok_or(RowError::IndexOutOfBounds {
                index: i,
                num_fields: layout.num_fields(),
            })?;
        let slot_offset = layout.slot_offset(i);
        let slot_bytes = self.slice(slot_offset, WORD_SIZE)?;
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(slot_bytes);
        let slot = u64::from_le_bytes(word);
        let is_null = self.is_null_at(i)?;

        let data = if field_type.is_variable_length() && !is_null {
            let (offset, len) = unpack_offset_and_len(slot);
            self.slice(offset, len)?
        } else {
            slot_bytes
        };
        Ok(FieldRef {
            index: i,
            field_type,
            is_null,
            slot,
            data,
        })
    }
}

impl<'a> RowReadable for SpookyRow<'a> {
    #[inline]
    fn buf(&self) -> &[u8] {
        self.buf
    }

    #[inline]
    fn base_offset(&self) -> usize {
        self.base_offset
    }

    #[inline]
    fn layout(&self) -> &RowLayout {
        self.layout
    }
}
