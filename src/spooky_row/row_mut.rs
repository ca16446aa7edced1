use super::SpookyRow;
use super::read_op::RowReadable;
use crate::layout::RowLayout;

/// Mutable view over one encoded row inside a caller-owned buffer.
///
/// Fixed-width fields can be overwritten in place and any field can be
/// nulled. String and binary fields cannot grow or shrink after the row was
/// written; re-encode the row with `RowConverter` for that.
#[derive(Debug)]
pub struct SpookyRowMut<'a> {
    pub(crate) buf: &'a mut [u8],
    pub(crate) base_offset: usize,
    pub(crate) layout: &'a RowLayout,
}

impl<'a> SpookyRowMut<'a> {
    #[inline]
    pub fn bind(buf: &'a mut [u8], base_offset: usize, layout: &'a RowLayout) -> Self {
        Self {
            buf,
            base_offset,
            layout,
        }
    }

    #[inline]
    pub fn rebind(&mut self, buf: &'a mut [u8], base_offset: usize) {
        self.buf = buf;
        self.base_offset = base_offset;
    }

    #[inline]
    pub fn as_row(&self) -> SpookyRow<'_> {
        SpookyRow::bind(&self.buf[..], self.base_offset, self.layout)
    }
}

impl<'a> RowReadable for SpookyRowMut<'a> {
    #[inline]
    fn buf(&self) -> &[u8] {
        &self.buf[..]
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
