use serde::{Deserialize, Serialize};

use crate::error::RowError;
use crate::types::{FieldType, WORD_SIZE, null_bitmap_bytes};

// ─── RowLayout ──────────────────────────────────────────────────────────────

/// Immutable schema of an encoded row plus the byte-layout constants derived
/// from it. Built once per schema and shared by reference between the
/// converter and every view bound to rows of that schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FieldType>", into = "Vec<FieldType>")]
pub struct RowLayout {
    fields: Vec<FieldType>,
    null_bitmap_bytes: usize,
    fixed_region_bytes: usize,
    variable_fields: Vec<usize>,
}

impl RowLayout {
    pub fn new(fields: Vec<FieldType>) -> Self {
        let bitmap = null_bitmap_bytes(fields.len());
        let variable_fields = fields
            .iter()
            .enumerate()
            .filter(|(_, ft)| ft.is_variable_length())
            .map(|(i, _)| i)
            .collect();
        Self {
            null_bitmap_bytes: bitmap,
            fixed_region_bytes: bitmap + fields.len() * WORD_SIZE,
            fields,
            variable_fields,
        }
    }

    /// Parse a schema from a JSON array of field types, e.g.
    /// `["long", "string", {"decimal": {"precision": 10, "scale": 2}}]`.
    pub fn from_json(json: &str) -> Result<Self, RowError> {
        let fields: Vec<FieldType> =
            serde_json::from_str(json).map_err(|e| RowError::Schema(e.to_string()))?;
        Ok(Self::new(fields))
    }

    #[inline]
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn fields(&self) -> &[FieldType] {
        &self.fields
    }

    #[inline]
    pub fn field_type(&self, i: usize) -> Option<&FieldType> {
        self.fields.get(i)
    }

    #[inline]
    pub fn null_bitmap_bytes(&self) -> usize {
        self.null_bitmap_bytes
    }

    /// Bitmap plus slot array; the smallest possible row for this schema.
    #[inline]
    pub fn fixed_region_bytes(&self) -> usize {
        self.fixed_region_bytes
    }

    /// Row-relative byte offset of slot `i`.
    #[inline]
    pub fn slot_offset(&self, i: usize) -> usize {
        self.null_bitmap_bytes + i * WORD_SIZE
    }

    /// Indices of string/binary fields, ascending.
    #[inline]
    pub fn variable_fields(&self) -> &[usize] {
        &self.variable_fields
    }

    /// First field the row codec cannot encode, if any.
    pub fn validate(&self) -> Result<(), RowError> {
        match self.fields.iter().position(|ft| !ft.is_supported()) {
            Some(index) => Err(RowError::UnsupportedFieldType {
                index,
                field_type: self.fields[index].clone(),
            }),
            None => Ok(()),
        }
    }
}

impl From<Vec<FieldType>> for RowLayout {
    fn from(fields: Vec<FieldType>) -> Self {
        Self::new(fields)
    }
}

impl From<RowLayout> for Vec<FieldType> {
    fn from(layout: RowLayout) -> Self {
        layout.fields
    }
}

impl FromIterator<FieldType> for RowLayout {
    fn from_iter<I: IntoIterator<Item = FieldType>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
