// ─── Error ──────────────────────────────────────────────────────────────────
use crate::types::FieldType;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RowError {
    #[error("Schema field count mismatch: schema has {expected}, record has {actual}")]
    SchemaFieldCountMismatch { expected: usize, actual: usize },
    #[error("Buffer too small: row needs {required} bytes, {available} available")]
    BufferTooSmall { required: usize, available: usize },
    #[error("Unsupported field type {field_type:?} at index {index}")]
    UnsupportedFieldType { index: usize, field_type: FieldType },
    #[error("Field index {index} out of bounds for row with {num_fields} fields")]
    IndexOutOfBounds { index: usize, num_fields: usize },
    #[error("Access of {len} bytes at offset {offset} exceeds buffer of {buf_len} bytes")]
    OutOfRange {
        offset: usize,
        len: usize,
        buf_len: usize,
    },
    #[error("Source field {index} is not a {expected}")]
    SourceTypeMismatch { index: usize, expected: &'static str },
    #[error("Field {index} does not hold valid UTF-8")]
    InvalidUtf8 { index: usize },
    #[error("Variable-length field {index} of {len} bytes does not fit a 32-bit slot")]
    VariableLengthTooLarge { index: usize, len: usize },
    #[error("Field {index} of type {field_type:?} cannot be overwritten in place")]
    FieldNotMutable { index: usize, field_type: FieldType },
    #[error("Invalid schema: {0}")]
    Schema(String),
}
