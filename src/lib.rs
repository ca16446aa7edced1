//! Word-aligned binary rows.
//!
//! A `RowConverter` encodes any `SourceRecord` of a fixed schema into a
//! caller-provided buffer:
//!
//! ```text
//! [ null bitmap: ceil(n/64)*8 bytes ][ n × 8-byte slots ][ string/binary bytes, 8-padded ]
//! ```
//!
//! `SpookyRow` / `SpookyRowMut` bind to such a buffer and read or mutate
//! fields in place. All offsets are row-relative, so an encoded row can be
//! copied anywhere and rebound.

pub mod deserialization;
pub mod error;
pub mod layout;
pub mod sentinel;
pub mod serialization;
pub mod source;
pub mod spooky_row;
pub mod spooky_value;
pub mod temporal;
pub mod types;

pub use error::RowError;
pub use layout::RowLayout;
pub use serialization::RowConverter;
pub use source::SourceRecord;
pub use spooky_row::{RowReadable, SpookyRow, SpookyRowMut};
pub use spooky_value::SpookyValue;
pub use types::FieldType;
