mod read_op;
pub mod row;
pub mod row_mut;
pub mod write_op;

pub use read_op::RowReadable;
pub use row::SpookyRow;
pub use row_mut::SpookyRowMut;
