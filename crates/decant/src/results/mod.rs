//! Response handling: raw table, preparation, casting and decoding.

mod cast;
mod prepare;
mod table;

pub use cast::{cast, CellValue, TypedTable};
pub use prepare::prepare;
pub use table::ResponseTable;
