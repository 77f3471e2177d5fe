//! Derived per-variable metadata and its assembly.

mod assembler;
mod descriptor;
mod table;

pub use assembler::assemble;
pub use descriptor::VariableDescriptor;
pub use table::{MetadataRow, MetadataTable};
