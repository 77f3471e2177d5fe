//! Command implementations.

pub mod docs;
pub mod etl;
pub mod status;
