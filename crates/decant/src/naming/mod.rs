//! Semantic variable naming: oracle trait, implementations and the engine.

mod engine;
mod mock;
mod openai;
mod oracle;
pub(crate) mod sanitize;

pub use engine::rename;
pub use mock::MockOracle;
pub use openai::OpenAiOracle;
pub use oracle::{NamingOracle, SuffixRequest};
pub use sanitize::{is_platform_id, is_valid_suffix, sanitize_suffix};
