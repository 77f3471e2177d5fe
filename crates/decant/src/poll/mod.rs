//! Raw survey question model and wire-format normalization.

mod model;
mod normalize;

pub use model::{Group, InputKind, Item, Localized, Question, TypeTag};
pub use normalize::normalize_question;
