//! Question classification: shapes, categories and descriptor construction.

mod category;
mod classifier;
mod shape;

pub use category::QuestionCategory;
pub use classifier::classify;
pub use shape::Shape;
