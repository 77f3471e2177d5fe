//! Survey platform API client.

mod client;

pub use client::{PollClient, QuestionsPayload};
