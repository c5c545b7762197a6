//! LLM client: OpenAI chat completions.

mod openai;

pub use openai::{ChatMessage, OpenAiClient, OpenAiError};
