//! Oracle-backed recommendations.
//!
//! The oracle is an external chat-completions model that picks the best gifts
//! out of a short list of catalog candidates. This crate owns:
//! - the `LlmClient` seam and its OpenAI-compatible HTTP implementation
//! - prompt construction from a recipient profile and its candidates
//! - tolerant parsing of the oracle's ranked list
//! - `AiStrategy`, the first tier of the recommendation fallback chain
//!
//! The oracle only ranks. Prices, links and images always come from the
//! catalog entry a returned name resolves to; names that resolve to nothing
//! are dropped.

pub mod chat;
pub mod llm;
pub mod parse;
pub mod prompt;
pub mod strategy;

pub use chat::ChatCompletionsClient;
pub use llm::{ChatMessage, ChatPrompt, LlmClient, Role};
pub use parse::{parse_ranked_list, OracleChoice};
pub use strategy::{AiStatus, AiStrategy};
