//! Text embedding provider.

pub mod openai;

pub use openai::{EmbedTrait, OpenAIEmbedder};
