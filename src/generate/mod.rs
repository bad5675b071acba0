//! Natural-language table descriptions from a generative text provider.

pub mod describer;
pub mod gemini;

pub use describer::{GENERATION_FAILED, NO_COLUMNS, NOT_CONFIGURED, TableDescriber};
pub use gemini::{GeminiClient, GenerativeTrait};
