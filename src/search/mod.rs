//! Semantic search over the indexed table summaries.

pub mod service;

pub use service::{DEFAULT_TOP_K, SearchHit, SearchService};
