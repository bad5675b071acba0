//! Ingestion pipeline: catalog metadata to searchable vector collection.

pub mod indexer;
pub mod rate_limit;

pub use indexer::{IndexReport, Indexer, IndexerOptions};
pub use rate_limit::RateLimiter;
