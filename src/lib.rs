//! Retrieval-augmented table discovery over a data catalog.
//!
//! Harvests table metadata from a DataHub catalog, summarizes each table
//! with a generated one-sentence description, indexes the summaries in a
//! Qdrant collection, and answers free-text queries with ranked table
//! references that a SQL-drafting agent can describe in detail.

pub mod agent;
pub mod catalog;
pub mod config;
pub mod embed;
pub mod error;
pub mod generate;
pub mod index;
pub mod search;
pub mod vector;

pub use error::{Error, Result};
