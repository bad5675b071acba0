//! Client for the vector store service (Qdrant REST API).

pub mod qdrant;
pub mod types;

pub use qdrant::{QdrantClient, VectorStoreTrait};
pub use types::{Distance, DocumentPayload, IndexedDocument, ScoredPoint};
