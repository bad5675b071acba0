use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Similarity metric of a collection. Only cosine is used by this crate,
/// the variants mirror the vector store's wire names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distance {
    Cosine,
    Dot,
    Euclid,
}

/// Payload stored alongside each vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub text: String,
    pub table_urn: String,
}

/// One table's searchable summary as persisted in the vector store.
///
/// The vector's length must equal the collection's configured dimension;
/// the indexer guarantees this by recreating the collection with the
/// embedder's dimension before every run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub payload: DocumentPayload,
}

/// One nearest-neighbor match as returned by the vector store.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredPoint {
    pub score: f32,
    pub payload: DocumentPayload,
}
