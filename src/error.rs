use thiserror::Error;

/// Failure taxonomy shared across the crate.
///
/// Callers must be able to tell "stop the batch" apart from "skip this
/// item" programmatically, so every external collaborator gets its own
/// variant rather than a stringly-typed catch-all.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure or malformed response from the catalog service.
    #[error("catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    /// The catalog has no dataset for the given identifier. Indicates a
    /// caller error (bad urn), not a transient failure.
    #[error("no dataset found in the catalog for urn '{urn}'")]
    TableNotFound { urn: String },

    /// The named collection does not exist in the vector store. The
    /// actionable signal that ingestion must run first.
    #[error("collection '{collection}' does not exist; run ingestion first")]
    CollectionUnavailable { collection: String },

    /// Transport failure or malformed response from the vector store.
    #[error("vector store request failed: {reason}")]
    VectorStoreUnavailable { reason: String },

    /// The embedding provider failed or returned a malformed batch.
    #[error("embedding request failed: {reason}")]
    EmbeddingFailed { reason: String },

    /// The generative text provider failed outright. Recovered with a
    /// sentinel description during ingestion, surfaced elsewhere.
    #[error("text generation request failed: {reason}")]
    GenerationFailed { reason: String },
}

impl Error {
    pub(crate) fn catalog(reason: impl ToString) -> Self {
        Self::CatalogUnavailable {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn vector_store(reason: impl ToString) -> Self {
        Self::VectorStoreUnavailable {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn embedding(reason: impl ToString) -> Self {
        Self::EmbeddingFailed {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn generation(reason: impl ToString) -> Self {
        Self::GenerationFailed {
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
