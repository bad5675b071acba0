use serde::{Deserialize, Serialize};
use tracing::{Level, event};

use crate::embed::EmbedTrait;
use crate::error::{Error, Result};
use crate::vector::VectorStoreTrait;

pub const DEFAULT_TOP_K: usize = 7;

/// One ranked match for a free-text table query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Similarity score, higher is more relevant.
    pub score: f32,
    pub table_urn: String,
    pub text: String,
}

/// Semantic lookup over the indexed table summaries.
///
/// Must be wired with the same embedder instance the indexer ran with;
/// the collection's scores are meaningless across embedding models.
pub struct SearchService<'a, E, V>
where
    E: EmbedTrait,
    V: VectorStoreTrait,
{
    embedder: &'a E,
    store: &'a V,
    collection: String,
}

impl<'a, E, V> SearchService<'a, E, V>
where
    E: EmbedTrait,
    V: VectorStoreTrait,
{
    pub fn new(embedder: &'a E, store: &'a V, collection: String) -> Self {
        Self {
            embedder,
            store,
            collection,
        }
    }

    /// Return up to `top_k` hits ranked by descending similarity.
    ///
    /// `top_k` must be positive; it defaults to [`DEFAULT_TOP_K`] and the
    /// vector store enforces its own upper limits. A missing collection
    /// surfaces as [`Error::CollectionUnavailable`]: ingestion has not run.
    pub async fn search(&self, query: &str, top_k: Option<usize>) -> Result<Vec<SearchHit>> {
        let top_k = top_k.unwrap_or(DEFAULT_TOP_K);
        event!(
            Level::INFO,
            "searching collection {} for '{}' (top {})",
            self.collection,
            query,
            top_k
        );

        let vectors = self.embedder.embed(&[query.to_string()]).await?;
        let vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| Error::embedding("empty embedding batch for the query"))?;

        let points = self.store.search(&self.collection, vector, top_k).await?;
        let mut hits: Vec<SearchHit> = points
            .into_iter()
            .map(|point| SearchHit {
                score: point.score,
                table_urn: point.payload.table_urn,
                text: point.payload.text,
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(hits)
    }
}
