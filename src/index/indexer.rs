use tracing::{Level, event};
use uuid::Uuid;

use super::rate_limit::RateLimiter;
use crate::catalog::{CatalogClient, GraphQlTransport};
use crate::embed::EmbedTrait;
use crate::error::Result;
use crate::generate::{GenerativeTrait, TableDescriber};
use crate::vector::{Distance, DocumentPayload, IndexedDocument, VectorStoreTrait};

/// Knobs for one ingestion run.
#[derive(Clone, Debug)]
pub struct IndexerOptions {
    pub collection: String,
    /// Records requested per catalog search page.
    pub page_size: u64,
    /// Description-generation calls allowed per minute.
    pub rate_limit_per_minute: u32,
}

impl Default for IndexerOptions {
    fn default() -> Self {
        Self {
            collection: "datahub_tables".to_string(),
            page_size: 500,
            rate_limit_per_minute: 10,
        }
    }
}

/// Counts reported after an ingestion run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexReport {
    /// Documents upserted into the collection.
    pub indexed: usize,
    /// Tables skipped because of a per-table failure.
    pub skipped: usize,
    /// Whether enumeration stopped early on a failing page.
    pub partial_enumeration: bool,
}

/// Ingestion pipeline: rebuild the searchable collection from the current
/// catalog state.
///
/// The collection is always dropped and recreated before inserting so that
/// stale vectors from a previous embedding model or dimension never coexist
/// with new ones. A mid-run failure before the final bulk upsert therefore
/// leaves the collection empty rather than half-stale.
pub struct Indexer<'a, T, G, E, V>
where
    T: GraphQlTransport,
    G: GenerativeTrait,
    E: EmbedTrait,
    V: VectorStoreTrait,
{
    catalog: &'a CatalogClient<T>,
    describer: &'a TableDescriber<G>,
    embedder: &'a E,
    store: &'a V,
    options: IndexerOptions,
}

impl<'a, T, G, E, V> Indexer<'a, T, G, E, V>
where
    T: GraphQlTransport,
    G: GenerativeTrait,
    E: EmbedTrait,
    V: VectorStoreTrait,
{
    pub fn new(
        catalog: &'a CatalogClient<T>,
        describer: &'a TableDescriber<G>,
        embedder: &'a E,
        store: &'a V,
        options: IndexerOptions,
    ) -> Self {
        Self {
            catalog,
            describer,
            embedder,
            store,
            options,
        }
    }

    pub async fn run(&self) -> Result<IndexReport> {
        let collection = &self.options.collection;

        let existing = self.store.list_collections().await?;
        if existing.iter().any(|name| name == collection) {
            event!(
                Level::INFO,
                "collection {} exists, dropping it to avoid a dimension mismatch",
                collection
            );
            self.store.delete_collection(collection).await?;
        }
        self.store
            .create_collection(collection, self.embedder.dimension(), Distance::Cosine)
            .await?;

        let enumeration = self.catalog.enumerate_tables(self.options.page_size).await;
        if let Some(error) = &enumeration.error {
            event!(
                Level::WARN,
                "enumeration ended early ({}); indexing the {} tables fetched so far",
                error,
                enumeration.tables.len()
            );
        }

        // Single-threaded ingestion: the rate-limit pause suspends the whole
        // run, which is acceptable for a periodic batch job.
        let mut limiter = RateLimiter::new(self.options.rate_limit_per_minute);
        let mut texts = Vec::new();
        let mut urns = Vec::new();
        let mut skipped = 0usize;
        for table in &enumeration.tables {
            let schema = match self.catalog.describe_table(&table.urn).await {
                Ok(schema) => schema,
                Err(error) => {
                    event!(Level::WARN, "skipping table {}: {}", table.urn, error);
                    skipped += 1;
                    continue;
                }
            };
            limiter.acquire().await;
            let description = self.describer.describe(&table.name, &schema.columns).await;
            texts.push(format!(
                "Table: {}\nDescription: {}",
                table.name, description
            ));
            urns.push(table.urn.clone());
        }

        if texts.is_empty() {
            event!(Level::INFO, "no documents to index");
            return Ok(IndexReport {
                indexed: 0,
                skipped,
                partial_enumeration: enumeration.is_partial(),
            });
        }

        event!(Level::INFO, "embedding {} documents", texts.len());
        let vectors = self.embedder.embed(&texts).await?;

        let documents: Vec<IndexedDocument> = urns
            .into_iter()
            .zip(texts)
            .zip(vectors)
            .map(|((table_urn, text), vector)| IndexedDocument {
                id: Uuid::new_v4(),
                vector,
                payload: DocumentPayload { text, table_urn },
            })
            .collect();

        let indexed = documents.len();
        event!(
            Level::INFO,
            "uploading {} documents to collection {}",
            indexed,
            collection
        );
        self.store.upsert(collection, documents).await?;

        Ok(IndexReport {
            indexed,
            skipped,
            partial_enumeration: enumeration.is_partial(),
        })
    }
}
