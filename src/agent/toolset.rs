use tracing::{Level, event};

use crate::catalog::{CatalogClient, GraphQlTransport, TableSchema};
use crate::embed::EmbedTrait;
use crate::error::{Error, Result};
use crate::generate::GenerativeTrait;
use crate::search::{SearchHit, SearchService};
use crate::vector::VectorStoreTrait;

/// Tables considered when drafting SQL for a question.
const SQL_CANDIDATE_TABLES: usize = 2;

const SQL_INSTRUCTION: &str = "You are a helpful assistant specialized in data exploration \
and SQL generation. Based on the user's request and the table schemas below, generate an \
accurate and efficient PostgreSQL query. Present the final SQL query, explaining which \
table(s) it uses and why.";

/// One search hit joined with its full schema.
#[derive(Clone, Debug)]
pub struct DiscoveredTable {
    pub urn: String,
    pub score: f32,
    /// The indexed summary text ("Table: ...\nDescription: ...").
    pub summary: String,
    pub schema: TableSchema,
}

/// Chains the cheap ranked search with the detailed on-demand schema
/// lookup, the way the conversational agent consumes the core.
pub struct DiscoveryToolset<'a, T, G, E, V>
where
    T: GraphQlTransport,
    G: GenerativeTrait,
    E: EmbedTrait,
    V: VectorStoreTrait,
{
    catalog: &'a CatalogClient<T>,
    search: &'a SearchService<'a, E, V>,
    generator: &'a G,
}

impl<'a, T, G, E, V> DiscoveryToolset<'a, T, G, E, V>
where
    T: GraphQlTransport,
    G: GenerativeTrait,
    E: EmbedTrait,
    V: VectorStoreTrait,
{
    pub fn new(
        catalog: &'a CatalogClient<T>,
        search: &'a SearchService<'a, E, V>,
        generator: &'a G,
    ) -> Self {
        Self {
            catalog,
            search,
            generator,
        }
    }

    /// Search for relevant tables and describe each hit's schema.
    pub async fn find_tables(
        &self,
        question: &str,
        top_k: Option<usize>,
    ) -> Result<Vec<DiscoveredTable>> {
        let hits = self.search.search(question, top_k).await?;
        let mut tables = Vec::with_capacity(hits.len());
        for SearchHit {
            score,
            table_urn,
            text,
        } in hits
        {
            let schema = self.catalog.describe_table(&table_urn).await?;
            tables.push(DiscoveredTable {
                urn: table_urn,
                score,
                summary: text,
                schema,
            });
        }
        Ok(tables)
    }

    /// One-shot SQL drafting: retrieve candidate tables, feed their schemas
    /// to the generative provider, and return its first answer verbatim.
    pub async fn draft_sql(&self, question: &str) -> Result<String> {
        let tables = self
            .find_tables(question, Some(SQL_CANDIDATE_TABLES))
            .await?;
        if tables.is_empty() {
            return Ok("No relevant tables were found for this question.".to_string());
        }

        let prompt = build_sql_prompt(question, &tables);
        event!(
            Level::INFO,
            "drafting SQL against {} candidate table(s)",
            tables.len()
        );
        let candidates = self.generator.generate(&prompt).await?;
        candidates
            .into_iter()
            .next()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::generation("the model returned no candidates"))
    }
}

fn build_sql_prompt(question: &str, tables: &[DiscoveredTable]) -> String {
    let mut prompt = format!("{SQL_INSTRUCTION}\n\n");
    for table in tables {
        prompt.push_str(&table.summary);
        prompt.push_str(&format!("\nUrn: {}\nColumns:\n", table.urn));
        if table.schema.columns.is_empty() {
            prompt.push_str(" (no columns declared)\n");
        }
        for column in &table.schema.columns {
            prompt.push_str(&format!(
                " - {} (Type: {})",
                column.name,
                column.column_type.as_deref().unwrap_or("unknown")
            ));
            if let Some(description) = &column.description {
                prompt.push_str(&format!(": {description}"));
            }
            prompt.push('\n');
        }
        prompt.push('\n');
    }
    prompt.push_str(&format!("Request: {question}\n"));
    prompt
}
