use anyhow::{Result, bail};
use clap::Parser;
use tracing::{Level, event};

use tablescout::agent::DiscoveryToolset;
use tablescout::catalog::{CatalogClient, HttpTransport};
use tablescout::config::{Cli, Command};
use tablescout::embed::OpenAIEmbedder;
use tablescout::generate::{GeminiClient, TableDescriber};
use tablescout::index::{Indexer, IndexerOptions};
use tablescout::search::SearchService;
use tablescout::vector::QdrantClient;

#[tokio::main]
async fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let transport = HttpTransport::new(&config.gms_url(), config.datahub_token());
    let catalog = CatalogClient::new(transport);
    let store = QdrantClient::new(&config.qdrant_host(), config.qdrant_port());
    let embedder = OpenAIEmbedder::new(
        config.embed_api_url(),
        config.embed_api_key(),
        config.embed_model.clone(),
        config.embed_dimension,
    );

    match cli.command {
        Command::Index => {
            let provider = config
                .google_api_key()
                .map(|key| GeminiClient::new(key, config.gemini_model.clone()));
            let describer = TableDescriber::new(provider);
            if !describer.is_configured() {
                event!(
                    Level::WARN,
                    "GOOGLE_API_KEY not set, table descriptions will not be generated"
                );
            }
            let options = IndexerOptions {
                collection: config.collection(),
                page_size: config.page_size,
                rate_limit_per_minute: config.rate_limit,
            };
            let indexer = Indexer::new(&catalog, &describer, &embedder, &store, options);
            let report = indexer.run().await?;
            println!(
                "indexed {} tables into collection '{}' ({} skipped{})",
                report.indexed,
                config.collection(),
                report.skipped,
                if report.partial_enumeration {
                    ", enumeration was partial"
                } else {
                    ""
                }
            );
        }
        Command::Search { query, top_k } => {
            let service = SearchService::new(&embedder, &store, config.collection());
            let hits = service.search(&query, Some(top_k)).await?;
            for (rank, hit) in hits.iter().enumerate() {
                println!("Result {} (score={:.4}):", rank + 1, hit.score);
                println!("{}", hit.text);
                println!("Urn: {}", hit.table_urn);
                println!("---");
            }
        }
        Command::Describe { urn } => {
            let schema = catalog.describe_table(&urn).await?;
            if let Some(description) = &schema.description {
                println!("{description}");
            }
            if schema.columns.is_empty() {
                println!("(no columns declared)");
            }
            for column in &schema.columns {
                println!(
                    " - {} (Type: {}){}",
                    column.name,
                    column.column_type.as_deref().unwrap_or("unknown"),
                    column
                        .description
                        .as_deref()
                        .map(|d| format!(": {d}"))
                        .unwrap_or_default()
                );
            }
        }
        Command::Tables { limit } => {
            let enumeration = catalog.enumerate_tables(config.page_size).await;
            println!("{} datasets found:", enumeration.tables.len());
            for table in enumeration.tables.iter().take(limit) {
                println!("{} {}", table.urn, table.name);
            }
            if let Some(error) = &enumeration.error {
                bail!("enumeration was partial: {error}");
            }
        }
        Command::Sql { question } => {
            let Some(key) = config.google_api_key() else {
                bail!("GOOGLE_API_KEY must be set to draft SQL");
            };
            let generator = GeminiClient::new(key, config.gemini_model.clone());
            let service = SearchService::new(&embedder, &store, config.collection());
            let toolset = DiscoveryToolset::new(&catalog, &service, &generator);
            println!("{}", toolset.draft_sql(&question).await?);
        }
    }

    Ok(())
}
