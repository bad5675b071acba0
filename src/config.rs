use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::env;

use crate::generate::gemini::DEFAULT_GEMINI_MODEL;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: ServiceConfig,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rebuild the vector collection from the current catalog state
    Index,
    /// Semantic search over the indexed table summaries
    Search {
        query: String,
        #[arg(long, default_value_t = crate::search::DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// Show the schema of one table by urn
    Describe { urn: String },
    /// List the tables known to the catalog
    Tables {
        /// Print at most this many entries
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Draft a PostgreSQL query for a natural-language question
    Sql { question: String },
}

/// Connection settings for the external collaborators, with local-dev
/// defaults. Environment variables are checked before the flag values.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the DataHub GMS endpoint
    #[arg(long, default_value = "http://localhost:8080")]
    pub gms_url: String,

    /// Qdrant host
    #[arg(long, default_value = "localhost")]
    pub qdrant_host: String,

    /// Qdrant HTTP port
    #[arg(long, default_value_t = 6333)]
    pub qdrant_port: u16,

    /// Name of the vector collection holding the table summaries
    #[arg(long, default_value = "datahub_tables")]
    pub collection: String,

    /// Base URL of the OpenAI-compatible embeddings endpoint
    #[arg(long, default_value = "http://localhost:8001/v1")]
    pub embed_api_url: String,

    /// Embedding model pinned for the collection lifetime
    #[arg(long, default_value = "BAAI/bge-base-en-v1.5")]
    pub embed_model: String,

    /// Output dimension of the embedding model
    #[arg(long, default_value_t = 768)]
    pub embed_dimension: usize,

    /// Generative model used for table descriptions and SQL drafting
    #[arg(long, default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    /// Records requested per catalog search page
    #[arg(long, default_value_t = 500)]
    pub page_size: u64,

    /// Description-generation calls allowed per minute
    #[arg(long, default_value_t = 10)]
    pub rate_limit: u32,
}

impl ServiceConfig {
    pub fn gms_url(&self) -> String {
        env::var("DATAHUB_GMS_URL").unwrap_or_else(|_| self.gms_url.clone())
    }

    pub fn datahub_token(&self) -> Option<String> {
        env::var("DATAHUB_TOKEN").ok().filter(|t| !t.is_empty())
    }

    pub fn google_api_key(&self) -> Option<String> {
        env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty())
    }

    pub fn qdrant_host(&self) -> String {
        env::var("QDRANT_HOST").unwrap_or_else(|_| self.qdrant_host.clone())
    }

    pub fn qdrant_port(&self) -> u16 {
        env::var("QDRANT_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(self.qdrant_port)
    }

    pub fn collection(&self) -> String {
        env::var("QDRANT_COLLECTION").unwrap_or_else(|_| self.collection.clone())
    }

    pub fn embed_api_url(&self) -> String {
        env::var("EMBED_API_URL").unwrap_or_else(|_| self.embed_api_url.clone())
    }

    pub fn embed_api_key(&self) -> Option<String> {
        env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())
    }
}
