use tracing::{Level, event};

use super::gemini::GenerativeTrait;
use crate::catalog::ColumnInfo;

/// Sentinel returned when no generative provider is configured.
pub const NOT_CONFIGURED: &str = "(model not configured)";
/// Sentinel returned for a table with an empty schema; no model call is made.
pub const NO_COLUMNS: &str = "(table has no columns to describe)";
/// Sentinel returned when the model call fails or produces no candidates.
pub const GENERATION_FAILED: &str = "(failed to generate description)";

/// Produces a one-sentence natural-language summary of a table.
///
/// Degrades to sentinel strings instead of failing: a description failure
/// never aborts the larger pipeline, and the pipeline stays runnable with
/// no provider configured at all.
pub struct TableDescriber<G> {
    provider: Option<G>,
}

impl<G: GenerativeTrait> TableDescriber<G> {
    pub fn new(provider: Option<G>) -> Self {
        Self { provider }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn describe(&self, table_name: &str, columns: &[ColumnInfo]) -> String {
        let Some(provider) = &self.provider else {
            return NOT_CONFIGURED.to_string();
        };
        // An empty schema would waste a rate-limited call.
        if columns.is_empty() {
            return NO_COLUMNS.to_string();
        }

        let prompt = build_prompt(table_name, columns);
        event!(Level::INFO, "generating description for table {}", table_name);
        match provider.generate(&prompt).await {
            Ok(candidates) => match candidates.first() {
                Some(text) if !text.trim().is_empty() => text.trim().to_string(),
                _ => {
                    event!(
                        Level::WARN,
                        "model returned no candidates for table {}",
                        table_name
                    );
                    GENERATION_FAILED.to_string()
                }
            },
            Err(error) => {
                event!(
                    Level::WARN,
                    "description call failed for table {}: {}",
                    table_name,
                    error
                );
                GENERATION_FAILED.to_string()
            }
        }
    }
}

/// Deterministic prompt: table name plus each column's name and type, with
/// its existing description appended when present.
fn build_prompt(table_name: &str, columns: &[ColumnInfo]) -> String {
    let mut prompt = format!(
        "Generate a concise, one-sentence description for a database table \
         named '{table_name}' based on its columns.\n\nColumns:\n"
    );
    for column in columns {
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
    prompt.push_str("\nDescription:");
    prompt
}
