use reqwest::{Client, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An order-preserving batch embedding function.
///
/// One model is pinned per collection lifetime: mixing embedding models
/// silently produces meaningless similarity scores, so the same instance
/// must serve both the write path and the read path.
pub trait EmbedTrait {
    /// Map texts to fixed-length vectors; vector `i` corresponds to text `i`.
    fn embed(&self, texts: &[String]) -> impl Future<Output = Result<Vec<Vec<f32>>>>;

    /// The fixed output dimension of the pinned model.
    fn dimension(&self) -> usize;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
    encoding_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// Embeddings over an OpenAI-compatible `/embeddings` endpoint.
pub struct OpenAIEmbedder {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    dimension: usize,
}

impl OpenAIEmbedder {
    pub fn new(api_url: String, api_key: Option<String>, model: String, dimension: usize) -> Self {
        Self {
            client: Client::new(),
            api_url: format!("{}/embeddings", api_url.trim_end_matches('/')),
            api_key,
            model,
            dimension,
        }
    }
}

impl EmbedTrait for OpenAIEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let request = EmbeddingRequest {
            model: self.model.clone(),
            input: texts.to_vec(),
            encoding_format: "float",
        };
        let mut builder = self
            .client
            .post(&self.api_url)
            .header(CONTENT_TYPE, "application/json")
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await.map_err(Error::embedding)?;
        let response = response.error_for_status().map_err(Error::embedding)?;
        let body: EmbeddingResponse = response.json().await.map_err(Error::embedding)?;

        // The API tags each vector with its input index; reorder so the
        // batch stays aligned with the input texts.
        let mut data = body.data;
        data.sort_by_key(|entry| entry.index);
        if data.len() != texts.len() {
            return Err(Error::embedding(format!(
                "expected {} embeddings, received {}",
                texts.len(),
                data.len()
            )));
        }
        for entry in &data {
            if entry.embedding.len() != self.dimension {
                return Err(Error::embedding(format!(
                    "expected dimension {}, received {}",
                    self.dimension,
                    entry.embedding.len()
                )));
            }
        }
        Ok(data.into_iter().map(|entry| entry.embedding).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
