use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

use super::types::{Distance, DocumentPayload, IndexedDocument, ScoredPoint};
use crate::error::{Error, Result};

/// Operations consumed from the vector store.
///
/// The store exclusively owns persisted documents: a re-index replaces the
/// whole collection (delete-then-create), never documents in place.
pub trait VectorStoreTrait {
    fn list_collections(&self) -> impl Future<Output = Result<Vec<String>>>;
    fn delete_collection(&self, name: &str) -> impl Future<Output = Result<()>>;
    fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        distance: Distance,
    ) -> impl Future<Output = Result<()>>;
    fn upsert(
        &self,
        name: &str,
        documents: Vec<IndexedDocument>,
    ) -> impl Future<Output = Result<()>>;
    fn search(
        &self,
        name: &str,
        vector: Vec<f32>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ScoredPoint>>>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct CollectionsResult {
    collections: Vec<CollectionDescription>,
}

#[derive(Debug, Deserialize)]
struct CollectionDescription {
    name: String,
}

#[derive(Debug, Serialize)]
struct CreateCollectionRequest {
    vectors: VectorParams,
}

#[derive(Debug, Serialize)]
struct VectorParams {
    size: usize,
    distance: Distance,
}

#[derive(Debug, Serialize)]
struct UpsertRequest {
    points: Vec<IndexedDocument>,
}

#[derive(Debug, Serialize)]
struct SearchRequest {
    vector: Vec<f32>,
    limit: usize,
    with_payload: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResultEntry {
    score: f32,
    #[serde(default)]
    payload: Option<DocumentPayload>,
}

/// Client for the Qdrant REST API, addressed by host and port.
pub struct QdrantClient {
    client: Client,
    base_url: String,
}

impl QdrantClient {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("http://{host}:{port}"),
        }
    }

    fn collection_url(&self, name: &str) -> String {
        format!("{}/collections/{}", self.base_url, name)
    }

    fn missing_collection(name: &str, status: StatusCode) -> Option<Error> {
        (status == StatusCode::NOT_FOUND).then(|| Error::CollectionUnavailable {
            collection: name.to_string(),
        })
    }
}

impl VectorStoreTrait for QdrantClient {
    async fn list_collections(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/collections", self.base_url))
            .send()
            .await
            .map_err(Error::vector_store)?
            .error_for_status()
            .map_err(Error::vector_store)?;
        let body: Envelope<CollectionsResult> =
            response.json().await.map_err(Error::vector_store)?;
        Ok(body
            .result
            .collections
            .into_iter()
            .map(|collection| collection.name)
            .collect())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        self.client
            .delete(self.collection_url(name))
            .send()
            .await
            .map_err(Error::vector_store)?
            .error_for_status()
            .map_err(Error::vector_store)?;
        Ok(())
    }

    async fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        distance: Distance,
    ) -> Result<()> {
        let request = CreateCollectionRequest {
            vectors: VectorParams {
                size: dimension,
                distance,
            },
        };
        self.client
            .put(self.collection_url(name))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(Error::vector_store)?
            .error_for_status()
            .map_err(Error::vector_store)?;
        event!(
            Level::INFO,
            "created collection {} with dimension {}",
            name,
            dimension
        );
        Ok(())
    }

    async fn upsert(&self, name: &str, documents: Vec<IndexedDocument>) -> Result<()> {
        let request = UpsertRequest { points: documents };
        let response = self
            .client
            .put(format!("{}/points", self.collection_url(name)))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(Error::vector_store)?;
        if let Some(error) = Self::missing_collection(name, response.status()) {
            return Err(error);
        }
        response.error_for_status().map_err(Error::vector_store)?;
        Ok(())
    }

    async fn search(&self, name: &str, vector: Vec<f32>, limit: usize) -> Result<Vec<ScoredPoint>> {
        let request = SearchRequest {
            vector,
            limit,
            with_payload: true,
        };
        let response = self
            .client
            .post(format!("{}/points/search", self.collection_url(name)))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(Error::vector_store)?;
        if let Some(error) = Self::missing_collection(name, response.status()) {
            return Err(error);
        }
        let response = response.error_for_status().map_err(Error::vector_store)?;
        let body: Envelope<Vec<SearchResultEntry>> =
            response.json().await.map_err(Error::vector_store)?;
        Ok(body
            .result
            .into_iter()
            .filter_map(|entry| {
                entry.payload.map(|payload| ScoredPoint {
                    score: entry.score,
                    payload,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_create_collection_body() {
        let request = CreateCollectionRequest {
            vectors: VectorParams {
                size: 768,
                distance: Distance::Cosine,
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"vectors": {"size": 768, "distance": "Cosine"}})
        );
    }

    #[test]
    fn test_upsert_body_carries_id_vector_and_payload() {
        let id = Uuid::new_v4();
        let request = UpsertRequest {
            points: vec![IndexedDocument {
                id,
                vector: vec![0.1, 0.2],
                payload: DocumentPayload {
                    text: "Table: users".to_string(),
                    table_urn: "urn:1".to_string(),
                },
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["points"][0]["id"], json!(id.to_string()));
        assert_eq!(value["points"][0]["payload"]["table_urn"], json!("urn:1"));
    }

    #[test]
    fn test_search_response_skips_entries_without_payload() {
        let body: Envelope<Vec<SearchResultEntry>> = serde_json::from_value(json!({
            "result": [
                {"id": "x", "score": 0.9, "payload": {"text": "t", "table_urn": "urn:1"}},
                {"id": "y", "score": 0.5}
            ]
        }))
        .unwrap();
        let hits: Vec<ScoredPoint> = body
            .result
            .into_iter()
            .filter_map(|entry| entry.payload.map(|payload| ScoredPoint {
                score: entry.score,
                payload,
            }))
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].payload.table_urn, "urn:1");
    }
}
