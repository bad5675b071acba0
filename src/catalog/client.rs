use reqwest::{Client, header::CONTENT_TYPE};
use serde_json::{Value, json};
use tracing::{Level, event};

use super::types::{
    ColumnInfo, DatasetData, GraphQlRequest, GraphQlResponse, SearchData, TableEnumeration,
    TableRef, TableSchema, flatten_field_type,
};
use crate::error::{Error, Result};

/// Paginated dataset search over the catalog's GraphQL endpoint.
const SEARCH_QUERY: &str = r#"
query search($input: SearchInput!) {
  search(input: $input) {
    start
    count
    total
    searchResults {
      entity {
        urn
        ... on Dataset {
          name
        }
      }
    }
  }
}
"#;

/// Single-dataset schema fetch by urn.
const DATASET_QUERY: &str = r#"
query getDataset($urn: String!) {
  dataset(urn: $urn) {
    urn
    schemaMetadata {
      fields {
        fieldPath
        type
        description
      }
    }
  }
}
"#;

/// Seam between the catalog client and the wire.
///
/// The production transport posts to the catalog's HTTP endpoint; tests
/// script responses to exercise pagination and the partial-result contract.
pub trait GraphQlTransport {
    /// Post one GraphQL request and return the response's `data` object.
    fn post(&self, request: &GraphQlRequest) -> impl Future<Output = Result<Value>>;
}

/// Bearer-token-authenticated transport for a DataHub GMS endpoint.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(gms_url: &str, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/graphql", gms_url.trim_end_matches('/')),
            token,
        }
    }
}

impl GraphQlTransport for HttpTransport {
    async fn post(&self, request: &GraphQlRequest) -> Result<Value> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await.map_err(Error::catalog)?;
        let response = response.error_for_status().map_err(Error::catalog)?;
        let body: GraphQlResponse = response.json().await.map_err(Error::catalog)?;
        body.data
            .filter(|data| !data.is_null())
            .ok_or_else(|| Error::catalog("no data returned from the catalog GraphQL API"))
    }
}

/// Stateless request/response client for the catalog service.
///
/// Retry policy is deliberately absent here: each failure carries the
/// failing identifier so the caller can skip-and-continue or abort.
pub struct CatalogClient<T: GraphQlTransport> {
    transport: T,
}

impl<T: GraphQlTransport> CatalogClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Page through the catalog's wildcard dataset search.
    ///
    /// Terminates on an empty page or once the running offset reaches the
    /// reported total. A failing page ends the walk but keeps everything
    /// fetched before it.
    pub async fn enumerate_tables(&self, page_size: u64) -> TableEnumeration {
        let mut tables = Vec::new();
        let mut start = 0u64;
        let mut total = u64::MAX;

        event!(Level::INFO, "fetching all datasets from the catalog");
        while start < total {
            let variables = json!({
                "input": {
                    "type": "DATASET",
                    "query": "*",
                    "filters": [],
                    "start": start,
                    "count": page_size,
                }
            });
            let request = GraphQlRequest::new(SEARCH_QUERY, variables);
            let page = match self.transport.post(&request).await.and_then(|data| {
                serde_json::from_value::<SearchData>(data).map_err(Error::catalog)
            }) {
                Ok(data) => data.search,
                Err(error) => {
                    event!(
                        Level::WARN,
                        "dataset enumeration stopped at offset {}: {}",
                        start,
                        error
                    );
                    return TableEnumeration {
                        tables,
                        error: Some(error),
                    };
                }
            };

            total = page.total;
            if page.search_results.is_empty() {
                break;
            }
            start += page.search_results.len() as u64;
            for result in page.search_results {
                tables.push(TableRef {
                    urn: result.entity.urn,
                    name: result.entity.name.unwrap_or_default(),
                });
            }
            event!(Level::INFO, "fetched {}/{} datasets", start, total);
        }

        event!(Level::INFO, "finished fetching, {} datasets found", tables.len());
        TableEnumeration {
            tables,
            error: None,
        }
    }

    /// Fetch one table's schema aspect.
    ///
    /// A dataset that exists but declares zero fields yields an empty
    /// column sequence, not an error.
    pub async fn describe_table(&self, urn: &str) -> Result<TableSchema> {
        let request = GraphQlRequest::new(DATASET_QUERY, json!({ "urn": urn }));
        let data = self.transport.post(&request).await?;
        let data: DatasetData = serde_json::from_value(data).map_err(Error::catalog)?;
        let Some(aspects) = data.dataset else {
            return Err(Error::TableNotFound {
                urn: urn.to_string(),
            });
        };

        let columns = aspects
            .schema_metadata
            .map(|metadata| {
                metadata
                    .fields
                    .into_iter()
                    .map(|field| ColumnInfo {
                        name: field.field_path,
                        column_type: field
                            .field_type
                            .as_ref()
                            .and_then(flatten_field_type),
                        description: field.description,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(TableSchema {
            description: None,
            columns,
        })
    }
}
