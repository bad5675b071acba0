use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// One table known to the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    /// Opaque stable identifier assigned by the catalog.
    pub urn: String,
    pub name: String,
}

/// One schema field of a table, in the catalog's declared order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// The catalog's type representation flattened to a display string.
    pub column_type: Option<String>,
    pub description: Option<String>,
}

/// Result of describing one table. Fetched on demand, never cached here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub description: Option<String>,
    pub columns: Vec<ColumnInfo>,
}

/// Outcome of paging through the catalog.
///
/// A failure on page N must not discard pages 1..N-1, so the accumulated
/// prefix and the terminating error travel together and the caller decides
/// whether the prefix is still usable.
#[derive(Debug)]
pub struct TableEnumeration {
    pub tables: Vec<TableRef>,
    pub error: Option<Error>,
}

impl TableEnumeration {
    pub fn is_partial(&self) -> bool {
        self.error.is_some()
    }
}

/// A GraphQL request body for the catalog endpoint.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest {
    pub query: String,
    pub variables: Value,
}

impl GraphQlRequest {
    pub fn new(query: &str, variables: Value) -> Self {
        Self {
            query: query.to_string(),
            variables,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse {
    pub data: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchData {
    pub search: SearchPage,
}

/// One page of the catalog's paginated dataset search.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchPage {
    pub total: u64,
    pub search_results: Vec<SearchResultEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResultEntry {
    pub entity: DatasetEntity,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatasetEntity {
    pub urn: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatasetData {
    pub dataset: Option<DatasetAspects>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DatasetAspects {
    #[serde(default)]
    pub schema_metadata: Option<SchemaMetadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SchemaMetadata {
    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaField {
    pub field_path: String,
    #[serde(default, rename = "type")]
    pub field_type: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Flatten the catalog's raw type representation to one display string.
///
/// DataHub may return the field type as a plain string, an enum-like
/// object, or a nested `{ "type": ... }` structure depending on the
/// GraphQL selection; all of them reduce to a single descriptive string.
pub(crate) fn flatten_field_type(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => match map.get("type") {
            Some(inner) => flatten_field_type(inner),
            None => Some(value.to_string()),
        },
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_plain_string_type() {
        assert_eq!(
            flatten_field_type(&json!("NumberType")),
            Some("NumberType".to_string())
        );
    }

    #[test]
    fn test_flatten_nested_type() {
        let nested = json!({"type": {"type": "StringType"}});
        assert_eq!(flatten_field_type(&nested), Some("StringType".to_string()));
    }

    #[test]
    fn test_flatten_null_type() {
        assert_eq!(flatten_field_type(&Value::Null), None);
    }

    #[test]
    fn test_flatten_object_without_type_key() {
        let odd = json!({"nativeDataType": "varchar(255)"});
        assert_eq!(
            flatten_field_type(&odd),
            Some(r#"{"nativeDataType":"varchar(255)"}"#.to_string())
        );
    }

    #[test]
    fn test_search_page_deserializes() {
        let page: SearchData = serde_json::from_value(json!({
            "search": {
                "start": 0,
                "count": 2,
                "total": 2,
                "searchResults": [
                    {"entity": {"urn": "urn:li:dataset:1", "name": "users"}},
                    {"entity": {"urn": "urn:li:dataset:2"}}
                ]
            }
        }))
        .unwrap();
        assert_eq!(page.search.total, 2);
        assert_eq!(page.search.search_results.len(), 2);
        assert_eq!(page.search.search_results[1].entity.name, None);
    }
}
