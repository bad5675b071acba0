//! Client for the catalog service (DataHub GMS) over its GraphQL endpoint.

pub mod client;
pub mod types;

pub use client::{CatalogClient, GraphQlTransport, HttpTransport};
pub use types::{ColumnInfo, GraphQlRequest, TableEnumeration, TableRef, TableSchema};
