//! OpenSearch bulk client implementation.
//!
//! This module provides the concrete implementation of `BulkClient` using the
//! OpenSearch Rust crate, plus the index registration calls used at setup.

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, OpenSearch,
};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::BulkClient;
use crate::mapping::IndexMapping;
use crate::types::{BulkFailure, BulkItemFailure};
use search_sync_shared::Document;

/// OpenSearch bulk client.
///
/// Every batch is sent as one `_bulk` request against the target index. The
/// engine is typeless, so the type name is only used for logging.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchBulkClient::new("http://localhost:9200").await?;
///
/// let mut data = serde_json::Map::new();
/// data.insert("title".to_string(), serde_json::json!("Hello"));
/// client.add_documents("app", "post", &[Document::new("1", data)]).await?;
/// ```
pub struct OpenSearchBulkClient {
    client: OpenSearch,
}

impl OpenSearchBulkClient {
    /// Create a new client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchBulkClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or the transport cannot be built
    pub async fn new(url: &str) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch bulk client");

        Ok(Self { client })
    }

    /// Check whether an index exists.
    pub async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(SearchIndexError::connection(format!(
                "Index existence check failed with status {}",
                status
            ))),
        }
    }

    /// Create an index from a schema document.
    ///
    /// # Arguments
    ///
    /// * `index` - Name of the index to create
    /// * `mapping` - Schema produced by `MappingBuilder::build_index_mapping`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created
    /// * `Err(SearchIndexError)` - If the schema cannot be sent or the engine rejects it
    pub async fn create_index(
        &self,
        index: &str,
        mapping: &IndexMapping,
    ) -> Result<(), SearchIndexError> {
        let body = typeless_index_body(mapping)?;

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(SearchIndexError::index_creation(format!(
                "Index creation failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %index, "Created index");
        Ok(())
    }

    /// Send one bulk request and interpret the response.
    async fn send_bulk(
        &self,
        index: &str,
        type_name: &str,
        body: Vec<JsonBody<Value>>,
    ) -> Result<(), SearchIndexError> {
        if body.is_empty() {
            debug!(index = %index, type_name = %type_name, "Skipping empty bulk request");
            return Ok(());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_index(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        check_bulk_response(&response_body)?;

        debug!(index = %index, type_name = %type_name, "Bulk request completed");
        Ok(())
    }
}

#[async_trait]
impl BulkClient for OpenSearchBulkClient {
    async fn add_documents(
        &self,
        index: &str,
        type_name: &str,
        documents: &[Document],
    ) -> Result<(), SearchIndexError> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            body.push(action_line("index", &document.id, document.routing.as_deref()).into());
            body.push(Value::Object(document.data.clone()).into());
        }
        self.send_bulk(index, type_name, body).await
    }

    async fn update_documents(
        &self,
        index: &str,
        type_name: &str,
        documents: &[Document],
    ) -> Result<(), SearchIndexError> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            body.push(action_line("update", &document.id, document.routing.as_deref()).into());
            body.push(
                json!({
                    "doc": document.data,
                    "doc_as_upsert": document.doc_as_upsert
                })
                .into(),
            );
        }
        self.send_bulk(index, type_name, body).await
    }

    async fn delete_documents(
        &self,
        index: &str,
        type_name: &str,
        documents: &[Document],
    ) -> Result<(), SearchIndexError> {
        let body: Vec<JsonBody<Value>> = documents
            .iter()
            .map(|document| {
                action_line("delete", &document.id, document.routing.as_deref()).into()
            })
            .collect();
        self.send_bulk(index, type_name, body).await
    }

    async fn delete_ids(
        &self,
        identifiers: &[String],
        index: &str,
        type_name: &str,
        routing: Option<&str>,
    ) -> Result<(), SearchIndexError> {
        let body: Vec<JsonBody<Value>> = identifiers
            .iter()
            .map(|id| action_line("delete", id, routing).into())
            .collect();
        self.send_bulk(index, type_name, body).await
    }
}

/// Build the metadata line of a bulk action.
fn action_line(action: &str, id: &str, routing: Option<&str>) -> Value {
    let mut meta = Map::new();
    meta.insert("_id".to_string(), json!(id));
    if let Some(routing) = routing {
        meta.insert("routing".to_string(), json!(routing));
    }
    let mut line = Map::new();
    line.insert(action.to_string(), Value::Object(meta));
    Value::Object(line)
}

/// Turn a bulk response reporting `"errors": true` into a partial failure.
///
/// Every item carrying an `error` object is reported, in response order.
fn check_bulk_response(response: &Value) -> Result<(), SearchIndexError> {
    if !response.get("errors").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(());
    }

    let items = response
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("Bulk response reported errors without items"))?;

    let failures: Vec<BulkItemFailure> = items
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|item| item.iter())
        .filter_map(|(action, result)| {
            let error = result.get("error")?;
            let reason = error
                .get("reason")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            Some(BulkItemFailure::new(
                result.get("_id").and_then(Value::as_str).unwrap_or_default(),
                action.as_str(),
                result
                    .get("status")
                    .and_then(Value::as_u64)
                    .and_then(|status| u16::try_from(status).ok())
                    .unwrap_or_default(),
                reason,
            ))
        })
        .collect();

    if failures.is_empty() {
        return Err(SearchIndexError::parse(
            "Bulk response reported errors without failed items",
        ));
    }

    warn!(failed = failures.len(), "Bulk request had failures");

    Err(SearchIndexError::bulk_partial_failure(BulkFailure::new(
        "Bulk request had failures",
        failures,
    )))
}

/// Build the index creation body for a typeless engine.
///
/// Settings are copied as-is. The engine accepts a single mapping per index,
/// so the schema must describe at most one type.
fn typeless_index_body(mapping: &IndexMapping) -> Result<Value, SearchIndexError> {
    let mut body = Map::new();

    if let Some(settings) = &mapping.settings {
        body.insert("settings".to_string(), Value::Object(settings.clone()));
    }

    if let Some(mappings) = &mapping.mappings {
        if mappings.len() > 1 {
            let names: Vec<&str> = mappings.names().collect();
            return Err(SearchIndexError::index_creation(format!(
                "A typeless index holds a single mapping, got types: {}",
                names.join(", ")
            )));
        }
        if let Some((_, type_mapping)) = mappings.iter().next() {
            body.insert(
                "mappings".to_string(),
                Value::Object(type_mapping.as_map().clone()),
            );
        }
    }

    Ok(Value::Object(body))
}
