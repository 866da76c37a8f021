//! Dependency initialization and wiring for the search sync setup.

use std::fs;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::{ConnectionMode, Settings};
use crate::SetupError;
use search_sync_repository::{
    validate_index_config, IndexMapping, MappingBuilder, OpenSearchBulkClient,
};
use search_sync_shared::IndexConfig;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Validated index configuration.
    pub index_config: IndexConfig,
    /// Schema registered for the index.
    pub mapping: IndexMapping,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// Loads and validates the index configuration, builds its schema,
    /// connects to OpenSearch and creates the index if it does not exist yet.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(SetupError)` - If initialization fails (connection errors only in fail-fast mode)
    pub async fn new() -> Result<Self, SetupError> {
        let settings = Settings::from_env();

        info!(
            opensearch_url = %settings.opensearch_url,
            index_config_path = %settings.index_config_path,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let index_config = load_index_config(&settings.index_config_path)?;
        validate_index_config(&index_config)?;

        let mapping = MappingBuilder::new().build_index_mapping(&index_config);

        info!(
            index = %index_config.name,
            types = index_config.types.len(),
            "Index mapping built"
        );

        let client = Self::connect_to_opensearch(
            &settings.opensearch_url,
            settings.connection_mode,
            settings.retry_interval,
        )
        .await?;

        info!("OpenSearch connection established");

        Self::ensure_index_exists(&client, &index_config.name, &mapping).await?;

        Ok(Self {
            index_config,
            mapping,
        })
    }

    /// Create the index with its schema unless it already exists.
    async fn ensure_index_exists(
        client: &OpenSearchBulkClient,
        index: &str,
        mapping: &IndexMapping,
    ) -> Result<(), SetupError> {
        if client.index_exists(index).await? {
            info!(index = %index, "Index already exists");
            return Ok(());
        }

        client.create_index(index, mapping).await?;
        Ok(())
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    ///
    /// A connection counts as established once the client is built and the
    /// cluster answers a request.
    async fn connect_to_opensearch(
        url: &str,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchBulkClient, SetupError> {
        loop {
            match Self::try_connect_opensearch(url).await {
                Ok(client) => return Ok(client),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(SetupError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }

    /// Attempt to connect to OpenSearch.
    async fn try_connect_opensearch(url: &str) -> Result<OpenSearchBulkClient, SetupError> {
        let client = OpenSearchBulkClient::new(url).await?;
        // Any answer proves the cluster is reachable; the index may not exist yet.
        client.index_exists("_all").await?;
        Ok(client)
    }
}

/// Load an index configuration from a JSON file.
///
/// # Example
///
/// ```json
/// {
///   "name": "app",
///   "settings": { "number_of_shards": 1 },
///   "types": [
///     { "name": "post", "mapping": { "properties": { "title": {} } }, "model": "Post" }
///   ]
/// }
/// ```
pub fn load_index_config(path: impl AsRef<Path>) -> Result<IndexConfig, SetupError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        SetupError::config(format!(
            "Failed to read index configuration {}: {}",
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        SetupError::config(format!(
            "Invalid index configuration {}: {}",
            path.display(),
            e
        ))
    })
}
