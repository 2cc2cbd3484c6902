//! Fetches the fallback configuration document from blob storage.

use crate::error::{FallbackError, FallbackResult};
use crate::metrics::Metrics;
use crate::models::FallbackConfig;
use crate::storage::{AzureBlobClient, BlobSource};
use std::sync::Arc;

/// Default HTTP timeout for stores built straight from a connection string.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Loads [`FallbackConfig`] from a named blob.
///
/// One attempt per [`load`](Self::load): no retries, errors go straight back
/// to the caller.
#[derive(Clone)]
pub struct ConfigStore {
    source: Arc<dyn BlobSource>,
    container_name: String,
    blob_name: String,
    metrics: Metrics,
}

impl ConfigStore {
    /// Create a store reading `blob_name` in `container_name` from `source`.
    pub fn new(
        source: Arc<dyn BlobSource>,
        container_name: impl Into<String>,
        blob_name: impl Into<String>,
    ) -> Self {
        let container_name = container_name.into();
        let blob_name = blob_name.into();
        tracing::debug!(
            "Creating config store for container: {}, blob: {}",
            container_name,
            blob_name
        );

        Self {
            source,
            container_name,
            blob_name,
            metrics: Metrics::new(),
        }
    }

    /// Create a store backed by Azure Blob Storage.
    ///
    /// # Errors
    ///
    /// Returns `FallbackError::InvalidConfiguration` if the connection string
    /// is empty or unusable. This is checked before any network access.
    pub fn from_connection_string(
        connection_string: &str,
        container_name: impl Into<String>,
        blob_name: impl Into<String>,
    ) -> FallbackResult<Self> {
        if connection_string.trim().is_empty() {
            tracing::error!("Storage connection string is required for the fallback system");
            return Err(FallbackError::InvalidConfiguration(
                "storage connection string is required".to_string(),
            ));
        }

        let client = AzureBlobClient::from_connection_string(connection_string, DEFAULT_TIMEOUT_SECS)
            .inspect_err(|e| tracing::error!("Invalid storage connection string: {}", e))?;

        Ok(Self::new(Arc::new(client), container_name, blob_name))
    }

    /// Share an existing metrics collector with this store.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Container the configuration is read from.
    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Blob the configuration is read from.
    pub fn blob_name(&self) -> &str {
        &self.blob_name
    }

    /// Fetch and parse the configuration document.
    ///
    /// # Errors
    ///
    /// - `FallbackError::ConfigFetch` if the blob cannot be read
    /// - `FallbackError::ConfigParse` if the document is not a valid configuration
    pub fn load(&self) -> FallbackResult<FallbackConfig> {
        tracing::debug!(
            "Loading fallback configuration from {}/{}",
            self.container_name,
            self.blob_name
        );
        self.metrics.record_config_load();

        let bytes = self
            .source
            .read_blob(&self.container_name, &self.blob_name)
            .map_err(|e| {
                tracing::error!("Error loading fallback configuration: {}", e);
                FallbackError::from(e)
            })?;

        let config = FallbackConfig::from_json_slice(&bytes)
            .inspect_err(|e| tracing::error!("Error loading fallback configuration: {}", e))?;

        tracing::debug!(
            "Successfully loaded configuration with {} areas",
            config.areas.len()
        );
        Ok(config)
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("container_name", &self.container_name)
            .field("blob_name", &self.blob_name)
            .finish_non_exhaustive()
    }
}
