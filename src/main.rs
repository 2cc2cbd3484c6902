//! Fallback Handler - Main entry point
//!
//! Runs the fallback handler as an MCP server over stdio.

use anyhow::Result;
use fallback_handler::classifier::{AsyncClassifier, AsyncClassifierImpl};
use fallback_handler::{AzureBlobClient, Classifier, Config, ConfigStore, FallbackMcpServer, Metrics};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration before logging so LOG_LEVEL can drive the filter
    let config = Config::from_env();
    let default_level = config
        .as_ref()
        .map(|cfg| cfg.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Starting fallback handler for container: {}, blob: {}",
        config.container_name, config.blob_name
    );

    let metrics = Metrics::new();

    let blob_client =
        AzureBlobClient::from_connection_string(&config.storage_connection_string, config.request_timeout)
            .map_err(|e| {
                error!("Failed to create blob client: {}", e);
                e
            })?
            .with_metrics(metrics.clone());

    let store = ConfigStore::new(Arc::new(blob_client), &config.container_name, &config.blob_name)
        .with_metrics(metrics.clone());
    let classifier = Classifier::new(store).with_metrics(metrics.clone());
    let classifier = Arc::new(AsyncClassifierImpl::new(classifier)) as Arc<dyn AsyncClassifier>;

    let server = FallbackMcpServer::new(classifier);
    info!("Fallback MCP server initialized (configuration loads on first request)");

    info!("Starting MCP server with stdio transport");
    fallback_handler::server::run_server(server).await?;

    info!("Metrics: {}", metrics.summary());
    info!("Fallback handler shutdown complete");
    Ok(())
}
