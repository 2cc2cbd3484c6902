//! Fallback Handler - routes unanswered questions to the right company contact.
//!
//! A small JSON document in Azure Blob Storage lists company areas, each with
//! routing keywords and a contact, plus a default contact. A query is matched
//! against every area's keywords and answered with the best area's contact,
//! or the default contact when nothing matches.
//!
//! # Architecture
//!
//! - **models**: Company areas, contacts, the configuration document and the response payload
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **storage**: Blob-read seam and the Azure Blob Storage client
//! - **classifier**: Lazy configuration loading and keyword classification
//! - **metrics**: Fetch and classification counters
//! - **server**: MCP protocol server

pub mod classifier;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod server;
pub mod storage;

pub use classifier::{AreaScore, AsyncClassifier, AsyncClassifierImpl, Classifier, ConfigStore};
pub use config::Config;
pub use error::{BlobError, ConfigError, FallbackError, FallbackResult};
pub use metrics::{Metrics, MetricsSummary};
pub use models::{AreaContact, CompanyArea, FallbackConfig, FallbackResponse};
pub use server::FallbackMcpServer;
pub use storage::{AzureBlobClient, BlobSource, StorageCredentials};
