//! Error types for the fallback handler.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Errors surfaced by the configuration store and the classifier.
///
/// The type is `Clone` because a failed configuration load is cached by the
/// [`Classifier`](crate::classifier::Classifier) and handed back on every
/// subsequent call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FallbackError {
    /// The storage connection information is missing or unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The blob service could not be reached or the blob could not be read
    #[error("Failed to fetch fallback configuration: {0}")]
    ConfigFetch(String),

    /// The fetched document is not a valid fallback configuration
    #[error("Failed to parse fallback configuration: {0}")]
    ConfigParse(String),
}

/// Errors that can occur when reading a blob from storage.
#[derive(Error, Debug)]
pub enum BlobError {
    /// The container or blob does not exist
    #[error("Blob not found: {0}")]
    NotFound(String),

    /// The service rejected the credentials
    #[error("Access denied (status {status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// The service returned another error status
    #[error("Storage service error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Connection, DNS, TLS or timeout failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Failed while reading the response body
    #[error("I/O error while reading blob: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BlobError> for FallbackError {
    fn from(err: BlobError) -> Self {
        FallbackError::ConfigFetch(err.to_string())
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with FallbackError
pub type FallbackResult<T> = Result<T, FallbackError>;

/// Convenience type alias for Results with BlobError
pub type BlobResult<T> = Result<T, BlobError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
