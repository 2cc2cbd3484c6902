//! Configuration management for the fallback handler.
//!
//! This module handles loading and validating configuration from environment variables.
//! It avoids polluting stdout (which MCP uses for communication) by relying on
//! `dotenvy`, which never prints.

use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Configuration for the fallback handler server.
#[derive(Clone)]
pub struct Config {
    /// Azure Storage connection string for the fallback configuration blob
    pub storage_connection_string: String,

    /// Container holding the configuration blob
    pub container_name: String,

    /// Name of the configuration blob
    pub blob_name: String,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Log level (default: "error")
    pub log_level: String,
}

// The connection string carries the account key, keep it out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("storage_connection_string", &"<redacted>")
            .field("container_name", &self.container_name)
            .field("blob_name", &self.blob_name)
            .field("request_timeout", &self.request_timeout)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `FALLBACK_STORAGE_CONNECTION_STRING`: Azure Storage connection string
    /// - `FALLBACK_CONTAINER_NAME`: Container holding the configuration blob
    /// - `FALLBACK_BLOB_NAME`: Name of the configuration blob
    ///
    /// Optional environment variables:
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // Try to load .env file if it exists (but don't fail if it doesn't)
        let _ = dotenvy::dotenv();

        let storage_connection_string = Self::required_var("FALLBACK_STORAGE_CONNECTION_STRING")?;
        let container_name = Self::required_var("FALLBACK_CONTAINER_NAME")?;
        let blob_name = Self::required_var("FALLBACK_BLOB_NAME")?;

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        if request_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                var: "REQUEST_TIMEOUT".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            storage_connection_string,
            container_name,
            blob_name,
            request_timeout,
            log_level,
        })
    }

    /// Read a required, non-blank environment variable.
    fn required_var(var_name: &str) -> ConfigResult<String> {
        let value =
            env::var(var_name).map_err(|_| ConfigError::MissingVar(var_name.to_string()))?;

        if value.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        Ok(value)
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_connection_string: String::new(),
            container_name: String::new(),
            blob_name: String::new(),
            request_timeout: 10,
            log_level: "error".to_string(),
        }
    }
}
