//! Azure Storage connection string parsing.
//!
//! Connection strings are `;`-separated `Key=Value` pairs. Only the keys that
//! matter for reading a blob are interpreted; anything else is ignored.

use crate::error::{FallbackError, FallbackResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashMap;

const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";
const DEV_STORAGE_ACCOUNT: &str = "devstoreaccount1";
const DEV_STORAGE_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";
// Well-known Azurite/emulator key, published by Microsoft.
const DEV_STORAGE_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

/// How requests to the blob endpoint are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum BlobAuth {
    /// Shared Key: requests are signed with the decoded account key
    SharedKey {
        account_name: String,
        account_key: Vec<u8>,
    },

    /// Shared access signature appended to the request query string
    Sas(String),

    /// No credentials (public container)
    Anonymous,
}

impl std::fmt::Debug for BlobAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SharedKey { account_name, .. } => f
                .debug_struct("SharedKey")
                .field("account_name", account_name)
                .field("account_key", &"<redacted>")
                .finish(),
            Self::Sas(_) => f.debug_tuple("Sas").field(&"<redacted>").finish(),
            Self::Anonymous => write!(f, "Anonymous"),
        }
    }
}

/// Blob endpoint plus authentication, parsed from a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageCredentials {
    /// Base URL of the blob service, without a trailing slash
    pub blob_endpoint: String,

    /// Request authentication
    pub auth: BlobAuth,
}

impl StorageCredentials {
    /// Parse an Azure Storage connection string.
    ///
    /// # Errors
    ///
    /// Returns `FallbackError::InvalidConfiguration` if the string is empty,
    /// malformed, names no blob endpoint, or carries an account key that is
    /// not valid base64.
    pub fn from_connection_string(connection_string: &str) -> FallbackResult<Self> {
        let connection_string = connection_string.trim();
        if connection_string.is_empty() {
            return Err(invalid("storage connection string is required"));
        }

        let settings = parse_settings(connection_string)?;

        if settings
            .get("usedevelopmentstorage")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
        {
            return Ok(Self::development_storage());
        }

        let account_name = settings.get("accountname").cloned();

        let blob_endpoint = match (settings.get("blobendpoint"), &account_name) {
            (Some(endpoint), _) => endpoint.trim_end_matches('/').to_string(),
            (None, Some(account)) => {
                let protocol = settings
                    .get("defaultendpointsprotocol")
                    .map(String::as_str)
                    .unwrap_or("https");
                let suffix = settings
                    .get("endpointsuffix")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_ENDPOINT_SUFFIX);
                format!("{}://{}.blob.{}", protocol, account, suffix)
            }
            (None, None) => {
                return Err(invalid(
                    "connection string must contain AccountName or BlobEndpoint",
                ))
            }
        };

        if !blob_endpoint.starts_with("http://") && !blob_endpoint.starts_with("https://") {
            return Err(invalid("blob endpoint must start with http:// or https://"));
        }

        let auth = if let Some(sas) = settings.get("sharedaccesssignature") {
            BlobAuth::Sas(sas.trim_start_matches('?').to_string())
        } else if let Some(key) = settings.get("accountkey") {
            let account_name = account_name
                .ok_or_else(|| invalid("AccountKey requires AccountName"))?;
            let account_key = STANDARD
                .decode(key)
                .map_err(|_| invalid("AccountKey is not valid base64"))?;
            BlobAuth::SharedKey {
                account_name,
                account_key,
            }
        } else {
            BlobAuth::Anonymous
        };

        Ok(Self {
            blob_endpoint,
            auth,
        })
    }

    /// Credentials for the local storage emulator.
    fn development_storage() -> Self {
        Self {
            blob_endpoint: DEV_STORAGE_ENDPOINT.to_string(),
            auth: BlobAuth::SharedKey {
                account_name: DEV_STORAGE_ACCOUNT.to_string(),
                account_key: STANDARD.decode(DEV_STORAGE_KEY).unwrap_or_default(),
            },
        }
    }

    /// Path component of the endpoint (`""` for account-style hosts).
    pub fn endpoint_path(&self) -> &str {
        let without_scheme = self
            .blob_endpoint
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.blob_endpoint);

        match without_scheme.find('/') {
            Some(index) => &without_scheme[index..],
            None => "",
        }
    }
}

/// Split the string into lower-cased keys and raw values.
fn parse_settings(connection_string: &str) -> FallbackResult<HashMap<String, String>> {
    let mut settings = HashMap::new();

    for segment in connection_string.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        // Values (account keys, SAS tokens) may contain '='
        let (key, value) = segment
            .split_once('=')
            .ok_or_else(|| invalid("connection string segments must be Key=Value pairs"))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(invalid("connection string contains an empty key"));
        }

        settings.insert(key.to_ascii_lowercase(), value.trim().to_string());
    }

    Ok(settings)
}

fn invalid(reason: &str) -> FallbackError {
    FallbackError::InvalidConfiguration(reason.to_string())
}
