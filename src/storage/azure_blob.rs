//! Blocking Azure Blob Storage client.
//!
//! Uses `ureq` for synchronous HTTP. Requests are authenticated with a SAS
//! token, a Shared Key signature, or not at all, depending on the connection
//! string.

use super::connection_string::{BlobAuth, StorageCredentials};
use super::BlobSource;
use crate::error::{BlobError, BlobResult, FallbackResult};
use crate::metrics::Metrics;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::io::Read;
use std::sync::Arc;
use std::time::{Duration, Instant};

type HmacSha256 = Hmac<Sha256>;

/// Blob service REST API version sent with every request.
pub const STORAGE_API_VERSION: &str = "2021-08-06";

/// HTTP client for reading blobs from Azure Blob Storage.
#[derive(Clone)]
pub struct AzureBlobClient {
    /// Endpoint and authentication
    credentials: StorageCredentials,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl AzureBlobClient {
    /// Create a client from already-parsed credentials.
    pub fn new(credentials: StorageCredentials, timeout_secs: u64) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(timeout_secs))
            .build();

        Self {
            credentials,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a client from an Azure Storage connection string.
    ///
    /// # Errors
    ///
    /// Returns `FallbackError::InvalidConfiguration` if the connection string
    /// is empty or unusable. No network access happens here.
    pub fn from_connection_string(connection_string: &str, timeout_secs: u64) -> FallbackResult<Self> {
        let credentials = StorageCredentials::from_connection_string(connection_string)?;
        Ok(Self::new(credentials, timeout_secs))
    }

    /// Share an existing metrics collector with this client.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Get the parsed credentials.
    pub fn credentials(&self) -> &StorageCredentials {
        &self.credentials
    }

    /// Encoded request path for a blob, relative to the endpoint.
    ///
    /// Blob names keep their `/` separators; every segment is percent-encoded.
    fn blob_path(container: &str, blob: &str) -> String {
        let blob = blob
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("/{}/{}", urlencoding::encode(container), blob)
    }

    /// Full request URL for a blob, including the SAS token when present.
    pub fn blob_url(&self, container: &str, blob: &str) -> String {
        let url = format!(
            "{}{}",
            self.credentials.blob_endpoint,
            Self::blob_path(container, blob)
        );

        match &self.credentials.auth {
            BlobAuth::Sas(token) if !token.is_empty() => format!("{}?{}", url, token),
            _ => url,
        }
    }

    /// Execute a GET request for a blob.
    fn get(&self, container: &str, blob: &str) -> BlobResult<ureq::Response> {
        let url = self.blob_url(container, blob);
        let date = http_date(Utc::now());

        let mut request = self
            .agent
            .get(&url)
            .set("x-ms-date", &date)
            .set("x-ms-version", STORAGE_API_VERSION);

        if let BlobAuth::SharedKey {
            account_name,
            account_key,
        } = &self.credentials.auth
        {
            let resource = format!(
                "{}{}",
                self.credentials.endpoint_path(),
                Self::blob_path(container, blob)
            );
            let string_to_sign = string_to_sign("GET", &date, account_name, &resource);
            let signature = sign(account_key, &string_to_sign)?;
            request = request.set(
                "Authorization",
                &format!("SharedKey {}:{}", account_name, signature),
            );
        }

        tracing::debug!("GET blob {}/{}", container, blob);

        request
            .call()
            .map_err(|e| self.map_error(e, container, blob))
    }

    /// Map a ureq error to a BlobError.
    fn map_error(&self, error: ureq::Error, container: &str, blob: &str) -> BlobError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                match code {
                    404 => BlobError::NotFound(format!("{}/{}", container, blob)),
                    401 | 403 => BlobError::Unauthorized {
                        status: code,
                        message,
                    },
                    _ => BlobError::Status {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => BlobError::Transport(transport.to_string()),
        }
    }
}

impl BlobSource for AzureBlobClient {
    fn read_blob(&self, container: &str, blob: &str) -> BlobResult<Vec<u8>> {
        let start = Instant::now();

        let result = self.get(container, blob).and_then(|response| {
            let mut bytes = Vec::new();
            response.into_reader().read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        self.metrics.record_blob_fetch(start.elapsed());
        match &result {
            Ok(bytes) => {
                tracing::debug!(
                    "GET blob {}/{} - {} bytes",
                    container,
                    blob,
                    bytes.len()
                );
                self.metrics.record_blob_bytes(bytes.len());
            }
            Err(e) => {
                tracing::error!("GET blob {}/{} - Error: {}", container, blob, e);
                self.metrics.record_blob_fetch_error();
            }
        }

        result
    }
}

/// RFC 1123 date as required by the `x-ms-date` header.
fn http_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Shared Key string-to-sign for a request without body or conditional headers.
///
/// `resource` is the encoded URI path, including any endpoint path prefix.
fn string_to_sign(verb: &str, date: &str, account_name: &str, resource: &str) -> String {
    // Content-Encoding, Content-Language, Content-Length, Content-MD5,
    // Content-Type, Date, If-Modified-Since, If-Match, If-None-Match,
    // If-Unmodified-Since, Range: all empty.
    let standard_headers = "\n".repeat(11);

    format!(
        "{}\n{}x-ms-date:{}\nx-ms-version:{}\n/{}{}",
        verb, standard_headers, date, STORAGE_API_VERSION, account_name, resource
    )
}

/// Base64 HMAC-SHA256 of `string_to_sign` under the decoded account key.
fn sign(account_key: &[u8], string_to_sign: &str) -> BlobResult<String> {
    let mut mac = HmacSha256::new_from_slice(account_key)
        .map_err(|e| BlobError::Transport(format!("cannot sign request: {}", e)))?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
