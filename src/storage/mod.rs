//! Blob storage access.
//!
//! The configuration store only needs one operation from storage: read a
//! blob's bytes by container and name. [`BlobSource`] is that seam, and
//! [`AzureBlobClient`] implements it against Azure Blob Storage.

mod azure_blob;
mod connection_string;

pub use azure_blob::{AzureBlobClient, STORAGE_API_VERSION};
pub use connection_string::{BlobAuth, StorageCredentials};

use crate::error::BlobResult;

/// Read-only access to named blobs.
///
/// Provides abstraction over the storage backend, enabling different
/// implementations (Azure client, in-memory test doubles).
pub trait BlobSource: Send + Sync {
    /// Fetch the full contents of `blob` in `container`.
    fn read_blob(&self, container: &str, blob: &str) -> BlobResult<Vec<u8>>;
}
