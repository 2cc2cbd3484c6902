//! Test doubles shared by the integration tests.

pub mod mock_blob_source;

pub use mock_blob_source::MockBlobSource;
