use fallback_handler::error::{BlobError, BlobResult};
use fallback_handler::storage::BlobSource;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory blob source for testing.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockBlobSource {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    transport_failure: Arc<Mutex<Option<String>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockBlobSource {
    pub fn new() -> Self {
        Self {
            blobs: Arc::new(Mutex::new(HashMap::new())),
            transport_failure: Arc::new(Mutex::new(None)),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a source holding a single blob.
    pub fn with_blob(container: &str, blob: &str, contents: &str) -> Self {
        let source = Self::new();
        source.put_blob(container, blob, contents);
        source
    }

    pub fn put_blob(&self, container: &str, blob: &str, contents: &str) {
        let mut blobs = self.blobs.lock().unwrap();
        blobs.insert(Self::key(container, blob), contents.as_bytes().to_vec());
    }

    pub fn remove_blob(&self, container: &str, blob: &str) {
        let mut blobs = self.blobs.lock().unwrap();
        blobs.remove(&Self::key(container, blob));
    }

    /// Make every read fail as if the service were unreachable.
    pub fn fail_with_transport_error(&self, message: &str) {
        *self.transport_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn clear_failure(&self) {
        *self.transport_failure.lock().unwrap() = None;
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    pub fn reset_call_counts(&self) {
        let mut counts = self.call_counts.lock().unwrap();
        counts.clear();
    }

    fn key(container: &str, blob: &str) -> String {
        format!("{}/{}", container, blob)
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }
}

impl Default for MockBlobSource {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobSource for MockBlobSource {
    fn read_blob(&self, container: &str, blob: &str) -> BlobResult<Vec<u8>> {
        self.track_call("read_blob");

        if let Some(message) = self.transport_failure.lock().unwrap().clone() {
            return Err(BlobError::Transport(message));
        }

        let blobs = self.blobs.lock().unwrap();
        blobs
            .get(&Self::key(container, blob))
            .cloned()
            .ok_or_else(|| BlobError::NotFound(Self::key(container, blob)))
    }
}
