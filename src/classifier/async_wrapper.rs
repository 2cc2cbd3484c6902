//! Async wrapper around the blocking [`Classifier`].
//!
//! The first call may download the configuration over blocking HTTP, so every
//! operation runs on tokio's blocking pool via `tokio::task::spawn_blocking`.

use super::{AreaScore, Classifier};
use crate::error::{FallbackError, FallbackResult};
use crate::models::{CompanyArea, FallbackConfig, FallbackResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Async classifier operations, as used by the MCP server.
#[async_trait]
pub trait AsyncClassifier: Send + Sync {
    async fn get_config(&self) -> FallbackResult<Arc<FallbackConfig>>;
    async fn score_query(&self, query: &str) -> FallbackResult<Vec<AreaScore>>;
    async fn classify_query(&self, query: &str) -> FallbackResult<Option<CompanyArea>>;
    async fn get_fallback_response(&self, query: &str) -> FallbackResult<FallbackResponse>;
}

/// Runs a shared [`Classifier`] on the blocking thread pool.
#[derive(Clone)]
pub struct AsyncClassifierImpl {
    classifier: Arc<Classifier>,
}

impl AsyncClassifierImpl {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }

    /// The wrapped classifier.
    pub fn inner(&self) -> &Arc<Classifier> {
        &self.classifier
    }
}

fn join_error(e: tokio::task::JoinError) -> FallbackError {
    FallbackError::ConfigFetch(format!("Task join error: {}", e))
}

#[async_trait]
impl AsyncClassifier for AsyncClassifierImpl {
    async fn get_config(&self) -> FallbackResult<Arc<FallbackConfig>> {
        let classifier = self.classifier.clone();

        tokio::task::spawn_blocking(move || classifier.get_config())
            .await
            .map_err(join_error)?
    }

    async fn score_query(&self, query: &str) -> FallbackResult<Vec<AreaScore>> {
        let classifier = self.classifier.clone();
        let query = query.to_string();

        tokio::task::spawn_blocking(move || classifier.score_query(&query))
            .await
            .map_err(join_error)?
    }

    async fn classify_query(&self, query: &str) -> FallbackResult<Option<CompanyArea>> {
        let classifier = self.classifier.clone();
        let query = query.to_string();

        tokio::task::spawn_blocking(move || classifier.classify_query(&query))
            .await
            .map_err(join_error)?
    }

    async fn get_fallback_response(&self, query: &str) -> FallbackResult<FallbackResponse> {
        let classifier = self.classifier.clone();
        let query = query.to_string();

        tokio::task::spawn_blocking(move || classifier.get_fallback_response(&query))
            .await
            .map_err(join_error)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ConfigStore;
    use crate::error::{BlobError, BlobResult};
    use crate::storage::BlobSource;

    struct StaticBlob(&'static str);

    impl BlobSource for StaticBlob {
        fn read_blob(&self, _container: &str, _blob: &str) -> BlobResult<Vec<u8>> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    struct MissingBlob;

    impl BlobSource for MissingBlob {
        fn read_blob(&self, container: &str, blob: &str) -> BlobResult<Vec<u8>> {
            Err(BlobError::NotFound(format!("{}/{}", container, blob)))
        }
    }

    const CONFIG: &str = r#"{
        "company_areas": [{
            "area_id": "it",
            "area_name": "IT Support",
            "keywords": ["password", "login"],
            "contact": {"name": "Luis Gil", "email": "it@example.com", "phone": "2"},
            "description": "Accounts and devices"
        }],
        "default_contact": {"name": "Front Desk", "email": "info@example.com", "phone": "0"},
        "last_updated": "2024-05-01T10:30:00Z"
    }"#;

    fn classifier(source: impl BlobSource + 'static) -> AsyncClassifierImpl {
        let store = ConfigStore::new(Arc::new(source), "fallback", "areas.json");
        AsyncClassifierImpl::new(Classifier::new(store))
    }

    #[tokio::test]
    async fn test_async_classify_and_respond() {
        let classifier = classifier(StaticBlob(CONFIG));

        let area = classifier.classify_query("I forgot my password").await.unwrap();
        assert_eq!(area.unwrap().area_id, "it");

        let response = classifier.get_fallback_response("hello").await.unwrap();
        assert_eq!(response.contact_name, "Front Desk");

        let scores = classifier.score_query("login password").await.unwrap();
        assert_eq!(scores[0].score, 2);

        assert!(classifier.inner().is_loaded());
    }

    #[tokio::test]
    async fn test_async_propagates_fetch_error() {
        let classifier = classifier(MissingBlob);
        match classifier.get_config().await {
            Err(FallbackError::ConfigFetch(message)) => assert!(message.contains("areas.json")),
            other => panic!("Expected ConfigFetch, got: {:?}", other),
        }
    }
}
