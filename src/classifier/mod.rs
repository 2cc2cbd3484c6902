//! Query classification into company areas.
//!
//! The [`Classifier`] loads its configuration lazily, at most once, through a
//! [`ConfigStore`], then routes queries to the best-scoring area or to the
//! default contact.

mod async_wrapper;
mod config_store;
pub mod scoring;

pub use async_wrapper::{AsyncClassifier, AsyncClassifierImpl};
pub use config_store::ConfigStore;
pub use scoring::{best_match, score_areas, AreaScore};

use crate::error::FallbackResult;
use crate::metrics::Metrics;
use crate::models::{CompanyArea, FallbackConfig, FallbackResponse};
use std::sync::{Arc, Mutex, MutexGuard};

/// Load state of the cached configuration.
#[derive(Debug)]
enum LoadState {
    /// Nothing fetched yet
    Unloaded,

    /// The single load attempt has happened; holds its outcome, success or error
    Loaded(FallbackResult<Arc<FallbackConfig>>),
}

/// Routes free-text queries to company-area contacts.
///
/// The first call to [`get_config`](Self::get_config),
/// [`classify_query`](Self::classify_query) or
/// [`get_fallback_response`](Self::get_fallback_response) loads the
/// configuration. The outcome, including a failure, is kept for the lifetime
/// of the instance; use [`reload_config`](Self::reload_config) or a new
/// instance to try again.
pub struct Classifier {
    store: ConfigStore,
    state: Mutex<LoadState>,
    metrics: Metrics,
}

impl Classifier {
    /// Create a classifier that loads from `store` on first use.
    pub fn new(store: ConfigStore) -> Self {
        Self {
            store,
            state: Mutex::new(LoadState::Unloaded),
            metrics: Metrics::new(),
        }
    }

    /// Create a classifier backed by Azure Blob Storage.
    ///
    /// # Errors
    ///
    /// Returns `FallbackError::InvalidConfiguration` if the connection string
    /// is empty or unusable, before any network access.
    pub fn from_connection_string(
        connection_string: &str,
        container_name: impl Into<String>,
        blob_name: impl Into<String>,
    ) -> FallbackResult<Self> {
        let store = ConfigStore::from_connection_string(connection_string, container_name, blob_name)?;
        Ok(Self::new(store))
    }

    /// Share an existing metrics collector with this classifier.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Whether the single load attempt has happened.
    pub fn is_loaded(&self) -> bool {
        matches!(*self.lock_state(), LoadState::Loaded(_))
    }

    fn lock_state(&self) -> MutexGuard<'_, LoadState> {
        // Loading never panics while holding the lock, so a poisoned state is still consistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get the configuration, loading it on first use.
    ///
    /// The lock is held across the load, so concurrent first callers share a
    /// single fetch.
    pub fn get_config(&self) -> FallbackResult<Arc<FallbackConfig>> {
        let mut state = self.lock_state();

        if let LoadState::Loaded(result) = &*state {
            return result.clone();
        }

        tracing::debug!("Configuration not loaded, loading now");
        let result = self.store.load().map(Arc::new);
        *state = LoadState::Loaded(result.clone());
        result
    }

    /// Discard the cached outcome and load the configuration again.
    pub fn reload_config(&self) -> FallbackResult<Arc<FallbackConfig>> {
        let mut state = self.lock_state();

        tracing::debug!("Reloading fallback configuration");
        let result = self.store.load().map(Arc::new);
        *state = LoadState::Loaded(result.clone());
        result
    }

    /// Per-area keyword scores for `query`, non-zero only, in configuration order.
    pub fn score_query(&self, query: &str) -> FallbackResult<Vec<AreaScore>> {
        let config = self.get_config()?;
        Ok(score_areas(&config.areas, query))
    }

    /// Classify `query` into the best-matching company area.
    ///
    /// Returns `None` when no keyword of any area occurs in the query.
    pub fn classify_query(&self, query: &str) -> FallbackResult<Option<CompanyArea>> {
        tracing::debug!("Classifying query: {}", query);
        let config = self.get_config()?;

        let scores = score_areas(&config.areas, query);
        let area = best_match(&scores).map(|best| config.areas[best.index].clone());

        match &area {
            Some(area) => tracing::debug!("Best matching area: {}", area.area_name),
            None => tracing::debug!("No matching area found"),
        }
        self.metrics.record_classification(area.is_some());

        Ok(area)
    }

    /// Build the contact response for `query`.
    ///
    /// Fails only when the configuration could not be loaded.
    pub fn get_fallback_response(&self, query: &str) -> FallbackResult<FallbackResponse> {
        tracing::debug!("Generating fallback response for query: {}", query);

        match self.classify_query(query)? {
            Some(area) => {
                tracing::debug!("Using area-specific contact for {}", area.area_name);
                Ok(FallbackResponse::for_area(&area))
            }
            None => {
                tracing::debug!("Using default contact information");
                self.metrics.record_default_fallback();
                let config = self.get_config()?;
                Ok(FallbackResponse::for_default(&config.default_contact))
            }
        }
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("store", &self.store)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}
