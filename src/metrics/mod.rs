//! Basic metrics instrumentation for tracking performance.
//!
//! Provides counters and duration tracking for blob fetches, configuration
//! loads and query classification.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Metrics collector shared between the blob client and the classifier.
///
/// Cloning is cheap and every clone updates the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of blob fetches attempted
    blob_fetches_total: Arc<AtomicU64>,

    /// Total number of failed blob fetches
    blob_fetch_errors_total: Arc<AtomicU64>,

    /// Total duration of all blob fetches in milliseconds
    blob_fetch_duration_total_ms: Arc<AtomicU64>,

    /// Total bytes downloaded
    blob_bytes_total: Arc<AtomicU64>,

    /// Number of configuration load attempts
    config_loads_total: Arc<AtomicU64>,

    /// Number of queries classified
    queries_total: Arc<AtomicU64>,

    /// Number of queries routed to a company area
    area_matches_total: Arc<AtomicU64>,

    /// Number of queries answered with the default contact
    default_fallbacks_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            blob_fetches_total: Arc::new(AtomicU64::new(0)),
            blob_fetch_errors_total: Arc::new(AtomicU64::new(0)),
            blob_fetch_duration_total_ms: Arc::new(AtomicU64::new(0)),
            blob_bytes_total: Arc::new(AtomicU64::new(0)),
            config_loads_total: Arc::new(AtomicU64::new(0)),
            queries_total: Arc::new(AtomicU64::new(0)),
            area_matches_total: Arc::new(AtomicU64::new(0)),
            default_fallbacks_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record a blob fetch with duration.
    pub fn record_blob_fetch(&self, duration: Duration) {
        self.blob_fetches_total.fetch_add(1, Ordering::Relaxed);
        self.blob_fetch_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a failed blob fetch.
    pub fn record_blob_fetch_error(&self) {
        self.blob_fetch_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record downloaded bytes.
    pub fn record_blob_bytes(&self, count: usize) {
        self.blob_bytes_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record a configuration load attempt.
    pub fn record_config_load(&self) {
        self.config_loads_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a classified query and whether it matched an area.
    pub fn record_classification(&self, matched: bool) {
        self.queries_total.fetch_add(1, Ordering::Relaxed);
        if matched {
            self.area_matches_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a fallback response served with the default contact.
    pub fn record_default_fallback(&self) {
        self.default_fallbacks_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total blob fetches.
    pub fn blob_fetches_total(&self) -> u64 {
        self.blob_fetches_total.load(Ordering::Relaxed)
    }

    /// Get total blob fetch errors.
    pub fn blob_fetch_errors_total(&self) -> u64 {
        self.blob_fetch_errors_total.load(Ordering::Relaxed)
    }

    /// Get average blob fetch duration in milliseconds.
    pub fn blob_fetch_duration_avg_ms(&self) -> f64 {
        let total = self.blob_fetch_duration_total_ms.load(Ordering::Relaxed);
        let count = self.blob_fetches_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Get total bytes downloaded.
    pub fn blob_bytes_total(&self) -> u64 {
        self.blob_bytes_total.load(Ordering::Relaxed)
    }

    /// Get total configuration load attempts.
    pub fn config_loads_total(&self) -> u64 {
        self.config_loads_total.load(Ordering::Relaxed)
    }

    /// Get total classified queries.
    pub fn queries_total(&self) -> u64 {
        self.queries_total.load(Ordering::Relaxed)
    }

    /// Get total queries that matched an area.
    pub fn area_matches_total(&self) -> u64 {
        self.area_matches_total.load(Ordering::Relaxed)
    }

    /// Get total default-contact responses.
    pub fn default_fallbacks_total(&self) -> u64 {
        self.default_fallbacks_total.load(Ordering::Relaxed)
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            blob_fetches_total: self.blob_fetches_total(),
            blob_fetch_errors_total: self.blob_fetch_errors_total(),
            blob_fetch_duration_avg_ms: self.blob_fetch_duration_avg_ms(),
            blob_bytes_total: self.blob_bytes_total(),
            config_loads_total: self.config_loads_total(),
            queries_total: self.queries_total(),
            area_matches_total: self.area_matches_total(),
            default_fallbacks_total: self.default_fallbacks_total(),
        }
    }
}

/// Point-in-time snapshot of all counters.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub blob_fetches_total: u64,
    pub blob_fetch_errors_total: u64,
    pub blob_fetch_duration_avg_ms: f64,
    pub blob_bytes_total: u64,
    pub config_loads_total: u64,
    pub queries_total: u64,
    pub area_matches_total: u64,
    pub default_fallbacks_total: u64,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "blob fetches: {} ({} errors, avg {:.2}ms, {} bytes), config loads: {}, queries: {} ({} matched, {} default)",
            self.blob_fetches_total,
            self.blob_fetch_errors_total,
            self.blob_fetch_duration_avg_ms,
            self.blob_bytes_total,
            self.config_loads_total,
            self.queries_total,
            self.area_matches_total,
            self.default_fallbacks_total,
        )
    }
}
