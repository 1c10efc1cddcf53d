//! Metrics collection and reporting

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics collector for a classification run
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    total_reviews: AtomicU64,
    blank_reviews: AtomicU64,
    skipped_trivial: AtomicU64,
    fallback_calls: AtomicU64,
    fallback_failures: AtomicU64,
    fallback_timeouts: AtomicU64,
    total_latency_us: AtomicU64,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    /// Record a classified review and its latency
    pub fn record_review(&self, latency_us: u64) {
        self.inner.total_reviews.fetch_add(1, Ordering::Relaxed);
        self.inner
            .total_latency_us
            .fetch_add(latency_us, Ordering::Relaxed);
    }

    /// Record a review whose comment was blank
    pub fn record_blank(&self) {
        self.inner.blank_reviews.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a review skipped as a trivial acknowledgement
    pub fn record_skipped(&self) {
        self.inner.skipped_trivial.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fallback classifier call
    pub fn record_fallback_call(&self) {
        self.inner.fallback_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed fallback call
    pub fn record_fallback_failure(&self) {
        self.inner.fallback_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fallback call that exceeded its timeout
    pub fn record_fallback_timeout(&self) {
        self.inner.fallback_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_reviews: self.inner.total_reviews.load(Ordering::Relaxed),
            blank_reviews: self.inner.blank_reviews.load(Ordering::Relaxed),
            skipped_trivial: self.inner.skipped_trivial.load(Ordering::Relaxed),
            fallback_calls: self.inner.fallback_calls.load(Ordering::Relaxed),
            fallback_failures: self.inner.fallback_failures.load(Ordering::Relaxed),
            fallback_timeouts: self.inner.fallback_timeouts.load(Ordering::Relaxed),
            total_latency_us: self.inner.total_latency_us.load(Ordering::Relaxed),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub total_reviews: u64,
    pub blank_reviews: u64,
    pub skipped_trivial: u64,
    pub fallback_calls: u64,
    pub fallback_failures: u64,
    pub fallback_timeouts: u64,
    pub total_latency_us: u64,
}

impl MetricsSnapshot {
    /// Calculate average latency per classified review
    pub fn avg_latency_us(&self) -> u64 {
        if self.total_reviews == 0 {
            0
        } else {
            self.total_latency_us / self.total_reviews
        }
    }

    /// Share of classified reviews that needed the fallback
    pub fn fallback_rate(&self) -> f64 {
        if self.total_reviews == 0 {
            0.0
        } else {
            self.fallback_calls as f64 / self.total_reviews as f64
        }
    }

    /// Share of fallback calls that failed or timed out
    pub fn fallback_error_rate(&self) -> f64 {
        if self.fallback_calls == 0 {
            0.0
        } else {
            (self.fallback_failures + self.fallback_timeouts) as f64 / self.fallback_calls as f64
        }
    }
}
