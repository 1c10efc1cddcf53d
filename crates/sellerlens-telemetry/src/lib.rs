//! SellerLens Telemetry
//!
//! Batch-level reporting for review classification runs.
//!
//! Provides:
//! - Atomic counters for reviews, fallback calls and latency
//! - Issue/sentiment summaries and negative review extraction

pub mod metrics;
pub mod summary;

pub use metrics::{MetricsCollector, MetricsSnapshot};
pub use summary::{negative_reviews, IssueCount, IssueSummary, NegativeReview};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::metrics::MetricsCollector;
    pub use crate::summary::{negative_reviews, IssueSummary};
}
