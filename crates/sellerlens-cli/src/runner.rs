//! Batch classification run

use crate::io::ReviewRecord;
use sellerlens_classifiers::{FallbackStatus, ReviewEngine, ReviewOutcome};
use sellerlens_core::ClassificationResult;
use sellerlens_telemetry::{
    negative_reviews, IssueSummary, MetricsCollector, MetricsSnapshot, NegativeReview,
};
use tracing::info;

/// Everything a classification run produces
#[derive(Debug)]
pub struct BatchReport {
    /// Classified rows in input order; skipped trivial rows are absent
    pub rows: Vec<(ReviewRecord, ClassificationResult)>,
    pub summary: IssueSummary,
    pub negatives: Vec<NegativeReview>,
    pub metrics: MetricsSnapshot,
}

/// Classify every record and build the batch report
pub async fn run_batch(engine: &ReviewEngine, records: Vec<ReviewRecord>) -> BatchReport {
    let collector = MetricsCollector::new();
    let reviews = records.iter().map(|r| r.review.clone()).collect();
    let outcomes = engine.classify_batch(reviews).await;

    let mut rows = Vec::with_capacity(records.len());
    for (record, outcome) in records.into_iter().zip(outcomes) {
        match outcome {
            Some(outcome) => {
                if record.review.comment.trim().is_empty() {
                    collector.record_blank();
                }
                record_outcome(&collector, &outcome);
                rows.push((record, outcome.result));
            }
            None => collector.record_skipped(),
        }
    }

    let summary = IssueSummary::from_results(rows.iter().map(|(_, result)| result));
    let negatives = negative_reviews(rows.iter().map(|(record, result)| (&record.review, result)));
    let metrics = collector.snapshot();

    info!(
        classified = metrics.total_reviews,
        skipped = metrics.skipped_trivial,
        negatives = negatives.len(),
        avg_latency_us = metrics.avg_latency_us(),
        "Batch classified"
    );

    BatchReport {
        rows,
        summary,
        negatives,
        metrics,
    }
}

fn record_outcome(collector: &MetricsCollector, outcome: &ReviewOutcome) {
    collector.record_review(outcome.latency_us);
    match outcome.fallback_status {
        FallbackStatus::NotInvoked => {}
        FallbackStatus::Succeeded => collector.record_fallback_call(),
        FallbackStatus::Failed => {
            collector.record_fallback_call();
            collector.record_fallback_failure();
        }
        FallbackStatus::TimedOut => {
            collector.record_fallback_call();
            collector.record_fallback_timeout();
        }
    }
}
