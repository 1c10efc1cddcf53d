//! Issue summaries over a classified batch

use sellerlens_core::{ClassificationResult, Rating, Review, Sentiment};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// How often an issue appeared with a given final sentiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueCount {
    pub issue: String,
    pub sentiment: Sentiment,
    pub count: usize,
}

/// Issue/sentiment frequency table for a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    rows: Vec<IssueCount>,
}

impl IssueSummary {
    /// Count `(issue, final_sentiment)` pairs; reviews without issues add nothing
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a ClassificationResult>) -> Self {
        let mut counts: HashMap<(&str, Sentiment), usize> = HashMap::new();
        for result in results {
            for issue in &result.issues {
                *counts.entry((issue.as_str(), result.final_sentiment)).or_default() += 1;
            }
        }

        let mut rows: Vec<IssueCount> = counts
            .into_iter()
            .map(|((issue, sentiment), count)| IssueCount {
                issue: issue.to_string(),
                sentiment,
                count,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.issue.cmp(&b.issue))
                .then_with(|| a.sentiment.as_str().cmp(b.sentiment.as_str()))
        });

        Self { rows }
    }

    pub fn rows(&self) -> &[IssueCount] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total issue mentions across the batch
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }
}

impl fmt::Display for IssueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.issue.len())
            .max()
            .unwrap_or(0)
            .max("issue".len());

        writeln!(f, "{:<width$}  {:<9}  count", "issue", "sentiment")?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<width$}  {:<9}  {}",
                row.issue,
                row.sentiment.as_str(),
                row.count
            )?;
        }
        Ok(())
    }
}

/// A review whose final sentiment is negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NegativeReview {
    pub comment: String,
    pub rating_type: Rating,
    /// Issues joined with ", "
    pub issues: String,
}

/// Select the negative reviews of a batch
pub fn negative_reviews<'a>(
    rows: impl IntoIterator<Item = (&'a Review, &'a ClassificationResult)>,
) -> Vec<NegativeReview> {
    rows.into_iter()
        .filter(|(_, result)| result.final_sentiment == Sentiment::Negative)
        .map(|(review, result)| NegativeReview {
            comment: review.comment.clone(),
            rating_type: review.rating,
            issues: result.issues.join(", "),
        })
        .collect()
}
