//! Zero-shot classifier capability and common types

use async_trait::async_trait;
use sellerlens_core::Result;

/// Capability of an external multi-label text classifier.
///
/// Implementations score `text` against every candidate label; filtering and
/// truncation happen in [`crate::fallback::FallbackAdapter`].
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    /// Score the text against each candidate label
    async fn score(&self, text: &str, labels: &[String]) -> Result<Vec<LabelScore>>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Confidence for one candidate label
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    /// Candidate label
    pub label: String,

    /// Confidence score (0.0-1.0)
    pub score: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Check if score meets the threshold
    pub fn meets(&self, threshold: f32) -> bool {
        self.score >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_score_threshold() {
        let score = LabelScore::new("Late delivery", 0.7);
        assert!(score.meets(0.7));
        assert!(!score.meets(0.71));
    }
}
