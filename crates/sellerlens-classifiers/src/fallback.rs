//! Fallback classifier adapter
//!
//! Wraps a [`ZeroShotClassifier`] with the confidence/top-k policy and runs
//! every call on its own task under a timeout, so a slow or failing model
//! only ever affects the review it was asked about.

use crate::classifier::{LabelScore, ZeroShotClassifier};
use async_trait::async_trait;
use sellerlens_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// When the engine consults the fallback classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMode {
    /// Query for every non-blank review and merge under the non-contradiction policy
    #[default]
    Always,

    /// Query only when the rules found nothing
    WhenEmpty,

    /// Never query
    Disabled,
}

/// Fallback classifier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackSettings {
    #[serde(default)]
    pub mode: FallbackMode,

    /// Minimum confidence for a label to be accepted
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Maximum number of labels accepted per review
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Per-call timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Zero-shot inference endpoint; no endpoint means no production adapter
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Environment variable holding the bearer token for the endpoint
    #[serde(default)]
    pub token_env: Option<String>,

    /// Model identifier sent with each request
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            mode: FallbackMode::default(),
            min_confidence: default_min_confidence(),
            top_k: default_top_k(),
            timeout_ms: default_timeout_ms(),
            endpoint: None,
            token_env: None,
            model: default_model(),
        }
    }
}

fn default_min_confidence() -> f32 {
    0.70
}

fn default_top_k() -> usize {
    3
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_model() -> String {
    "facebook/bart-large-mnli".to_string()
}

/// Confidence/top-k policy around a zero-shot classifier
#[derive(Clone)]
pub struct FallbackAdapter {
    classifier: Arc<dyn ZeroShotClassifier>,
    min_confidence: f32,
    top_k: usize,
    timeout: Duration,
}

impl FallbackAdapter {
    pub fn new(
        classifier: Arc<dyn ZeroShotClassifier>,
        min_confidence: f32,
        top_k: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            min_confidence,
            top_k,
            timeout,
        }
    }

    pub fn from_settings(classifier: Arc<dyn ZeroShotClassifier>, settings: &FallbackSettings) -> Self {
        Self::new(
            classifier,
            settings.min_confidence,
            settings.top_k,
            Duration::from_millis(settings.timeout_ms),
        )
    }

    /// Name of the wrapped classifier
    pub fn name(&self) -> &str {
        self.classifier.name()
    }

    /// Accepted labels for `text`, highest confidence first.
    ///
    /// Blank text returns no labels without calling the model. Model errors,
    /// panics and timeouts come back as errors for the caller to absorb.
    pub async fn classify(&self, text: &str, categories: &[String]) -> Result<Vec<String>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let classifier = Arc::clone(&self.classifier);
        let owned_text = text.to_string();
        let labels = categories.to_vec();
        let handle = tokio::spawn(async move { classifier.score(&owned_text, &labels).await });
        let abort = handle.abort_handle();

        let scores = match tokio::time::timeout(self.timeout, handle).await {
            Err(_) => {
                abort.abort();
                return Err(Error::Timeout);
            }
            Ok(Err(join_error)) => {
                return Err(Error::internal(format!(
                    "fallback classifier task failed: {}",
                    join_error
                )));
            }
            Ok(Ok(result)) => result?,
        };

        Ok(select_labels(scores, categories, self.min_confidence, self.top_k))
    }
}

/// Keep catalog labels meeting `min_confidence`, best first, at most `top_k`
pub fn select_labels(
    mut scores: Vec<LabelScore>,
    categories: &[String],
    min_confidence: f32,
    top_k: usize,
) -> Vec<String> {
    scores.retain(|s| !s.score.is_nan() && categories.contains(&s.label));
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut selected: Vec<String> = Vec::with_capacity(top_k);
    for candidate in scores {
        if selected.len() >= top_k {
            break;
        }
        if candidate.meets(min_confidence) && !selected.contains(&candidate.label) {
            selected.push(candidate.label);
        }
    }
    selected
}

/// Deterministic zero-shot classifier returning fixed scores.
///
/// Used in tests and offline runs where no model service is available.
pub struct StaticZeroShotClassifier {
    name: String,
    scores: Vec<LabelScore>,
    trigger: Option<String>,
}

impl StaticZeroShotClassifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scores: Vec::new(),
            trigger: None,
        }
    }

    /// Add a fixed score for a label
    pub fn with_score(mut self, label: impl Into<String>, score: f32) -> Self {
        self.scores.push(LabelScore::new(label, score));
        self
    }

    /// Only answer for texts containing `trigger` (case-insensitive)
    pub fn when_contains(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into().to_lowercase());
        self
    }
}

#[async_trait]
impl ZeroShotClassifier for StaticZeroShotClassifier {
    async fn score(&self, text: &str, _labels: &[String]) -> Result<Vec<LabelScore>> {
        if let Some(trigger) = &self.trigger {
            if !text.to_lowercase().contains(trigger.as_str()) {
                return Ok(Vec::new());
            }
        }
        Ok(self.scores.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<String> {
        ["Late delivery", "Wrong item", "Overpriced", "Good product"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_select_labels_policy() {
        let scores = vec![
            LabelScore::new("Overpriced", 0.72),
            LabelScore::new("Late delivery", 0.95),
            LabelScore::new("Wrong item", 0.69),
            LabelScore::new("Good product", 0.81),
            LabelScore::new("Not a category", 0.99),
        ];

        let selected = select_labels(scores, &categories(), 0.70, 3);
        assert_eq!(selected, vec!["Late delivery", "Good product", "Overpriced"]);
    }

    #[test]
    fn test_select_labels_top_k() {
        let scores = vec![
            LabelScore::new("Overpriced", 0.9),
            LabelScore::new("Late delivery", 0.95),
            LabelScore::new("Good product", 0.91),
        ];

        let selected = select_labels(scores, &categories(), 0.70, 2);
        assert_eq!(selected, vec!["Late delivery", "Good product"]);
    }

    #[test]
    fn test_select_labels_ignores_nan() {
        let scores = vec![LabelScore::new("Overpriced", f32::NAN)];
        assert!(select_labels(scores, &categories(), 0.0, 3).is_empty());
    }

    #[tokio::test]
    async fn test_blank_text_skips_model() {
        let classifier = Arc::new(StaticZeroShotClassifier::new("static").with_score("Overpriced", 0.9));
        let adapter = FallbackAdapter::new(classifier, 0.7, 3, Duration::from_secs(1));

        assert!(adapter.classify("   ", &categories()).await.unwrap().is_empty());
        assert_eq!(
            adapter.classify("too pricey", &categories()).await.unwrap(),
            vec!["Overpriced"]
        );
        assert_eq!(adapter.name(), "static");
    }

    #[tokio::test]
    async fn test_trigger() {
        let classifier = Arc::new(
            StaticZeroShotClassifier::new("static")
                .with_score("Late delivery", 0.9)
                .when_contains("LATE"),
        );
        let adapter = FallbackAdapter::from_settings(classifier, &FallbackSettings::default());

        assert_eq!(
            adapter.classify("came late", &categories()).await.unwrap(),
            vec!["Late delivery"]
        );
        assert!(adapter.classify("came early", &categories()).await.unwrap().is_empty());
    }

    #[test]
    fn test_settings_defaults() {
        let settings: FallbackSettings = serde_yaml::from_str("mode: when_empty").unwrap();
        assert_eq!(settings.mode, FallbackMode::WhenEmpty);
        assert_eq!(settings.min_confidence, 0.70);
        assert_eq!(settings.top_k, 3);
        assert_eq!(settings.timeout_ms, 10_000);
        assert!(settings.endpoint.is_none());
    }
}
