//! Review engine: the full classification pipeline for one review or a batch
//!
//! raw review -> normalizer -> rule matcher -> fallback adapter -> finalizer
//! -> sentiment resolver -> `(issues, sentiment)`

use crate::classifier::ZeroShotClassifier;
use crate::config::EngineConfig;
use crate::fallback::{FallbackAdapter, FallbackMode};
use crate::finalizer::IssueFinalizer;
use crate::http::HttpZeroShotClassifier;
use crate::issues::IssueSet;
use crate::lexicon::Lexicon;
use crate::matcher::RuleMatcher;
use crate::normalize::{is_trivial_comment, normalize_punctuation};
use crate::sentiment::SentimentResolver;
use futures::stream::{self, StreamExt};
use sellerlens_core::{ClassificationResult, Error, Rating, Result, Review};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What happened to the fallback query for a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStatus {
    /// Not configured, disabled, blank input, or not needed
    NotInvoked,
    Succeeded,
    /// The classifier returned an error; rule-based result kept
    Failed,
    /// The classifier exceeded its timeout; rule-based result kept
    TimedOut,
}

/// Classification plus the intermediate results that produced it
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    /// Final issues and sentiment
    #[serde(flatten)]
    pub result: ClassificationResult,

    /// Issues found by the rule matcher alone
    pub rule_based: Vec<String>,

    /// Labels accepted from the fallback classifier
    pub fallback_labels: Vec<String>,

    pub fallback_status: FallbackStatus,

    /// Wall-clock classification time in microseconds
    pub latency_us: u64,
}

impl ReviewOutcome {
    fn blank(rating: Rating, start: Instant) -> Self {
        Self {
            result: ClassificationResult::empty(rating),
            rule_based: Vec::new(),
            fallback_labels: Vec::new(),
            fallback_status: FallbackStatus::NotInvoked,
            latency_us: start.elapsed().as_micros() as u64,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.result.issues.is_empty() && self.rule_based.is_empty() && self.fallback_labels.is_empty()
    }
}

/// Stateless review classifier sharing one immutable lexicon
pub struct ReviewEngine {
    lexicon: Arc<Lexicon>,
    matcher: Arc<RuleMatcher>,
    finalizer: IssueFinalizer,
    resolver: SentimentResolver,
    fallback: Option<FallbackAdapter>,
    config: EngineConfig,
}

impl ReviewEngine {
    /// Build an engine; configuration problems are fatal here
    pub fn new(
        lexicon: Arc<Lexicon>,
        config: EngineConfig,
        fallback: Option<Arc<dyn ZeroShotClassifier>>,
    ) -> Result<Self> {
        config.validate()?;

        let matcher = Arc::new(RuleMatcher::with_settings(Arc::clone(&lexicon), config.matching)?);
        let finalizer = IssueFinalizer::new(matcher.description_conflict().clone());
        let resolver = SentimentResolver::new(Arc::clone(&lexicon));
        let fallback = fallback.map(|c| FallbackAdapter::from_settings(c, &config.fallback));

        info!(
            categories = lexicon.categories().len(),
            fallback = fallback.as_ref().map(|f| f.name()).unwrap_or("none"),
            mode = ?config.fallback.mode,
            "Review engine initialized"
        );

        Ok(Self {
            lexicon,
            matcher,
            finalizer,
            resolver,
            fallback,
            config,
        })
    }

    /// Build from configuration: lexicon file and HTTP fallback if configured
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        let lexicon = Arc::new(config.load_lexicon()?);
        let fallback = HttpZeroShotClassifier::from_settings(&config.fallback)?
            .map(|c| Arc::new(c) as Arc<dyn ZeroShotClassifier>);
        Self::new(lexicon, config, fallback)
    }

    /// Built-in lexicon, default settings, rules only
    pub fn rules_only() -> Result<Self> {
        Self::new(Arc::new(Lexicon::builtin()?), EngineConfig::default(), None)
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify a single review
    pub async fn classify(&self, review: &Review) -> ReviewOutcome {
        self.run_pipeline(review, false).await
    }

    async fn run_pipeline(&self, review: &Review, offload_rules: bool) -> ReviewOutcome {
        let start = Instant::now();
        metrics::counter!("sellerlens_reviews_total").increment(1);

        let normalized = normalize_punctuation(&review.comment);
        let comment = normalized.trim();
        if comment.is_empty() {
            debug!("blank comment, echoing rating");
            return ReviewOutcome::blank(review.rating, start);
        }

        let rule_based = if offload_rules {
            self.match_rules_blocking(comment, review.rating).await
        } else {
            self.matcher.match_issues(comment, review.rating)
        };
        let (fallback_labels, fallback_status) = self.query_fallback(comment, &rule_based).await;

        let issues = self
            .finalizer
            .finalize(comment, rule_based.clone(), fallback_labels.clone());
        let final_sentiment = self.resolver.resolve(comment, &issues, review.rating);

        let latency_us = start.elapsed().as_micros() as u64;
        metrics::histogram!("sellerlens_classify_latency_us").record(latency_us as f64);

        ReviewOutcome {
            result: ClassificationResult::new(issues.into_sorted_vec(), final_sentiment),
            rule_based: rule_based.into_sorted_vec(),
            fallback_labels,
            fallback_status,
            latency_us,
        }
    }

    /// Classify a batch concurrently, preserving input order.
    ///
    /// Up to `batch.concurrency` reviews are in flight at once. Their rule
    /// stages run on the blocking pool, so matching uses several cores.
    /// Trivial comments are skipped (`None`) when `batch.skip_trivial` is set.
    pub async fn classify_batch(&self, reviews: Vec<Review>) -> Vec<Option<ReviewOutcome>> {
        let skip_trivial = self.config.batch.skip_trivial;

        stream::iter(reviews)
            .map(|review| async move {
                if skip_trivial && is_trivial_comment(&review.comment) {
                    debug!(comment = %review.comment, "skipping trivial comment");
                    return None;
                }
                Some(self.run_pipeline(&review, true).await)
            })
            .buffered(self.config.batch.concurrency)
            .collect()
            .await
    }

    async fn match_rules_blocking(&self, comment: &str, rating: Rating) -> IssueSet {
        let matcher = Arc::clone(&self.matcher);
        let text = comment.to_string();
        match tokio::task::spawn_blocking(move || matcher.match_issues(&text, rating)).await {
            Ok(issues) => issues,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                warn!(error = %e, "rule matching task cancelled, matching inline");
                self.matcher.match_issues(comment, rating)
            }
        }
    }

    async fn query_fallback(&self, comment: &str, rule_based: &IssueSet) -> (Vec<String>, FallbackStatus) {
        let Some(adapter) = &self.fallback else {
            return (Vec::new(), FallbackStatus::NotInvoked);
        };
        match self.config.fallback.mode {
            FallbackMode::Disabled => return (Vec::new(), FallbackStatus::NotInvoked),
            FallbackMode::WhenEmpty if !rule_based.is_empty() => {
                return (Vec::new(), FallbackStatus::NotInvoked)
            }
            _ => {}
        }

        metrics::counter!("sellerlens_fallback_calls_total").increment(1);
        match adapter.classify(comment, self.lexicon.categories()).await {
            Ok(labels) => {
                debug!(?labels, "fallback labels accepted");
                (labels, FallbackStatus::Succeeded)
            }
            Err(Error::Timeout) => {
                warn!(classifier = adapter.name(), "fallback classifier timed out");
                metrics::counter!("sellerlens_fallback_failures_total", "reason" => "timeout")
                    .increment(1);
                (Vec::new(), FallbackStatus::TimedOut)
            }
            Err(e) => {
                warn!(classifier = adapter.name(), error = %e, "fallback classifier failed");
                metrics::counter!("sellerlens_fallback_failures_total", "reason" => "error")
                    .increment(1);
                (Vec::new(), FallbackStatus::Failed)
            }
        }
    }
}
