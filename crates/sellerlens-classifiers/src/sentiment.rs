//! Sentiment resolver
//!
//! Reconciles the finalized issues with the user's rating and the raw
//! positive wording of the comment. Rules are checked in order and the first
//! one that applies decides the verdict:
//!
//! 1. positive rating, no hard-negative issue -> POSITIVE
//! 2. positive wording, no hard-negative issue -> POSITIVE
//! 3. late delivery is the only issue and the rating is not negative -> rating
//! 4. any hard-negative issue -> NEGATIVE
//! 5. a positive issue and the rating is not negative -> POSITIVE
//! 6. otherwise -> rating

use crate::issues::IssueSet;
use crate::lexicon::{Lexicon, LATE_DELIVERY};
use crate::normalize::normalize_punctuation;
use sellerlens_core::{Rating, Sentiment};
use std::sync::Arc;

/// Signals the decision rules look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentSignals {
    pub has_hard_negative: bool,
    pub has_positive_issue: bool,
    pub has_positive_wording: bool,
    pub only_late_delivery: bool,
}

impl SentimentSignals {
    /// Apply the decision rules
    pub fn decide(&self, rating: Rating) -> Sentiment {
        if rating == Rating::Positive && !self.has_hard_negative {
            return Sentiment::Positive;
        }
        if self.has_positive_wording && !self.has_hard_negative {
            return Sentiment::Positive;
        }
        if self.only_late_delivery && rating != Rating::Negative {
            return rating.into();
        }
        if self.has_hard_negative {
            return Sentiment::Negative;
        }
        if self.has_positive_issue && rating != Rating::Negative {
            return Sentiment::Positive;
        }
        rating.into()
    }
}

/// Stateless sentiment decision over one review
pub struct SentimentResolver {
    lexicon: Arc<Lexicon>,
}

impl SentimentResolver {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Derive the decision signals for a review
    pub fn signals(&self, comment: &str, issues: &IssueSet) -> SentimentSignals {
        let text = normalize_punctuation(comment).to_lowercase();

        SentimentSignals {
            has_hard_negative: issues.iter().any(|i| self.lexicon.is_hard_negative(i)),
            has_positive_issue: issues.iter().any(|i| self.lexicon.is_positive_issue(i)),
            has_positive_wording: self.lexicon.has_positive_wording(&text),
            only_late_delivery: issues.len() == 1 && issues.contains(LATE_DELIVERY),
        }
    }

    /// Final sentiment verdict
    pub fn resolve(&self, comment: &str, issues: &IssueSet, rating: Rating) -> Sentiment {
        let signals = self.signals(comment, issues);
        let verdict = signals.decide(rating);
        tracing::debug!(?signals, %rating, %verdict, "sentiment resolved");
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> SentimentResolver {
        SentimentResolver::new(Arc::new(Lexicon::builtin().unwrap()))
    }

    fn issues(labels: &[&str]) -> IssueSet {
        labels.iter().copied().collect()
    }

    #[test]
    fn test_positive_rating_without_hard_negative() {
        let verdict = resolver().resolve("meh", &issues(&["Overpriced"]), Rating::Positive);
        assert_eq!(verdict, Sentiment::Positive);
    }

    #[test]
    fn test_hard_negative_overrides_positive_rating() {
        let verdict = resolver().resolve(
            "Item was a total fake, avoid this seller",
            &issues(&["Fake or counterfeit"]),
            Rating::Positive,
        );
        assert_eq!(verdict, Sentiment::Negative);
    }

    #[test]
    fn test_positive_wording_lifts_negative_rating() {
        let verdict = resolver().resolve(
            "excellent seller, slightly overpriced",
            &issues(&["Overpriced"]),
            Rating::Negative,
        );
        assert_eq!(verdict, Sentiment::Positive);
    }

    #[test]
    fn test_positive_wording_does_not_beat_hard_negative() {
        let verdict = resolver().resolve(
            "great looking but a knockoff",
            &issues(&["Fake or counterfeit", "Good product"]),
            Rating::Neutral,
        );
        assert_eq!(verdict, Sentiment::Negative);
    }

    #[test]
    fn test_late_delivery_alone_keeps_rating() {
        let late = issues(&[LATE_DELIVERY]);
        let r = resolver();

        assert_eq!(
            r.resolve("arrived a bit late but otherwise fine", &late, Rating::Neutral),
            Sentiment::Neutral
        );
        assert_eq!(
            r.resolve("arrived a bit late", &late, Rating::Negative),
            Sentiment::Negative
        );
    }

    #[test]
    fn test_positive_issue_on_neutral_rating() {
        let r = resolver();

        assert_eq!(
            r.resolve("fast delivery", &issues(&["Fast delivery"]), Rating::Neutral),
            Sentiment::Positive
        );
        assert_eq!(
            r.resolve("fast delivery", &issues(&["Fast delivery"]), Rating::Negative),
            Sentiment::Negative
        );
    }

    #[test]
    fn test_falls_back_to_rating() {
        let r = resolver();

        assert_eq!(r.resolve("hmm", &IssueSet::new(), Rating::Neutral), Sentiment::Neutral);
        assert_eq!(
            r.resolve("wrong item sent", &issues(&["Wrong item"]), Rating::Neutral),
            Sentiment::Neutral
        );
    }

    #[test]
    fn test_rule_order() {
        // late delivery alone is decided before the positive-issue rule
        let signals = SentimentSignals {
            has_hard_negative: false,
            has_positive_issue: false,
            has_positive_wording: false,
            only_late_delivery: true,
        };
        assert_eq!(signals.decide(Rating::Neutral), Sentiment::Neutral);

        let signals = SentimentSignals {
            has_hard_negative: true,
            has_positive_issue: true,
            has_positive_wording: true,
            only_late_delivery: false,
        };
        assert_eq!(signals.decide(Rating::Positive), Sentiment::Negative);
    }
}
