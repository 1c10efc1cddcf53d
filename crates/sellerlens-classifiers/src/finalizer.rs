//! Issue finalizer: merges rule-based and fallback labels
//!
//! The fallback may add labels but must never reintroduce a contradiction the
//! rules already settled.

use crate::conflict::{collapse_damage, DescriptionConflict};
use crate::issues::IssueSet;
use crate::lexicon::{ACCURATE_DESCRIPTION, MISLEADING_DESCRIPTION};
use crate::normalize::normalize_punctuation;

/// Merge policy between the rule matcher and the fallback classifier
#[derive(Debug, Clone)]
pub struct IssueFinalizer {
    description: DescriptionConflict,
}

impl IssueFinalizer {
    pub fn new(description: DescriptionConflict) -> Self {
        Self { description }
    }

    /// Authoritative issue set for a review
    pub fn finalize(&self, comment: &str, rule_based: IssueSet, fallback: Vec<String>) -> IssueSet {
        let fallback: IssueSet = fallback.into_iter().collect();
        let fallback = if rule_based.contains(ACCURATE_DESCRIPTION) {
            fallback.without(MISLEADING_DESCRIPTION)
        } else {
            fallback
        };

        let text = normalize_punctuation(comment).to_lowercase();
        let issues = collapse_damage(rule_based.union(fallback));
        self.description.resolve(issues, &text)
    }
}
