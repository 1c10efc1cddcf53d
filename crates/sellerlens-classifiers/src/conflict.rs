//! Conflict rules between mutually exclusive labels

use crate::issues::IssueSet;
use crate::lexicon::{ACCURATE_DESCRIPTION, DAMAGED, DAMAGED_SEVERE, MISLEADING_DESCRIPTION};
use regex::Regex;
use sellerlens_core::{Error, Result};

/// Textual evidence that the listing description was wrong
const MISLEADING_EVIDENCE: &str =
    r"\bmisleading\b|\bnot as described\b|\bdescription (?:not|isn't|isn’t) accurate\b";

/// Resolves "Accurate description" vs "Misleading description"
#[derive(Debug, Clone)]
pub struct DescriptionConflict {
    evidence: Regex,
}

impl DescriptionConflict {
    pub fn new() -> Result<Self> {
        let evidence = Regex::new(MISLEADING_EVIDENCE).map_err(|e| {
            Error::config(format!("failed to compile description evidence regex: {}", e))
        })?;
        Ok(Self { evidence })
    }

    /// Keep exactly one description label when both are present.
    ///
    /// `text` must already be lower-cased. Explicit misleading wording wins,
    /// otherwise the accurate label is kept.
    pub fn resolve(&self, issues: IssueSet, text: &str) -> IssueSet {
        if !(issues.contains(ACCURATE_DESCRIPTION) && issues.contains(MISLEADING_DESCRIPTION)) {
            return issues;
        }

        if self.evidence.is_match(text) {
            tracing::debug!("description conflict resolved as misleading");
            issues.without(ACCURATE_DESCRIPTION)
        } else {
            tracing::debug!("description conflict resolved as accurate");
            issues.without(MISLEADING_DESCRIPTION)
        }
    }
}

/// Severe damage supersedes the plain damage label
pub fn collapse_damage(issues: IssueSet) -> IssueSet {
    if issues.contains(DAMAGED_SEVERE) && issues.contains(DAMAGED) {
        issues.without(DAMAGED)
    } else {
        issues
    }
}
