//! Rule-based issue matcher
//!
//! Applies the lexicon to one review as an explicit sequence of stages:
//!
//! 1. damage detection with severity grading
//! 2. generic keyword matching for every other category
//! 3. accurate/misleading description conflict resolution
//! 4. positive-wording override ("Good product")
//!
//! Every keyword hit is subject to the negation guard and the fuzzy matcher.

use crate::conflict::DescriptionConflict;
use crate::fuzzy::{fuzzy_contains, DEFAULT_THRESHOLD};
use crate::issues::IssueSet;
use crate::lexicon::{Lexicon, DAMAGED, DAMAGED_SEVERE, GOOD_PRODUCT};
use crate::negation::{NegationGuard, DEFAULT_MAX_GAP};
use crate::normalize::normalize_punctuation;
use aho_corasick::AhoCorasick;
use regex::Regex;
use sellerlens_core::{Error, Rating, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Tunable matching parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Similarity threshold for generic keyword matching (0-100)
    #[serde(default = "default_threshold")]
    pub fuzzy_threshold: u8,

    /// Similarity threshold for damage keywords (0-100)
    #[serde(default = "default_threshold")]
    pub damage_threshold: u8,

    /// Words allowed between a negation trigger and the keyword
    #[serde(default = "default_max_gap")]
    pub negation_max_gap: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_THRESHOLD,
            damage_threshold: DEFAULT_THRESHOLD,
            negation_max_gap: DEFAULT_MAX_GAP,
        }
    }
}

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

fn default_max_gap() -> usize {
    DEFAULT_MAX_GAP
}

/// What the damage stage saw in a review
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DamageAssessment {
    /// First damage phrase that matched
    pub matched_phrase: Option<String>,

    /// A severe modifier or a severity-forcing word was present
    pub severe_hint: bool,

    /// A minor modifier was present; informational only
    pub minor_hint: bool,
}

impl DamageAssessment {
    pub fn detected(&self) -> bool {
        self.matched_phrase.is_some()
    }

    /// Damage label to emit, if any.
    ///
    /// A positive rating suppresses non-severe damage.
    pub fn label(&self, rating: Rating) -> Option<&'static str> {
        if !self.detected() {
            return None;
        }
        if rating == Rating::Positive && !self.severe_hint {
            return None;
        }
        Some(if self.severe_hint { DAMAGED_SEVERE } else { DAMAGED })
    }
}

#[derive(Debug, Clone)]
struct CompiledPhrase {
    phrase: String,
    guard: NegationGuard,
}

#[derive(Debug, Clone)]
struct CompiledCategory {
    category: String,
    phrases: Vec<CompiledPhrase>,
}

/// Deterministic keyword matcher built once from the lexicon
pub struct RuleMatcher {
    lexicon: Arc<Lexicon>,
    settings: MatchSettings,
    damage: Vec<CompiledPhrase>,
    categories: Vec<CompiledCategory>,
    severe: Option<Regex>,
    minor: Option<Regex>,
    forcing: AhoCorasick,
    description: DescriptionConflict,
}

fn compile_phrases(phrases: &[String], max_gap: usize) -> Result<Vec<CompiledPhrase>> {
    phrases
        .iter()
        .map(|phrase| {
            Ok(CompiledPhrase {
                phrase: phrase.clone(),
                guard: NegationGuard::new(phrase, max_gap)?,
            })
        })
        .collect()
}

/// Word-bounded alternation over a modifier set; `None` for an empty set
fn modifier_regex(words: &[String]) -> Result<Option<Regex>> {
    if words.is_empty() {
        return Ok(None);
    }
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation))
        .map(Some)
        .map_err(|e| Error::config(format!("failed to compile modifier regex: {}", e)))
}

impl RuleMatcher {
    /// Create a matcher with default settings
    pub fn new(lexicon: Arc<Lexicon>) -> Result<Self> {
        Self::with_settings(lexicon, MatchSettings::default())
    }

    pub fn with_settings(lexicon: Arc<Lexicon>, settings: MatchSettings) -> Result<Self> {
        let max_gap = settings.negation_max_gap;

        let damage = match lexicon.keywords_for(DAMAGED) {
            Some(phrases) => compile_phrases(phrases, max_gap)?,
            None => Vec::new(),
        };

        let categories = lexicon
            .keyword_tables()
            .iter()
            .filter(|table| table.category != DAMAGED)
            .map(|table| {
                Ok(CompiledCategory {
                    category: table.category.clone(),
                    phrases: compile_phrases(&table.phrases, max_gap)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let forcing = AhoCorasick::new(lexicon.severity_forcing())
            .map_err(|e| Error::config(format!("failed to build severity matcher: {}", e)))?;

        Ok(Self {
            severe: modifier_regex(lexicon.severe_modifiers())?,
            minor: modifier_regex(lexicon.minor_modifiers())?,
            forcing,
            description: DescriptionConflict::new()?,
            lexicon,
            settings,
            damage,
            categories,
        })
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    pub fn description_conflict(&self) -> &DescriptionConflict {
        &self.description
    }

    /// Run every rule stage over one review
    pub fn match_issues(&self, comment: &str, rating: Rating) -> IssueSet {
        let text = normalize_punctuation(comment).to_lowercase();

        let issues = self.detect_damage(IssueSet::new(), &text, rating);
        let issues = self.match_categories(issues, &text);
        let issues = self.description.resolve(issues, &text);
        self.apply_positive_wording(issues, &text)
    }

    /// Inspect damage wording in lower-cased text
    pub fn assess_damage(&self, text: &str) -> DamageAssessment {
        let matched_phrase = self
            .damage
            .iter()
            .filter(|p| !p.guard.is_negated(text))
            .find(|p| fuzzy_contains(text, &p.phrase, self.settings.damage_threshold))
            .map(|p| p.phrase.clone());

        if matched_phrase.is_none() {
            return DamageAssessment::default();
        }

        let modifier_hit = self.severe.as_ref().is_some_and(|re| re.is_match(text));
        let forced = self.forcing.is_match(text);

        DamageAssessment {
            matched_phrase,
            severe_hint: modifier_hit || forced,
            minor_hint: self.minor.as_ref().is_some_and(|re| re.is_match(text)),
        }
    }

    fn detect_damage(&self, issues: IssueSet, text: &str, rating: Rating) -> IssueSet {
        let assessment = self.assess_damage(text);
        match assessment.label(rating) {
            Some(label) => {
                debug!(
                    label,
                    phrase = ?assessment.matched_phrase,
                    minor = assessment.minor_hint,
                    "damage detected"
                );
                issues.with(label)
            }
            None => {
                if assessment.detected() {
                    debug!("minor damage suppressed for positive rating");
                }
                issues
            }
        }
    }

    fn match_categories(&self, issues: IssueSet, text: &str) -> IssueSet {
        let threshold = self.settings.fuzzy_threshold;

        self.categories
            .iter()
            .filter(|category| {
                category
                    .phrases
                    .iter()
                    .filter(|p| !p.guard.is_negated(text))
                    .any(|p| fuzzy_contains(text, &p.phrase, threshold))
            })
            .fold(issues, |issues, category| issues.with(category.category.as_str()))
    }

    fn apply_positive_wording(&self, issues: IssueSet, text: &str) -> IssueSet {
        if self.lexicon.has_positive_wording(text) {
            issues.with(GOOD_PRODUCT)
        } else {
            issues
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{ACCURATE_DESCRIPTION, MISLEADING_DESCRIPTION};

    fn matcher() -> RuleMatcher {
        RuleMatcher::new(Arc::new(Lexicon::builtin().unwrap())).unwrap()
    }

    #[test]
    fn test_negated_damage_is_ignored() {
        let issues = matcher().match_issues("no scratches and works perfectly", Rating::Positive);

        assert!(!issues.contains(DAMAGED));
        assert!(!issues.contains(DAMAGED_SEVERE));
        assert!(issues.contains(GOOD_PRODUCT));
    }

    #[test]
    fn test_crack_forces_severe() {
        let issues = matcher().match_issues("the screen is cracked", Rating::Negative);

        assert!(issues.contains(DAMAGED_SEVERE));
        assert!(!issues.contains(DAMAGED));
    }

    #[test]
    fn test_crack_stays_severe_despite_minor_modifier() {
        let m = matcher();
        let assessment = m.assess_damage("tiny hairline crack on the corner");

        assert!(assessment.detected());
        assert!(assessment.severe_hint);
        assert!(assessment.minor_hint);
        assert_eq!(assessment.label(Rating::Positive), Some(DAMAGED_SEVERE));
    }

    #[test]
    fn test_minor_damage_on_positive_rating_suppressed() {
        let m = matcher();

        let issues = m.match_issues("small scratches on the back", Rating::Positive);
        assert!(!issues.contains(DAMAGED));
        assert!(!issues.contains(DAMAGED_SEVERE));

        let issues = m.match_issues("small scratches on the back", Rating::Negative);
        assert!(issues.contains(DAMAGED));
        assert!(!issues.contains(DAMAGED_SEVERE));
    }

    #[test]
    fn test_severe_damage_table_phrases_are_matched() {
        use crate::lexicon::LexiconSpec;

        let mut spec = LexiconSpec::builtin();
        spec.keywords
            .insert(DAMAGED_SEVERE.to_string(), vec!["dented".to_string()]);
        let m = RuleMatcher::new(Arc::new(Lexicon::from_spec(spec).unwrap())).unwrap();

        let issues = m.match_issues("the lid arrived dented", Rating::Negative);
        assert!(issues.contains(DAMAGED));
    }

    #[test]
    fn test_severe_modifier() {
        let issues = matcher().match_issues("deep scratches all over the case", Rating::Positive);
        assert!(issues.contains(DAMAGED_SEVERE));
    }

    #[test]
    fn test_modifiers_need_word_boundaries() {
        // "company" contains "many" but is not a severe modifier
        let assessment = matcher().assess_damage("the delivery company left it scuffed");
        assert!(assessment.detected());
        assert!(!assessment.severe_hint);
    }

    #[test]
    fn test_generic_categories() {
        let m = matcher();

        let issues = m.match_issues("Item was a total fake, avoid this seller", Rating::Positive);
        assert!(issues.contains("Fake or counterfeit"));

        let issues = m.match_issues("Shipping delay of two weeks and no refund", Rating::Negative);
        assert!(issues.contains("Late delivery"));
        assert!(issues.contains("Poor customer service"));
    }

    #[test]
    fn test_typographic_quotes_match() {
        let issues = matcher().match_issues("Phone won’t turn on", Rating::Negative);
        assert!(issues.contains("Faulty functionality"));
    }

    #[test]
    fn test_negated_category_keyword() {
        let issues = matcher().match_issues("never delayed, always on time", Rating::Neutral);
        assert!(!issues.contains("Late delivery"));
    }

    #[test]
    fn test_description_conflict() {
        let m = matcher();

        let issues = m.match_issues(
            "matched listing in size but misleading photos",
            Rating::Neutral,
        );
        assert!(issues.contains(MISLEADING_DESCRIPTION));
        assert!(!issues.contains(ACCURATE_DESCRIPTION));

        let issues = m.match_issues("listed wrong category, otherwise as described", Rating::Neutral);
        assert!(issues.contains(ACCURATE_DESCRIPTION));
        assert!(!issues.contains(MISLEADING_DESCRIPTION));
    }

    #[test]
    fn test_not_as_described_is_not_accurate() {
        let issues = matcher().match_issues("item was not as described", Rating::Negative);
        assert!(issues.contains(MISLEADING_DESCRIPTION));
        assert!(!issues.contains(ACCURATE_DESCRIPTION));
    }

    #[test]
    fn test_nothing_matched() {
        let issues = matcher().match_issues("arrived on tuesday", Rating::Neutral);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_threshold_is_tunable() {
        let lexicon = Arc::new(Lexicon::builtin().unwrap());
        let strict = RuleMatcher::new(lexicon.clone()).unwrap();
        let loose = RuleMatcher::with_settings(
            lexicon,
            MatchSettings {
                fuzzy_threshold: 90,
                ..MatchSettings::default()
            },
        )
        .unwrap();

        let text = "parts not inclded in the box";
        assert!(!strict.match_issues(text, Rating::Negative).contains("Missing parts"));
        assert!(loose.match_issues(text, Rating::Negative).contains("Missing parts"));
    }
}
