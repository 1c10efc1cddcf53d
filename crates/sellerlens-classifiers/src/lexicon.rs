//! Static lexicon: issue catalog, keyword phrases, severity modifiers and label sets
//!
//! The lexicon is validated once at startup and shared read-only behind an
//! `Arc`. A malformed lexicon is a fatal configuration error.

use crate::normalize::normalize_punctuation;
use aho_corasick::AhoCorasick;
use sellerlens_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

pub const DAMAGED: &str = "Damaged product";
pub const DAMAGED_SEVERE: &str = "Damaged product (severe)";
pub const ACCURATE_DESCRIPTION: &str = "Accurate description";
pub const MISLEADING_DESCRIPTION: &str = "Misleading description";
pub const GOOD_PRODUCT: &str = "Good product";
pub const LATE_DELIVERY: &str = "Late delivery";

/// Catalog entries the matching and resolution rules refer to by name
const STRUCTURAL_LABELS: &[&str] = &[
    DAMAGED,
    ACCURATE_DESCRIPTION,
    MISLEADING_DESCRIPTION,
    GOOD_PRODUCT,
    LATE_DELIVERY,
];

const CATEGORIES: &[&str] = &[
    "Late delivery",
    "Wrong item",
    "Overpriced",
    "Fake or counterfeit",
    "Damaged product",
    "Missing parts",
    "Poor customer service",
    "Good experience",
    "Fast delivery",
    "Well packaged",
    "Accurate description",
    "Great value",
    "Responsive seller",
    "High quality",
    "Misleading description",
    "Faulty functionality",
    "Good product",
    "Helpful seller",
    "Issue resolved",
    "Trustworthy seller",
    "Great communication",
];

const KEYWORDS: &[(&str, &[&str])] = &[
    // negatives
    (
        "Late delivery",
        &[
            "late delivery",
            "arrived late",
            "delayed",
            "slow shipping",
            "shipping delay",
            "later than scheduled",
        ],
    ),
    (
        "Wrong item",
        &[
            "wrong item",
            "incorrect item",
            "not what i ordered",
            "different item",
            "description doesn’t match",
            "description doesn't match",
            "image doesn't match",
        ],
    ),
    (
        "Overpriced",
        &[
            "overpriced",
            "too expensive",
            "pricey",
            "cost too much",
            "high price",
            "not worth the price",
        ],
    ),
    (
        "Fake or counterfeit",
        &["fake", "counterfeit", "not genuine", "knockoff", "imitation", "not real"],
    ),
    (
        "Damaged product",
        &[
            "damaged", "broken", "defective", "faulty", "scratches", "scratched", "scuff",
            "scuffed", "crack", "cracked", "shattered", "chips", "chipped", "knicks", "nicks",
        ],
    ),
    (
        "Missing parts",
        &[
            "missing parts",
            "incomplete",
            "parts not included",
            "missing sim tray",
            "no sim tray",
            "faulty",
        ],
    ),
    (
        "Misleading description",
        &["misleading", "not as described", "description not accurate", "listed wrong"],
    ),
    (
        "Poor customer service",
        &[
            "didn't recieve a reply",
            "the seller did not treat the customer right",
            "poor service",
            "bad support",
            "unhelpful",
            "rude seller",
            "no response",
            "slow response",
            "no refund",
            "little refund",
        ],
    ),
    // positives / neutrals
    (
        "Good experience",
        &[
            "good experience",
            "prompt re",
            "happy",
            "satisfied",
            "recommend",
            "perfect",
            "awesome",
            "wonderful",
        ],
    ),
    (
        "Fast delivery",
        &[
            "recieved it fast",
            "prompt delivery",
            "fast delivery",
            "quick shipping",
            "arrived quickly",
            "super quick",
            "came quickly",
        ],
    ),
    (
        "Well packaged",
        &[
            "creative packaging",
            "decorative packaging",
            "well packaged",
            "secure packaging",
            "nicely packed",
            "good packaging",
        ],
    ),
    (
        "Accurate description",
        &["accurate description", "as described", "matched listing", "true to description"],
    ),
    (
        "Great value",
        &["great value", "good value", "worth the money", "good deal", "reasonable price"],
    ),
    (
        "Responsive seller",
        &[
            "responsive seller",
            "quick reply",
            "helpful seller",
            "good communication",
            "kept me informed",
            "very fast response",
            "understanding",
        ],
    ),
    (
        "High quality",
        &[
            "works with high-standard",
            "craftmanship",
            "high quality",
            "premium",
            "well made",
            "quality perfect",
        ],
    ),
    (
        "Faulty functionality",
        &[
            "doesn't work",
            "not working",
            "faulty functionality",
            "esim was broken",
            "won't turn on",
            "won’t turn on",
        ],
    ),
    (
        "Good product",
        &["great condition", "looks like new", "like new", "looks new", "very clean", "scratchless"],
    ),
    ("Helpful seller", &["helpful", "responsive", "understanding"]),
    (
        "Issue resolved",
        &["resolved the issue", "gave refund", "took care of it", "refund issued", "i got refunded"],
    ),
    (
        "Trustworthy seller",
        &["trustworthy", "reliable", "very trustworthy", "trustable"],
    ),
    (
        "Great communication",
        &["kept me informed", "great communication", "good communication"],
    ),
];

const SEVERE_MODIFIERS: &[&str] = &[
    "excessive",
    "large",
    "deep",
    "pronounced",
    "many",
    "a lot",
    "tons",
    "way more",
    "significant",
    "big",
    "heavy",
];

const MINOR_MODIFIERS: &[&str] = &[
    "tiny",
    "small",
    "minor",
    "light",
    "hairline",
    "couple",
    "few",
    "not visible",
    "barely visible",
    "only",
];

/// Words whose presence makes any detected damage severe
const SEVERITY_FORCING: &[&str] = &["crack", "cracked", "shatter", "shattered", "chip", "chipped"];

const POSITIVE_WORDS: &[&str] = &[
    "great",
    "excellent",
    "happy",
    "recommend",
    "fast shipping",
    "good price",
    "love",
    "satisfied",
    "perfect",
    "awesome",
    "wonderful",
    "smooth transaction",
    "very good",
    "looks new",
    "like new",
    "no scratches",
    "no scratch",
    "no cracks",
    "no crack",
];

const HARD_NEGATIVE: &[&str] = &[
    "Fake or counterfeit",
    "Damaged product",
    "Damaged product (severe)",
    "Poor customer service",
    "Missing parts",
    "Faulty functionality",
    "Misleading description",
];

const POSITIVE_ISSUES: &[&str] = &[
    "Good experience",
    "Fast delivery",
    "Well packaged",
    "Accurate description",
    "Great value",
    "Responsive seller",
    "High quality",
    "Good product",
    "Helpful seller",
    "Issue resolved",
    "Trustworthy seller",
    "Great communication",
];

/// Serializable form of the lexicon tables (YAML)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LexiconSpec {
    /// Ordered issue catalog
    #[serde(default)]
    pub categories: Vec<String>,

    /// Keyword phrases by category
    #[serde(default)]
    pub keywords: BTreeMap<String, Vec<String>>,

    /// Words that mark damage as severe
    #[serde(default)]
    pub severe_modifiers: Vec<String>,

    /// Words that mark damage as minor
    #[serde(default)]
    pub minor_modifiers: Vec<String>,

    /// Words that force severe damage regardless of modifiers
    #[serde(default)]
    pub severity_forcing: Vec<String>,

    /// Raw positive wording
    #[serde(default)]
    pub positive_words: Vec<String>,

    /// Categories that force a NEGATIVE verdict
    #[serde(default)]
    pub hard_negative: Vec<String>,

    /// Categories that lean the verdict POSITIVE
    #[serde(default)]
    pub positive: Vec<String>,
}

/// A lexicon file: either a full replacement or an extension of the built-in tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconFile {
    /// Merge into the built-in lexicon instead of replacing it
    #[serde(default)]
    pub extend: bool,

    #[serde(flatten)]
    pub spec: LexiconSpec,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn union_into(target: &mut Vec<String>, extra: Vec<String>) {
    for item in extra {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

impl LexiconSpec {
    /// The built-in marketplace review lexicon
    pub fn builtin() -> Self {
        Self {
            categories: owned(CATEGORIES),
            keywords: KEYWORDS
                .iter()
                .map(|(category, phrases)| (category.to_string(), owned(phrases)))
                .collect(),
            severe_modifiers: owned(SEVERE_MODIFIERS),
            minor_modifiers: owned(MINOR_MODIFIERS),
            severity_forcing: owned(SEVERITY_FORCING),
            positive_words: owned(POSITIVE_WORDS),
            hard_negative: owned(HARD_NEGATIVE),
            positive: owned(POSITIVE_ISSUES),
        }
    }

    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Merge another spec into this one (union of every table)
    pub fn merge(mut self, other: LexiconSpec) -> Self {
        union_into(&mut self.categories, other.categories);
        for (category, phrases) in other.keywords {
            union_into(self.keywords.entry(category).or_default(), phrases);
        }
        union_into(&mut self.severe_modifiers, other.severe_modifiers);
        union_into(&mut self.minor_modifiers, other.minor_modifiers);
        union_into(&mut self.severity_forcing, other.severity_forcing);
        union_into(&mut self.positive_words, other.positive_words);
        union_into(&mut self.hard_negative, other.hard_negative);
        union_into(&mut self.positive, other.positive);
        self
    }
}

impl LexiconFile {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Resolve to a full spec, applying the extension to the built-in tables
    pub fn into_spec(self) -> LexiconSpec {
        if self.extend {
            LexiconSpec::builtin().merge(self.spec)
        } else {
            self.spec
        }
    }
}

/// Keyword phrases for one category, normalized and lower-cased
#[derive(Debug, Clone)]
pub struct CategoryKeywords {
    pub category: String,
    pub phrases: Vec<String>,
}

/// Validated, immutable lexicon
#[derive(Debug, Clone)]
pub struct Lexicon {
    categories: Vec<String>,
    keywords: Vec<CategoryKeywords>,
    severe_modifiers: Vec<String>,
    minor_modifiers: Vec<String>,
    severity_forcing: Vec<String>,
    positive_words: Vec<String>,
    hard_negative: BTreeSet<String>,
    positive: BTreeSet<String>,
    positive_matcher: AhoCorasick,
}

/// Normalize a phrase list: typographic punctuation, case, whitespace, duplicates
fn normalize_phrases(table: &str, phrases: Vec<String>) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(phrases.len());
    for phrase in phrases {
        let phrase = normalize_punctuation(phrase.trim()).to_lowercase();
        if phrase.is_empty() {
            return Err(Error::config(format!("empty phrase in {}", table)));
        }
        if !out.contains(&phrase) {
            out.push(phrase);
        }
    }
    Ok(out)
}

impl Lexicon {
    /// Build and validate the built-in lexicon
    pub fn builtin() -> Result<Self> {
        Self::from_spec(LexiconSpec::builtin())
    }

    /// Load a lexicon file and validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = LexiconFile::from_file(path).map_err(|e| {
            Error::config(format!("failed to load lexicon {}: {}", path.display(), e))
        })?;
        Self::from_spec(file.into_spec())
    }

    /// Validate a spec and build the lexicon
    pub fn from_spec(spec: LexiconSpec) -> Result<Self> {
        let mut categories: Vec<String> = Vec::with_capacity(spec.categories.len());
        for category in spec.categories {
            let category = category.trim().to_string();
            if category.is_empty() {
                return Err(Error::config("empty category name in catalog"));
            }
            if categories.contains(&category) {
                return Err(Error::config(format!("duplicate category '{}'", category)));
            }
            categories.push(category);
        }

        for label in STRUCTURAL_LABELS {
            if !categories.iter().any(|c| c == label) {
                return Err(Error::config(format!(
                    "required category '{}' missing from catalog",
                    label
                )));
            }
        }

        // the severe damage label is graded by the matcher, never a catalog entry
        let ensure_known = |table: &str, name: &str| -> Result<()> {
            if name == DAMAGED_SEVERE || categories.iter().any(|c| c == name) {
                Ok(())
            } else {
                Err(Error::config(format!(
                    "{} references unknown category '{}'",
                    table, name
                )))
            }
        };

        let mut by_category = spec.keywords;
        let mut keywords = Vec::with_capacity(by_category.len());
        for name in by_category.keys() {
            ensure_known("keyword table", name)?;
        }
        // severe damage phrases are damage phrases; the matcher grades them
        if let Some(severe) = by_category.remove(DAMAGED_SEVERE) {
            by_category
                .entry(DAMAGED.to_string())
                .or_default()
                .extend(severe);
        }
        // catalog order, so matching is deterministic
        for category in &categories {
            if let Some(phrases) = by_category.remove(category) {
                let phrases = normalize_phrases(&format!("keywords for '{}'", category), phrases)?;
                keywords.push(CategoryKeywords {
                    category: category.clone(),
                    phrases,
                });
            }
        }

        let hard_negative: BTreeSet<String> = spec.hard_negative.into_iter().collect();
        let positive: BTreeSet<String> = spec.positive.into_iter().collect();
        for name in &hard_negative {
            ensure_known("hard-negative set", name)?;
        }
        for name in &positive {
            ensure_known("positive set", name)?;
        }
        if let Some(both) = hard_negative.intersection(&positive).next() {
            return Err(Error::config(format!(
                "category '{}' is both hard-negative and positive",
                both
            )));
        }

        let severe_modifiers = normalize_phrases("severe modifiers", spec.severe_modifiers)?;
        let minor_modifiers = normalize_phrases("minor modifiers", spec.minor_modifiers)?;
        if let Some(both) = severe_modifiers.iter().find(|m| minor_modifiers.contains(m)) {
            return Err(Error::config(format!(
                "modifier '{}' is both severe and minor",
                both
            )));
        }
        let severity_forcing = normalize_phrases("severity-forcing words", spec.severity_forcing)?;
        let positive_words = normalize_phrases("positive words", spec.positive_words)?;

        let positive_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&positive_words)
            .map_err(|e| Error::config(format!("failed to build positive word matcher: {}", e)))?;

        Ok(Self {
            categories,
            keywords,
            severe_modifiers,
            minor_modifiers,
            severity_forcing,
            positive_words,
            hard_negative,
            positive,
            positive_matcher,
        })
    }

    /// Ordered issue catalog (the fallback classifier's candidate labels)
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn contains_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    /// Catalog entries plus labels derived by severity grading
    pub fn is_known_label(&self, name: &str) -> bool {
        name == DAMAGED_SEVERE || self.contains_category(name)
    }

    /// Keyword tables in catalog order
    pub fn keyword_tables(&self) -> &[CategoryKeywords] {
        &self.keywords
    }

    pub fn keywords_for(&self, category: &str) -> Option<&[String]> {
        self.keywords
            .iter()
            .find(|k| k.category == category)
            .map(|k| k.phrases.as_slice())
    }

    pub fn severe_modifiers(&self) -> &[String] {
        &self.severe_modifiers
    }

    pub fn minor_modifiers(&self) -> &[String] {
        &self.minor_modifiers
    }

    pub fn severity_forcing(&self) -> &[String] {
        &self.severity_forcing
    }

    pub fn positive_words(&self) -> &[String] {
        &self.positive_words
    }

    pub fn is_hard_negative(&self, category: &str) -> bool {
        self.hard_negative.contains(category)
    }

    pub fn is_positive_issue(&self, category: &str) -> bool {
        self.positive.contains(category)
    }

    /// Whether any positive word or phrase occurs as a literal substring
    pub fn has_positive_wording(&self, text: &str) -> bool {
        self.positive_matcher.is_match(text)
    }
}
