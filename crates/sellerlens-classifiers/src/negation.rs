//! Negation guard: suppresses keyword hits like "no scratches"

use regex::Regex;
use sellerlens_core::{Error, Result};

/// Words that negate a following keyword
pub const NEGATION_TRIGGERS: &[&str] = &["no", "not", "never", "without"];

/// Default number of words allowed between trigger and keyword
pub const DEFAULT_MAX_GAP: usize = 3;

/// Precompiled negation check for a single keyword phrase
#[derive(Debug, Clone)]
pub struct NegationGuard {
    keyword: String,
    pattern: Regex,
}

impl NegationGuard {
    /// Compile the guard for `keyword`, allowing up to `max_gap` words in between
    pub fn new(keyword: &str, max_gap: usize) -> Result<Self> {
        let pattern = Regex::new(&negation_pattern(keyword, max_gap)).map_err(|e| {
            Error::config(format!(
                "failed to compile negation pattern for '{}': {}",
                keyword, e
            ))
        })?;

        Ok(Self {
            keyword: keyword.to_string(),
            pattern,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// True if a negation trigger precedes the keyword within the window
    pub fn is_negated(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

fn negation_pattern(keyword: &str, max_gap: usize) -> String {
    let starts_word = keyword.chars().next().is_some_and(is_word_char);
    let ends_word = keyword.chars().last().is_some_and(is_word_char);

    format!(
        r"(?i)\b(?:{})\b(?:\W+\w+){{0,{}}}?\W*{}{}{}",
        NEGATION_TRIGGERS.join("|"),
        max_gap,
        if starts_word { r"\b" } else { "" },
        regex::escape(keyword),
        if ends_word { r"\b" } else { "" },
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// One-off negation check; compiles the pattern on every call.
pub fn is_negated(text: &str, keyword: &str, max_gap: usize) -> bool {
    match NegationGuard::new(keyword, max_gap) {
        Ok(guard) => guard.is_negated(text),
        Err(e) => {
            tracing::warn!(error = %e, "negation check skipped");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_negation() {
        assert!(is_negated("no scratches at all", "scratches", DEFAULT_MAX_GAP));
        assert!(is_negated("it was not scratched", "scratched", DEFAULT_MAX_GAP));
        assert!(is_negated("Without Scratches", "scratches", DEFAULT_MAX_GAP));
    }

    #[test]
    fn test_negation_window() {
        assert!(is_negated("never seen any scratches", "scratches", DEFAULT_MAX_GAP));
        assert!(is_negated(
            "no visible or deep scratches",
            "scratches",
            DEFAULT_MAX_GAP
        ));
        assert!(!is_negated(
            "no box but the back has some deep scratches",
            "scratches",
            DEFAULT_MAX_GAP
        ));
        assert!(is_negated(
            "no box but the back has some deep scratches",
            "scratches",
            10
        ));
    }

    #[test]
    fn test_word_boundaries() {
        // "note" is not a trigger, "scratchesque" is not the keyword
        assert!(!is_negated("note the scratches", "scratches", DEFAULT_MAX_GAP));
        assert!(!is_negated("no scratchesque finish", "scratches", DEFAULT_MAX_GAP));
        assert!(!is_negated("scratches everywhere", "scratches", DEFAULT_MAX_GAP));
    }

    #[test]
    fn test_keyword_is_escaped() {
        let guard = NegationGuard::new("won't turn on", DEFAULT_MAX_GAP).unwrap();
        assert!(!guard.is_negated("it won't turn on"));
        assert!(guard.is_negated("never said it won't turn on"));

        let guard = NegationGuard::new("(severe)", DEFAULT_MAX_GAP).unwrap();
        assert!(guard.is_negated("not (severe)"));
        assert_eq!(guard.keyword(), "(severe)");
    }
}
