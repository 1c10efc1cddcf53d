//! Core types for SellerLens

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse star-style rating supplied alongside a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Rating {
    /// Parse a rating, falling back to `Neutral` for blank or unknown text.
    ///
    /// Input rows are never rejected because of their rating column.
    pub fn parse_lenient(s: &str) -> Self {
        match s.parse() {
            Ok(rating) => rating,
            Err(_) => {
                if !s.trim().is_empty() {
                    tracing::debug!(rating = s, "unrecognised rating, treating as neutral");
                }
                Self::Neutral
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl FromStr for Rating {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(crate::Error::config(format!("unknown rating '{}'", other))),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final normalized sentiment verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
        }
    }
}

/// The verdict that simply echoes the original rating
impl From<Rating> for Sentiment {
    fn from(rating: Rating) -> Self {
        match rating {
            Rating::Positive => Self::Positive,
            Rating::Neutral => Self::Neutral,
            Rating::Negative => Self::Negative,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single customer review: free text plus the user-supplied rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Review {
    /// Review text
    #[serde(default, deserialize_with = "string_or_null")]
    pub comment: String,

    /// Original rating, read from the `rating_type` column
    #[serde(rename = "rating_type", default, deserialize_with = "lenient_rating")]
    pub rating: Rating,
}

impl Review {
    /// Create a new review
    pub fn new(comment: impl Into<String>, rating: Rating) -> Self {
        Self {
            comment: comment.into(),
            rating,
        }
    }
}

/// Issues and final sentiment for one review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Sorted, deduplicated category names
    pub issues: Vec<String>,

    /// Final sentiment after reconciling issues with the rating
    pub final_sentiment: Sentiment,
}

impl ClassificationResult {
    /// Create a new classification result
    pub fn new(issues: Vec<String>, final_sentiment: Sentiment) -> Self {
        Self {
            issues,
            final_sentiment,
        }
    }

    /// Result for a review with nothing to classify
    pub fn empty(rating: Rating) -> Self {
        Self::new(Vec::new(), rating.into())
    }

    /// Check whether a category was assigned
    pub fn has_issue(&self, issue: &str) -> bool {
        self.issues.iter().any(|i| i == issue)
    }
}

/// Any JSON scalar an input column may hold; arrays and objects are ignored
#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarField {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Other(serde::de::IgnoredAny),
}

impl ScalarField {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Integer(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Other(_) => String::new(),
        }
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ScalarField>::deserialize(deserializer)?
        .map(ScalarField::into_text)
        .unwrap_or_default())
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(deserializer)
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<Rating, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Rating::parse_lenient(&scalar_text(deserializer)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_parsing() {
        assert_eq!("Positive".parse::<Rating>().unwrap(), Rating::Positive);
        assert_eq!(" NEGATIVE ".parse::<Rating>().unwrap(), Rating::Negative);
        assert!("stars".parse::<Rating>().is_err());

        assert_eq!(Rating::parse_lenient(""), Rating::Neutral);
        assert_eq!(Rating::parse_lenient("great"), Rating::Neutral);
        assert_eq!(Rating::parse_lenient("neutral"), Rating::Neutral);
    }

    #[test]
    fn test_sentiment_from_rating() {
        assert_eq!(Sentiment::from(Rating::Positive).to_string(), "POSITIVE");
        assert_eq!(Sentiment::from(Rating::Neutral).to_string(), "NEUTRAL");
        assert_eq!(Sentiment::from(Rating::Negative).to_string(), "NEGATIVE");
    }

    #[test]
    fn test_review_deserialization() {
        let review: Review =
            serde_json::from_str(r#"{"comment": "arrived late", "rating_type": "Negative"}"#)
                .unwrap();
        assert_eq!(review.comment, "arrived late");
        assert_eq!(review.rating, Rating::Negative);

        let review: Review = serde_json::from_str(r#"{"comment": null}"#).unwrap();
        assert_eq!(review.comment, "");
        assert_eq!(review.rating, Rating::Neutral);
    }

    #[test]
    fn test_review_with_non_string_fields() {
        let review: Review =
            serde_json::from_str(r#"{"comment": 42, "rating_type": 5}"#).unwrap();
        assert_eq!(review.comment, "42");
        assert_eq!(review.rating, Rating::Neutral);

        let review: Review =
            serde_json::from_str(r#"{"comment": ["a", "b"], "rating_type": {"stars": 1}}"#)
                .unwrap();
        assert_eq!(review.comment, "");
        assert_eq!(review.rating, Rating::Neutral);

        let review: Review =
            serde_json::from_str(r#"{"comment": 2.5, "rating_type": true}"#).unwrap();
        assert_eq!(review.comment, "2.5");
        assert_eq!(review.rating, Rating::Neutral);
    }

    #[test]
    fn test_result_serialization() {
        let result = ClassificationResult::new(
            vec!["Late delivery".to_string()],
            Sentiment::Neutral,
        );
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"issues":["Late delivery"],"final_sentiment":"NEUTRAL"}"#);
        assert!(result.has_issue("Late delivery"));
    }
}
