//! SellerLens Classifiers
//!
//! Issue and sentiment classification for marketplace seller reviews.
//!
//! Classification runs in stages, cheapest first:
//! - Rule matcher: keyword tables with fuzzy matching, negation guards and
//!   damage severity grading
//! - Fallback: optional zero-shot classifier consulted for the same catalog
//! - Finalizer and sentiment resolver: merge the two sources and reconcile
//!   them with the user's rating
//!
//! The rule stages are synchronous and allocation-light; only the fallback
//! touches the network.

pub mod classifier;
pub mod config;
pub mod conflict;
pub mod engine;
pub mod fallback;
pub mod finalizer;
pub mod fuzzy;
pub mod http;
pub mod issues;
pub mod lexicon;
pub mod matcher;
pub mod negation;
pub mod normalize;
pub mod sentiment;

pub use classifier::{LabelScore, ZeroShotClassifier};
pub use config::{BatchSettings, EngineConfig};
pub use engine::{FallbackStatus, ReviewEngine, ReviewOutcome};
pub use fallback::{FallbackAdapter, FallbackMode, FallbackSettings, StaticZeroShotClassifier};
pub use finalizer::IssueFinalizer;
pub use http::HttpZeroShotClassifier;
pub use issues::IssueSet;
pub use lexicon::{Lexicon, LexiconFile, LexiconSpec};
pub use matcher::{DamageAssessment, MatchSettings, RuleMatcher};
pub use negation::NegationGuard;
pub use normalize::{is_trivial_comment, normalize_punctuation};
pub use sentiment::{SentimentResolver, SentimentSignals};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::ZeroShotClassifier;
    pub use crate::config::EngineConfig;
    pub use crate::engine::{FallbackStatus, ReviewEngine, ReviewOutcome};
    pub use crate::fallback::{FallbackMode, StaticZeroShotClassifier};
    pub use crate::http::HttpZeroShotClassifier;
    pub use crate::lexicon::Lexicon;
    pub use crate::matcher::RuleMatcher;
    pub use sellerlens_core::{ClassificationResult, Rating, Review, Sentiment};
}
