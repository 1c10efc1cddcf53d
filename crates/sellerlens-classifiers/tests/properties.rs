//! Property-based tests over the review engine

use proptest::prelude::*;
use sellerlens_classifiers::ReviewEngine;
use sellerlens_core::{Rating, Review};

const WORDS: &[&str] = &[
    "no", "not", "never", "without", "tiny", "deep", "scratch", "scratches", "cracked", "chipped",
    "broken", "fake", "late", "delayed", "misleading", "as", "described", "accurate",
    "description", "great", "perfect", "fast", "delivery", "well", "packaged", "seller", "the",
    "screen", "item", "was", "and", "but", "overpriced", "wrong", "missing", "parts",
];

fn comment() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..12).prop_map(|words| words.join(" "))
}

fn rating() -> impl Strategy<Value = Rating> {
    prop_oneof![
        Just(Rating::Positive),
        Just(Rating::Neutral),
        Just(Rating::Negative),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn classification_is_idempotent(comment in comment(), rating in rating()) {
        let rt = runtime();
        let engine = ReviewEngine::rules_only().unwrap();
        let review = Review::new(comment, rating);

        let first = rt.block_on(engine.classify(&review)).result;
        let second = rt.block_on(engine.classify(&review)).result;
        prop_assert_eq!(first, second);
    }

    #[test]
    fn conflicting_labels_never_coexist(comment in comment(), rating in rating()) {
        let rt = runtime();
        let engine = ReviewEngine::rules_only().unwrap();

        let result = rt.block_on(engine.classify(&Review::new(comment, rating))).result;
        prop_assert!(
            !(result.has_issue("Damaged product") && result.has_issue("Damaged product (severe)"))
        );
        prop_assert!(
            !(result.has_issue("Accurate description") && result.has_issue("Misleading description"))
        );
    }

    #[test]
    fn issues_come_from_the_catalog(comment in comment(), rating in rating()) {
        let rt = runtime();
        let engine = ReviewEngine::rules_only().unwrap();

        let result = rt.block_on(engine.classify(&Review::new(comment, rating))).result;
        for issue in &result.issues {
            prop_assert!(engine.lexicon().is_known_label(issue));
        }
    }
}
