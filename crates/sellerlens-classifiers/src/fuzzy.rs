//! Approximate phrase containment
//!
//! Scores are on a 0-100 scale. Two strings are compared with the normalized
//! indel similarity `2 * LCS / (|a| + |b|)`; the partial score slides the
//! phrase across the text and keeps the best window. A text shorter than the
//! phrase is scored as a whole, so "late" never contains "late delivery". This
//! tolerates a dropped or swapped letter in longer phrases while short
//! keywords effectively require an exact hit at the default threshold.

/// Default similarity threshold for keyword matching
pub const DEFAULT_THRESHOLD: u8 = 95;

/// Similarity of two strings, 0-100
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    to_score(similarity(&a, &b))
}

/// Best similarity between `phrase` and any equally long window of `text`, 0-100
pub fn partial_ratio(phrase: &str, text: &str) -> u8 {
    if phrase.is_empty() || text.is_empty() {
        return 0;
    }
    if text.contains(phrase) {
        return 100;
    }

    let short: Vec<char> = phrase.chars().collect();
    let long: Vec<char> = text.chars().collect();
    if long.len() <= short.len() {
        return to_score(similarity(&short, &long));
    }

    let mut best = 0.0_f64;
    for start in 0..long.len() {
        let end = (start + short.len()).min(long.len());
        // skip windows whose first char can't start an alignment
        if start > 0 && !short.contains(&long[start]) {
            continue;
        }
        let score = similarity(&short, &long[start..end]);
        if score > best {
            best = score;
            if best >= 1.0 {
                break;
            }
        }
    }

    to_score(best)
}

/// True iff `phrase` approximately occurs in `text` at or above `threshold`
pub fn fuzzy_contains(text: &str, phrase: &str, threshold: u8) -> bool {
    partial_ratio(phrase, text) >= threshold
}

fn to_score(similarity: f64) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

fn similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * lcs_len(a, b)) as f64 / total as f64
}

/// Longest common subsequence length, single rolling row
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diag = 0;
        for (j, &cb) in b.iter().enumerate() {
            let up = row[j + 1];
            row[j + 1] = if ca == cb {
                diag + 1
            } else {
                up.max(row[j])
            };
            diag = up;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        assert_eq!(ratio("scratched", "scratched"), 100);
        assert_eq!(ratio("scratched", "scratches"), 89);
        assert_eq!(ratio("abc", "xyz"), 0);
        assert_eq!(ratio("", ""), 100);
    }

    #[test]
    fn test_exact_containment() {
        assert_eq!(partial_ratio("fake", "item was a total fake, avoid"), 100);
        assert!(fuzzy_contains("the screen is cracked", "cracked", DEFAULT_THRESHOLD));
    }

    #[test]
    fn test_tolerates_minor_misspelling() {
        let text = "parcel arrived later than schedulled";
        assert!(fuzzy_contains(text, "later than scheduled", DEFAULT_THRESHOLD));
        assert!(!fuzzy_contains(text, "later than scheduled", 100));
    }

    #[test]
    fn test_near_miss_below_threshold() {
        let text = "no scratches and works perfectly";
        assert!(partial_ratio("scratched", text) < DEFAULT_THRESHOLD);
        assert!(!fuzzy_contains(text, "chips", DEFAULT_THRESHOLD));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(partial_ratio("", "anything"), 0);
        assert_eq!(partial_ratio("anything", ""), 0);
        assert!(!fuzzy_contains("", "late delivery", DEFAULT_THRESHOLD));
    }

    #[test]
    fn test_phrase_longer_than_text() {
        assert_eq!(partial_ratio("not what i ordered", "ordered"), 56);
        assert!(!fuzzy_contains("late", "late delivery", DEFAULT_THRESHOLD));
        assert_eq!(partial_ratio("late delivery", "late delivery"), 100);
    }

    #[test]
    fn test_lcs() {
        let a: Vec<char> = "customer".chars().collect();
        let b: Vec<char> = "costumer".chars().collect();
        assert_eq!(lcs_len(&a, &b), 6);
    }
}
