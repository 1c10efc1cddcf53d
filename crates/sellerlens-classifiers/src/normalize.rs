//! Text normalization applied before matching

use std::borrow::Cow;

/// Comments too short to carry any issue signal
const TRIVIAL_COMMENTS: &[&str] = &["ok", "fine", "good", "meh", "nice", "cool"];

/// Replace typographic quotes and dashes with their ASCII equivalents.
///
/// Casing and whitespace are left untouched.
pub fn normalize_punctuation(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_typographic) {
        return Cow::Borrowed(text);
    }

    Cow::Owned(
        text.chars()
            .map(|c| match c {
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{2013}' | '\u{2014}' => '-',
                other => other,
            })
            .collect(),
    )
}

fn is_typographic(c: char) -> bool {
    matches!(
        c,
        '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}' | '\u{2013}' | '\u{2014}'
    )
}

/// Whether a comment is a one-word acknowledgement like "ok" or "fine"
pub fn is_trivial_comment(text: &str) -> bool {
    let trimmed = text.trim().to_lowercase();
    TRIVIAL_COMMENTS.contains(&trimmed.as_str())
}
