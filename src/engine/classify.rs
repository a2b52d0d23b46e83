const PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '\'', '"', '(', ')', '/'];

pub fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(&c)
}

/// Weight of a mismatch at a position expecting `expected`.
/// Overflow characters (nothing expected) count as normal mistakes.
pub fn mistake_weight(expected: Option<char>) -> f64 {
    match expected {
        Some(c) if is_punctuation(c) => 0.5,
        _ => 1.0,
    }
}
