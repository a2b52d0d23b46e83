use std::ops::Range;

/// Split text into whitespace-delimited words. Empty or all-whitespace text
/// yields no words.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Byte ranges of each word in `text`, in order.
pub fn word_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push(s..idx);
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push(s..text.len());
    }
    spans
}

/// Whether typed word `word_index` has been committed by a following space.
///
/// The last word is complete only when the text ends in whitespace. Any
/// earlier word is complete when the character right after its occurrence is
/// whitespace.
pub fn is_word_complete(full_text: &str, word_index: usize, typed_words: &[&str]) -> bool {
    if word_index >= typed_words.len() {
        return false;
    }

    if word_index + 1 == typed_words.len() {
        return full_text.ends_with(char::is_whitespace);
    }

    word_spans(full_text)
        .get(word_index)
        .is_some_and(|span| full_text[span.end..].starts_with(char::is_whitespace))
}
