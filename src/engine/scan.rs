use crate::engine::classify::is_punctuation;
use crate::engine::highlight::{CharStatus, HighlightedChar, align};
use crate::engine::words::{is_word_complete, split_words};

/// Character and word tallies from one full pass over the typed text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub total_chars: usize,
    pub correct_chars: usize,
    pub normal_mistakes: usize,
    pub punctuation_mistakes: usize,
    pub total_words: usize,
    pub correct_words: usize,
    pub incorrect_words: usize,
}

impl Tally {
    fn record(&mut self, mark: &HighlightedChar) {
        self.total_chars += 1;
        match (mark.status, mark.expected()) {
            (CharStatus::Correct, _) => self.correct_chars += 1,
            (CharStatus::Wrong, Some(c)) if is_punctuation(c) => self.punctuation_mistakes += 1,
            (CharStatus::Wrong, _) => self.normal_mistakes += 1,
        }
    }

    /// Words that have been committed and scored.
    pub fn completed_words(&self) -> usize {
        self.correct_words + self.incorrect_words
    }
}

/// Score `typed` against the reference word sequence from scratch.
///
/// Committed words are aligned in full and tallied as correct or incorrect;
/// the word still being typed only contributes the characters typed so far.
/// Each word-terminating space counts as one correct character; any other
/// typed whitespace (leading, or runs between words) is a normal mistake.
/// With `end_of_input` the trailing word is treated as committed.
pub fn scan(reference: &[String], typed: &str, end_of_input: bool) -> Tally {
    let words = split_words(typed);
    let mut tally = Tally {
        total_words: words.len(),
        ..Tally::default()
    };
    let mut separators = 0;

    for (i, word) in words.iter().enumerate() {
        let expected: Vec<char> = reference
            .get(i)
            .map(|w| w.chars().collect())
            .unwrap_or_default();
        let typed_chars: Vec<char> = word.chars().collect();

        let terminated = is_word_complete(typed, i, &words);
        let committed = terminated || (end_of_input && i + 1 == words.len());

        for mark in &align(&expected, &typed_chars, committed) {
            tally.record(mark);
        }

        if terminated {
            separators += 1;
            tally.total_chars += 1;
            tally.correct_chars += 1;
        }

        if committed {
            if reference.get(i).is_some_and(|w| w == word) {
                tally.correct_words += 1;
            } else {
                tally.incorrect_words += 1;
            }
        }
    }

    let whitespace = typed.chars().filter(|c| c.is_whitespace()).count();
    let extra = whitespace.saturating_sub(separators);
    tally.total_chars += extra;
    tally.normal_mistakes += extra;

    tally
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn assert_balanced(t: &Tally) {
        assert_eq!(
            t.correct_chars + t.normal_mistakes + t.punctuation_mistakes,
            t.total_chars
        );
    }

    #[test]
    fn test_exact_passage_with_trailing_space() {
        let t = scan(&words("the quick fox"), "the quick fox ", false);
        assert_eq!(t.correct_chars, 14);
        assert_eq!(t.total_chars, 14);
        assert_eq!(t.total_words, 3);
        assert_eq!(t.correct_words, 3);
        assert_eq!(t.incorrect_words, 0);
        assert_balanced(&t);
    }

    #[test]
    fn test_current_word_not_counted_as_word() {
        let t = scan(&words("the quick fox"), "the qui", false);
        assert_eq!(t.completed_words(), 1);
        assert_eq!(t.total_words, 2);
        assert_eq!(t.correct_chars, 7);
        assert_eq!(t.total_chars, 7);
    }

    #[test]
    fn test_end_of_input_commits_last_word() {
        let t = scan(&words("the quick fox"), "the quick fox", true);
        assert_eq!(t.correct_words, 3);
        // No terminating space after "fox".
        assert_eq!(t.correct_chars, 13);
    }

    #[test]
    fn test_punctuation_mistakes_split_out() {
        let t = scan(&words("yes, no."), "yes; no! ", false);
        assert_eq!(t.punctuation_mistakes, 2);
        assert_eq!(t.normal_mistakes, 0);
        assert_eq!(t.incorrect_words, 2);
        assert_balanced(&t);
    }

    #[test]
    fn test_words_past_reference_are_overflow() {
        let t = scan(&words("a"), "a bb ", false);
        assert_eq!(t.normal_mistakes, 2);
        assert_eq!(t.incorrect_words, 1);
        assert_balanced(&t);
    }

    #[test]
    fn test_word_counts_bounded_by_terminated_words() {
        let reference = words("one two three four");
        let typed = "one tow three fo";
        for end in 0..=typed.len() {
            let prefix = &typed[..end];
            let t = scan(&reference, prefix, false);
            let terminated = split_words(prefix)
                .iter()
                .enumerate()
                .filter(|(i, _)| is_word_complete(prefix, *i, &split_words(prefix)))
                .count();
            assert!(t.completed_words() <= terminated);
            assert!(t.completed_words() <= reference.len());
            assert_balanced(&t);
        }
    }

    #[test]
    fn test_extra_spaces_are_mistakes() {
        let reference = words("the quick fox");
        let t = scan(&reference, "   the    quick     fox ", false);
        assert_eq!(t.correct_chars, 14);
        assert_eq!(t.normal_mistakes, 10);
        assert_eq!(t.total_chars, 24);
        assert_eq!(t.correct_words, 3);
        assert_balanced(&t);

        let t = scan(&reference, "  ", false);
        assert_eq!(t.total_words, 0);
        assert_eq!(t.normal_mistakes, 2);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(scan(&words("a b"), "", false), Tally::default());
        assert_eq!(scan(&words("a b"), "", true), Tally::default());
    }
}
