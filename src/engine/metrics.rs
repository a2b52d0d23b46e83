use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::scan::Tally;

pub const CHARS_PER_WORD: f64 = 5.0;
/// Characters deducted from the correct count per weighted mistake.
pub const MISTAKE_PENALTY: f64 = 5.0;
/// Minimum elapsed time before a test can qualify.
pub const MIN_TEST_SECONDS: f64 = 60.0;
pub const PUNCTUATION_WEIGHT: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationCriteria {
    pub min_wpm: u32,
    pub min_accuracy: u32,
}

impl Default for QualificationCriteria {
    fn default() -> Self {
        Self {
            min_wpm: 25,
            min_accuracy: 85,
        }
    }
}

/// Everything the calculator needs; a plain value so recomputation from the
/// same input always yields the same stats.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MetricsInput {
    pub tally: Tally,
    pub backspaces: usize,
    pub elapsed: Duration,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TypingStats {
    pub gross_speed: u32,
    pub net_speed: u32,
    pub accuracy: u32,
    pub mistakes: u32,
    pub mistake_rate: u32,
    pub time_taken_secs: u64,
    pub backspaces: usize,
    pub total_words: usize,
    pub correct_words: usize,
    pub incorrect_words: usize,
    pub time_per_word: String,
    pub is_qualified: bool,
}

fn percent(part: f64, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part / whole as f64 * 100.0).round() as u32
}

/// Derive typing stats. `criteria` is only passed for a final snapshot;
/// without it `is_qualified` is always false.
pub fn compute(input: &MetricsInput, criteria: Option<&QualificationCriteria>) -> TypingStats {
    let tally = &input.tally;
    let elapsed_secs = input.elapsed.as_secs_f64();
    let elapsed_minutes = (elapsed_secs / 60.0).max(1.0 / 60.0);

    let correct = tally.correct_chars as f64;
    let weighted_mistakes =
        tally.normal_mistakes as f64 + tally.punctuation_mistakes as f64 * PUNCTUATION_WEIGHT;

    let gross = ((correct / CHARS_PER_WORD) / elapsed_minutes).max(0.0).round();
    let penalty = (weighted_mistakes * MISTAKE_PENALTY).min(correct);
    let net = (((correct - penalty) / CHARS_PER_WORD) / elapsed_minutes)
        .max(0.0)
        .round();

    let accuracy = percent(correct, tally.total_chars);
    let mistake_rate = percent(weighted_mistakes, tally.total_chars);

    let time_per_word = if tally.total_words > 0 {
        format!("{:.2}s", elapsed_secs / tally.total_words as f64)
    } else {
        "0s".to_string()
    };

    let gross_speed = gross as u32;
    let is_qualified = criteria.is_some_and(|c| {
        elapsed_secs >= MIN_TEST_SECONDS
            && gross_speed >= c.min_wpm
            && accuracy >= c.min_accuracy
    });

    TypingStats {
        gross_speed,
        net_speed: net as u32,
        accuracy,
        mistakes: weighted_mistakes.round() as u32,
        mistake_rate,
        time_taken_secs: input.elapsed.as_secs(),
        backspaces: input.backspaces,
        total_words: tally.total_words,
        correct_words: tally.correct_words,
        incorrect_words: tally.incorrect_words,
        time_per_word,
        is_qualified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(correct: usize, total: usize, normal: usize, punct: usize, secs: u64) -> MetricsInput {
        MetricsInput {
            tally: Tally {
                total_chars: total,
                correct_chars: correct,
                normal_mistakes: normal,
                punctuation_mistakes: punct,
                ..Tally::default()
            },
            backspaces: 0,
            elapsed: Duration::from_secs(secs),
        }
    }

    #[test]
    fn test_one_minute_clean_run() {
        let mut i = input(14, 14, 0, 0, 60);
        i.tally.total_words = 3;
        i.tally.correct_words = 3;
        let stats = compute(&i, None);
        assert_eq!(stats.gross_speed, 3);
        assert_eq!(stats.net_speed, 3);
        assert_eq!(stats.accuracy, 100);
        assert_eq!(stats.time_per_word, "20.00s");
    }

    #[test]
    fn test_accuracy_rounds() {
        let stats = compute(&input(2, 3, 1, 0, 10), None);
        assert_eq!(stats.accuracy, 67);
    }

    #[test]
    fn test_zero_chars() {
        let stats = compute(&MetricsInput::default(), None);
        assert_eq!(stats.accuracy, 0);
        assert_eq!(stats.mistake_rate, 0);
        assert_eq!(stats.gross_speed, 0);
        assert_eq!(stats.time_per_word, "0s");
    }

    #[test]
    fn test_elapsed_floor_prevents_blowup() {
        // Zero elapsed is treated as one second.
        let stats = compute(&input(5, 5, 0, 0, 0), None);
        assert_eq!(stats.gross_speed, 60);
    }

    #[test]
    fn test_punctuation_weighted_half() {
        let stats = compute(&input(100, 104, 1, 3, 60), None);
        // 1 + 1.5 = 2.5 -> rounds away from zero
        assert_eq!(stats.mistakes, 3);
        // penalty 12.5 chars: (100 - 12.5) / 5 = 17.5 -> 18
        assert_eq!(stats.net_speed, 18);
        assert_eq!(stats.gross_speed, 20);
        assert_eq!(stats.mistake_rate, 2);
    }

    #[test]
    fn test_penalty_never_exceeds_correct() {
        let stats = compute(&input(3, 50, 47, 0, 60), None);
        assert_eq!(stats.net_speed, 0);
        assert!(stats.net_speed <= stats.gross_speed);
    }

    #[test]
    fn test_short_test_never_qualifies() {
        let criteria = QualificationCriteria {
            min_wpm: 25,
            min_accuracy: 85,
        };
        let stats = compute(&input(148, 164, 16, 0, 59), Some(&criteria));
        assert_eq!(stats.gross_speed, 30);
        assert_eq!(stats.accuracy, 90);
        assert!(!stats.is_qualified);
    }

    #[test]
    fn test_qualifies_at_one_minute() {
        let criteria = QualificationCriteria {
            min_wpm: 25,
            min_accuracy: 85,
        };
        let stats = compute(&input(150, 166, 16, 0, 60), Some(&criteria));
        assert_eq!(stats.gross_speed, 30);
        assert_eq!(stats.accuracy, 90);
        assert!(stats.is_qualified);
    }

    #[test]
    fn test_live_snapshot_never_qualified() {
        let stats = compute(&input(500, 500, 0, 0, 120), None);
        assert!(!stats.is_qualified);
    }

    #[test]
    fn test_compute_is_pure() {
        let i = input(40, 45, 3, 2, 33);
        assert_eq!(compute(&i, None), compute(&i, None));
    }

    #[test]
    fn test_net_never_exceeds_gross() {
        for correct in (0..200).step_by(7) {
            for mistakes in 0..20 {
                let stats = compute(&input(correct, correct + mistakes, mistakes, 0, 45), None);
                assert!(stats.net_speed <= stats.gross_speed);
                assert!(stats.accuracy <= 100);
            }
        }
    }
}
