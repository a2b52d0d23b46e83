use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::metrics::{QualificationCriteria, TypingStats};

/// Frozen outcome of a finished test, handed to history and certificates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test_name: String,
    pub passage_title: String,
    pub stats: TypingStats,
    pub criteria: QualificationCriteria,
    pub time_limit: u32,
    #[serde(default)]
    pub idle_secs: u32,
    /// True when the countdown ran out rather than a manual or completion
    /// submit.
    #[serde(default)]
    pub timed_out: bool,
    pub finished_at: DateTime<Utc>,
}

impl TestResult {
    pub fn is_qualified(&self) -> bool {
        self.stats.is_qualified
    }

    /// Short human summary used in logs and the result screen footer.
    pub fn summary(&self) -> String {
        let verdict = if self.is_qualified() { "qualified" } else { "not qualified" };
        format!(
            "{}: {} wpm gross, {} wpm net, {}% accuracy ({verdict})",
            self.test_name, self.stats.gross_speed, self.stats.net_speed, self.stats.accuracy
        )
    }
}
