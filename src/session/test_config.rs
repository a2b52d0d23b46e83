use serde::{Deserialize, Serialize};

use crate::engine::metrics::QualificationCriteria;

/// Settings for one test session. Immutable once a session is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestConfiguration {
    pub test_name: String,
    /// Countdown length in seconds.
    pub time_limit: u32,
    #[serde(default = "default_category")]
    pub passage_category: String,
    #[serde(default)]
    pub qualification_criteria: QualificationCriteria,
    /// Used verbatim as the only passage, bypassing the passage source.
    #[serde(default)]
    pub custom_passage: Option<String>,
}

fn default_category() -> String {
    "general".to_string()
}

impl TestConfiguration {
    pub fn new(test_name: &str, time_limit: u32, passage_category: &str) -> Self {
        Self {
            test_name: test_name.to_string(),
            time_limit,
            passage_category: passage_category.to_string(),
            qualification_criteria: QualificationCriteria::default(),
            custom_passage: None,
        }
    }

    pub fn with_criteria(mut self, min_wpm: u32, min_accuracy: u32) -> Self {
        self.qualification_criteria = QualificationCriteria {
            min_wpm,
            min_accuracy,
        };
        self
    }

    pub fn with_custom_passage(mut self, text: &str) -> Self {
        self.custom_passage = Some(text.to_string());
        self
    }

    pub fn with_time_limit(mut self, secs: u32) -> Self {
        self.time_limit = secs;
        self
    }

    pub fn has_custom_passage(&self) -> bool {
        self.custom_passage
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_defaults() {
        let cfg: TestConfiguration = toml::from_str(
            r#"
test_name = "Quick"
time_limit = 60
"#,
        )
        .unwrap();
        assert_eq!(cfg.passage_category, "general");
        assert_eq!(cfg.qualification_criteria, QualificationCriteria::default());
        assert!(!cfg.has_custom_passage());
    }

    #[test]
    fn test_blank_custom_passage_ignored() {
        let cfg = TestConfiguration::new("x", 60, "general").with_custom_passage("   ");
        assert!(!cfg.has_custom_passage());
    }
}
