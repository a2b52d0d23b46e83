use crate::store::schema::HistoryData;

/// Completed tests needed before a certificate can be requested.
pub const REQUIRED_TESTS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    NeedsMoreTests { completed: usize, required: usize },
}

impl Eligibility {
    pub fn is_eligible(self) -> bool {
        self == Eligibility::Eligible
    }

    pub fn message(self) -> String {
        match self {
            Eligibility::Eligible => "Eligible for a certificate".to_string(),
            Eligibility::NeedsMoreTests { completed, required } => {
                let remaining = required - completed;
                format!(
                    "Complete {remaining} more test(s) to unlock certificates \
                     ({completed}/{required})"
                )
            }
        }
    }
}

/// Local check against the recorded history. The service does not verify it.
pub fn check_eligibility(history: &HistoryData) -> Eligibility {
    let completed = history.completed_tests();
    if completed >= REQUIRED_TESTS {
        Eligibility::Eligible
    } else {
        Eligibility::NeedsMoreTests {
            completed,
            required: REQUIRED_TESTS,
        }
    }
}
