use serde::{Deserialize, Serialize};

use crate::session::result::TestResult;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    #[serde(default)]
    pub results: Vec<TestResult>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            results: Vec::new(),
        }
    }
}

impl HistoryData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// Append a result, dropping the oldest entries beyond `limit`.
    pub fn push(&mut self, result: TestResult, limit: usize) {
        self.results.push(result);
        if limit > 0 && self.results.len() > limit {
            let excess = self.results.len() - limit;
            self.results.drain(..excess);
        }
    }

    pub fn completed_tests(&self) -> usize {
        self.results.len()
    }

    pub fn qualified_tests(&self) -> usize {
        self.results.iter().filter(|r| r.is_qualified()).count()
    }

    pub fn best_net_speed(&self) -> Option<u32> {
        self.results.iter().map(|r| r.stats.net_speed).max()
    }

    pub fn last(&self) -> Option<&TestResult> {
        self.results.last()
    }
}
