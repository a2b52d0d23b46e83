use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::session::result::TestResult;
use crate::store::schema::HistoryData;

const HISTORY_FILE: &str = "history.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self, StoreError> {
        let base_dir = dirs::data_dir()
            .ok_or(StoreError::NoDataDir)?
            .join("keyexam");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "unreadable store file, using defaults"
                );
                T::default()
            }),
            Err(_) => T::default(),
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<(), StoreError> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Stored history, or an empty one when missing, corrupt or from an
    /// older schema.
    pub fn load_history(&self) -> HistoryData {
        let data: HistoryData = self.load(HISTORY_FILE);
        if data.needs_reset() {
            warn!(version = data.schema_version, "history schema mismatch, starting fresh");
            return HistoryData::default();
        }
        data
    }

    pub fn save_history(&self, data: &HistoryData) -> Result<(), StoreError> {
        self.save(HISTORY_FILE, data)
    }

    /// Append one result and persist. Returns the updated history.
    pub fn record(&self, result: TestResult, limit: usize) -> Result<HistoryData, StoreError> {
        let mut history = self.load_history();
        history.push(result, limit);
        self.save_history(&history)?;
        debug!(count = history.completed_tests(), "test result recorded");
        Ok(history)
    }
}
