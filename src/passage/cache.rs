use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::PassageError;
use crate::passage::{Passage, PassageSource};

/// Last good passage list per category, stored as JSON files.
#[derive(Clone, Debug)]
pub struct DiskCache {
    base_dir: PathBuf,
}

impl DiskCache {
    pub fn new(subdir: &str) -> Option<Self> {
        let base = dirs::cache_dir()?.join("keyexam").join(subdir);
        Self::with_base_dir(base)
    }

    pub fn with_base_dir(base: PathBuf) -> Option<Self> {
        fs::create_dir_all(&base).ok()?;
        Some(Self { base_dir: base })
    }

    pub fn get(&self, key: &str) -> Option<Vec<Passage>> {
        let path = self.path_for(key);
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn put(&self, key: &str, passages: &[Passage]) -> bool {
        let Ok(json) = serde_json::to_string(passages) else {
            return false;
        };
        let ok = fs::write(self.path_for(key), json).is_ok();
        debug!(key, ok, count = passages.len(), "passage cache write");
        ok
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", Self::sanitize_key(key)))
    }

    fn sanitize_key(key: &str) -> String {
        key.chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl PassageSource for DiskCache {
    fn fetch(&self, category: &str) -> Result<Vec<Passage>, PassageError> {
        self.get(category)
            .ok_or_else(|| PassageError::Unavailable(category.to_string()))
    }
}
