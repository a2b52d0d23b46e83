use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::presets;
use crate::session::test_config::TestConfiguration;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_offline")]
    pub offline: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_test")]
    pub default_test: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default = "default_idle_threshold_secs")]
    pub idle_threshold_secs: u64,
    #[serde(default = "default_auto_submit_on_completion")]
    pub auto_submit_on_completion: bool,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Extra presets; a preset named like a builtin replaces it.
    #[serde(default)]
    pub tests: Vec<TestConfiguration>,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}
fn default_offline() -> bool {
    false
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_test() -> String {
    "General Practice".to_string()
}
fn default_idle_threshold_secs() -> u64 {
    10
}
fn default_auto_submit_on_completion() -> bool {
    false
}
fn default_history_limit() -> usize {
    500
}
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            offline: default_offline(),
            theme: default_theme(),
            default_test: default_test(),
            user_name: String::new(),
            user_id: String::new(),
            idle_threshold_secs: default_idle_threshold_secs(),
            auto_submit_on_completion: default_auto_submit_on_completion(),
            history_limit: default_history_limit(),
            log_filter: default_log_filter(),
            tests: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keyexam")
            .join("config.toml")
    }

    pub fn idle_threshold(&self) -> Duration {
        Duration::from_secs(self.idle_threshold_secs)
    }

    /// Resolve a preset by name, custom presets first.
    pub fn find_test(&self, name: &str) -> Option<TestConfiguration> {
        presets::find_test(name, &self.tests)
    }

    /// Builtin and custom presets in menu order, custom entries replacing
    /// builtins of the same name.
    pub fn all_tests(&self) -> Vec<TestConfiguration> {
        let mut out: Vec<TestConfiguration> = presets::builtin_tests()
            .into_iter()
            .map(|builtin| {
                self.tests
                    .iter()
                    .find(|t| t.test_name.eq_ignore_ascii_case(&builtin.test_name))
                    .cloned()
                    .unwrap_or(builtin)
            })
            .collect();
        for custom in &self.tests {
            if !out.iter().any(|t| t.test_name.eq_ignore_ascii_case(&custom.test_name)) {
                out.push(custom.clone());
            }
        }
        out
    }

    /// Clamp values that would make a session unusable.
    pub fn validate(&mut self) {
        if self.idle_threshold_secs == 0 {
            self.idle_threshold_secs = default_idle_threshold_secs();
        }
        if self.log_filter.trim().is_empty() {
            self.log_filter = default_log_filter();
        }
        self.tests.retain(|t| t.time_limit > 0 && !t.test_name.trim().is_empty());
        if self.find_test(&self.default_test).is_none() {
            self.default_test = default_test();
        }
    }
}
