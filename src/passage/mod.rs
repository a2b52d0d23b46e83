pub mod builtin;
pub mod cache;
pub mod remote;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::PassageError;
use crate::session::test_config::TestConfiguration;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    #[serde(default, deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    pub content: String,
}

impl Passage {
    pub fn new(id: &str, title: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    pub fn custom(content: &str) -> Self {
        Self::new("custom", "Custom passage", content)
    }

    pub fn is_usable(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// The passage API returns numeric ids; cached and builtin passages use
/// strings.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

pub trait PassageSource {
    /// Ordered candidate passages for a test category.
    fn fetch(&self, category: &str) -> Result<Vec<Passage>, PassageError>;
}

/// Resolve the passages for a test.
///
/// A custom passage wins outright. Otherwise each source is tried in order
/// and the first non-empty list is used; failures are logged and skipped.
/// An empty result leaves the session unable to start.
pub fn load_passages(config: &TestConfiguration, sources: &[&dyn PassageSource]) -> Vec<Passage> {
    if let Some(text) = config.custom_passage.as_deref().filter(|_| config.has_custom_passage()) {
        return vec![Passage::custom(text)];
    }

    for source in sources {
        match source.fetch(&config.passage_category) {
            Ok(passages) => {
                let usable: Vec<Passage> =
                    passages.into_iter().filter(Passage::is_usable).collect();
                if !usable.is_empty() {
                    debug!(
                        category = %config.passage_category,
                        count = usable.len(),
                        "passages loaded"
                    );
                    return usable;
                }
            }
            Err(err) => {
                warn!(category = %config.passage_category, error = %err, "passage source failed");
            }
        }
    }

    warn!(category = %config.passage_category, "no passages available");
    Vec::new()
}
