use std::time::Duration;

use tracing::{debug, warn};

use crate::error::PassageError;
use crate::passage::cache::DiskCache;
use crate::passage::{Passage, PassageSource};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Passage API client: `GET {base}/passages/test/{category}`.
///
/// Successful non-empty responses are written through to the disk cache so
/// a later offline run can fall back to them.
pub struct HttpPassageSource {
    base_url: String,
    cache: Option<DiskCache>,
    timeout: Duration,
}

impl HttpPassageSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: None,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_cache(mut self, cache: DiskCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url_for(&self, category: &str) -> String {
        format!("{}/passages/test/{}", self.base_url, category)
    }
}

impl PassageSource for HttpPassageSource {
    fn fetch(&self, category: &str) -> Result<Vec<Passage>, PassageError> {
        let url = self.url_for(category);
        let passages = fetch_passages(&url, self.timeout).inspect_err(|err| {
            warn!(%url, error = %err, "passage fetch failed");
        })?;
        debug!(%url, count = passages.len(), "passage fetch ok");

        if let Some(cache) = &self.cache {
            if !passages.is_empty() {
                cache.put(category, &passages);
            }
        }
        Ok(passages)
    }
}

#[cfg(feature = "network")]
fn fetch_passages(url: &str, timeout: Duration) -> Result<Vec<Passage>, PassageError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(PassageError::Status(status.as_u16()));
    }
    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(not(feature = "network"))]
fn fetch_passages(_url: &str, _timeout: Duration) -> Result<Vec<Passage>, PassageError> {
    Err(PassageError::Offline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_trims_trailing_slash() {
        let source = HttpPassageSource::new("https://api.example.com/");
        assert_eq!(
            source.url_for("data-entry"),
            "https://api.example.com/passages/test/data-entry"
        );
    }

    #[test]
    fn test_unreachable_server_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::with_base_dir(dir.path().to_path_buf()).unwrap();
        let source = HttpPassageSource::new("http://127.0.0.1:9")
            .with_cache(cache.clone())
            .with_timeout(Duration::from_millis(500));
        assert!(source.fetch("general").is_err());
        assert!(cache.get("general").is_none());
    }
}
