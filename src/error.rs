use thiserror::Error;

#[derive(Debug, Error)]
pub enum PassageError {
    #[error("no passages for category `{0}`")]
    Unavailable(String),
    #[error("passage request failed: {0}")]
    Request(String),
    #[error("passage service returned status {0}")]
    Status(u16),
    #[error("malformed passage payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("network support disabled")]
    Offline,
}

#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("result does not meet the qualification criteria")]
    NotQualified,
    #[error("{completed} of {required} tests completed")]
    NotEligible { completed: usize, required: usize },
    #[error("missing user details: {0}")]
    MissingUser(&'static str),
    #[error("certificate request failed: {0}")]
    Request(String),
    #[error("certificate service returned status {0}")]
    Status(u16),
    #[error("unknown certificate code `{0}`")]
    UnknownCode(String),
    #[error("network support disabled")]
    Offline,
    #[error("could not save certificate: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no data directory available")]
    NoDataDir,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(feature = "network")]
impl From<reqwest::Error> for PassageError {
    fn from(err: reqwest::Error) -> Self {
        PassageError::Request(err.to_string())
    }
}

#[cfg(feature = "network")]
impl From<reqwest::Error> for CertificateError {
    fn from(err: reqwest::Error) -> Self {
        CertificateError::Request(err.to_string())
    }
}
