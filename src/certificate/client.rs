use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::certificate::eligibility::{Eligibility, check_eligibility};
use crate::certificate::{Certificate, CertificateRequest, Verification};
use crate::error::CertificateError;
use crate::session::result::TestResult;
use crate::store::schema::HistoryData;

pub trait CertificateClient {
    fn generate(&self, request: &CertificateRequest) -> Result<Certificate, CertificateError>;
    fn verify(&self, code: &str) -> Result<Verification, CertificateError>;
    fn download(&self, certificate_id: &str) -> Result<Vec<u8>, CertificateError>;
}

/// Check eligibility, build the request and call the service.
pub fn request_certificate(
    client: &dyn CertificateClient,
    result: &TestResult,
    history: &HistoryData,
    user_name: &str,
    user_id: &str,
) -> Result<Certificate, CertificateError> {
    if let Eligibility::NeedsMoreTests { completed, required } = check_eligibility(history) {
        return Err(CertificateError::NotEligible { completed, required });
    }
    let request = CertificateRequest::from_result(result, user_name, user_id)?;
    let certificate = client.generate(&request)?;
    info!(id = %certificate.id, test = %request.test_name, "certificate issued");
    Ok(certificate)
}

/// Download a certificate document into `dir` as `<id>.pdf`.
pub fn save_certificate(
    client: &dyn CertificateClient,
    certificate_id: &str,
    dir: &Path,
) -> Result<PathBuf, CertificateError> {
    let bytes = client.download(certificate_id)?;
    fs::create_dir_all(dir)?;

    let file_stem: String = certificate_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let path = dir.join(format!("{file_stem}.pdf"));
    let tmp_path = path.with_extension("pdf.tmp");
    fs::write(&tmp_path, &bytes)?;
    fs::rename(&tmp_path, &path)?;

    info!(id = %certificate_id, path = %path.display(), size = bytes.len(), "certificate saved");
    Ok(path)
}

pub struct HttpCertificateClient {
    base_url: String,
    timeout: Duration,
}

impl HttpCertificateClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/certificates/{}", self.base_url, path)
    }

    #[cfg(feature = "network")]
    fn http(&self) -> Result<reqwest::blocking::Client, CertificateError> {
        Ok(reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?)
    }
}

#[cfg(feature = "network")]
impl CertificateClient for HttpCertificateClient {
    fn generate(&self, request: &CertificateRequest) -> Result<Certificate, CertificateError> {
        let url = self.url("generate");
        debug!(%url, test = %request.test_name, "requesting certificate");
        let response = self.http()?.post(&url).json(request).send()?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "certificate generation rejected");
            return Err(CertificateError::Status(status.as_u16()));
        }
        Ok(response.json()?)
    }

    fn verify(&self, code: &str) -> Result<Verification, CertificateError> {
        let url = self.url(&format!("verify/{code}"));
        let response = self.http()?.get(&url).send()?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CertificateError::UnknownCode(code.to_string()));
        }
        if !status.is_success() {
            return Err(CertificateError::Status(status.as_u16()));
        }
        Ok(response.json()?)
    }

    fn download(&self, certificate_id: &str) -> Result<Vec<u8>, CertificateError> {
        let url = self.url(&format!("download/{certificate_id}"));
        let response = self.http()?.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(CertificateError::Status(status.as_u16()));
        }
        let bytes = response.bytes()?;
        debug!(%url, size = bytes.len(), "certificate downloaded");
        Ok(bytes.to_vec())
    }
}

#[cfg(not(feature = "network"))]
impl CertificateClient for HttpCertificateClient {
    fn generate(&self, _request: &CertificateRequest) -> Result<Certificate, CertificateError> {
        Err(CertificateError::Offline)
    }

    fn verify(&self, _code: &str) -> Result<Verification, CertificateError> {
        Err(CertificateError::Offline)
    }

    fn download(&self, _certificate_id: &str) -> Result<Vec<u8>, CertificateError> {
        Err(CertificateError::Offline)
    }
}
