//! Certificate requests for qualified results.
//!
//! The session only produces a frozen [`TestResult`]; this module turns a
//! qualifying one into a request and talks to the certificate service.

pub mod client;
pub mod eligibility;

use serde::{Deserialize, Serialize};

use crate::error::CertificateError;
use crate::session::result::TestResult;

pub use client::{CertificateClient, HttpCertificateClient};
pub use eligibility::{Eligibility, REQUIRED_TESTS, check_eligibility};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub user_name: String,
    pub user_id: String,
    pub test_name: String,
    pub gross_speed: u32,
    pub net_speed: u32,
    pub accuracy: u32,
    pub mistakes: u32,
    pub time_taken: u64,
    pub total_words: usize,
    pub correct_words: usize,
    pub is_qualified: bool,
}

impl CertificateRequest {
    pub fn from_result(
        result: &TestResult,
        user_name: &str,
        user_id: &str,
    ) -> Result<Self, CertificateError> {
        if !result.is_qualified() {
            return Err(CertificateError::NotQualified);
        }
        if user_name.trim().is_empty() {
            return Err(CertificateError::MissingUser("user_name"));
        }
        if user_id.trim().is_empty() {
            return Err(CertificateError::MissingUser("user_id"));
        }

        let stats = &result.stats;
        Ok(Self {
            user_name: user_name.trim().to_string(),
            user_id: user_id.trim().to_string(),
            test_name: result.test_name.clone(),
            gross_speed: stats.gross_speed,
            net_speed: stats.net_speed,
            accuracy: stats.accuracy,
            mistakes: stats.mistakes,
            time_taken: stats.time_taken_secs,
            total_words: stats.total_words,
            correct_words: stats.correct_words,
            is_qualified: stats.is_qualified,
        })
    }
}

/// Issued certificate as returned by the generate endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub verification_code: String,
    #[serde(default)]
    pub issued_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub valid: bool,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub test_name: Option<String>,
    #[serde(default)]
    pub net_speed: Option<u32>,
    #[serde(default)]
    pub accuracy: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::metrics::{QualificationCriteria, TypingStats};
    use chrono::Utc;

    fn result(qualified: bool) -> TestResult {
        TestResult {
            test_name: "Clerk Typing Test".to_string(),
            passage_title: "Office Circular".to_string(),
            stats: TypingStats {
                gross_speed: 41,
                net_speed: 38,
                accuracy: 95,
                time_taken_secs: 600,
                is_qualified: qualified,
                ..TypingStats::default()
            },
            criteria: QualificationCriteria::default(),
            time_limit: 600,
            idle_secs: 0,
            timed_out: true,
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn test_unqualified_result_rejected() {
        let err = CertificateRequest::from_result(&result(false), "Asha", "u-1").unwrap_err();
        assert!(matches!(err, CertificateError::NotQualified));
    }

    #[test]
    fn test_missing_user_rejected() {
        let err = CertificateRequest::from_result(&result(true), " ", "u-1").unwrap_err();
        assert!(matches!(err, CertificateError::MissingUser("user_name")));
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let req = CertificateRequest::from_result(&result(true), "Asha", "u-1").unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["userName"], "Asha");
        assert_eq!(json["testName"], "Clerk Typing Test");
        assert_eq!(json["netSpeed"], 38);
        assert_eq!(json["timeTaken"], 600);
    }

    #[test]
    fn test_verification_tolerates_missing_fields() {
        let v: Verification = serde_json::from_str(r#"{"valid": false}"#).unwrap();
        assert!(!v.valid);
        assert!(v.user_name.is_none());
    }
}
