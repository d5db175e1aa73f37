use serde::{Deserialize, Serialize};
use crate::models::domain::{PullOutcome, WriteBackReport, NO_HIT_MESSAGE};

/// Response for the credit pull endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditPullResponse {
    /// One of: scored, no_hit, declined, bureau_error
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    /// Rendered report body (scored) or diagnostic text (other outcomes).
    pub message: String,
    #[serde(rename = "writeBack", skip_serializing_if = "Option::is_none")]
    pub write_back: Option<WriteBackReport>,
}

impl From<PullOutcome> for CreditPullResponse {
    fn from(outcome: PullOutcome) -> Self {
        match outcome {
            PullOutcome::Scored { score, report_markup, write_back } => Self {
                outcome: "scored".to_string(),
                score: Some(score),
                message: report_markup,
                write_back: Some(write_back),
            },
            PullOutcome::NoHit => Self {
                outcome: "no_hit".to_string(),
                score: None,
                message: NO_HIT_MESSAGE.to_string(),
                write_back: None,
            },
            PullOutcome::Declined { description } => Self {
                outcome: "declined".to_string(),
                score: None,
                message: description,
                write_back: None,
            },
            PullOutcome::BureauError { description } => Self {
                outcome: "bureau_error".to_string(),
                score: None,
                message: format!("Error Pulling Credit: {}", description),
                write_back: None,
            },
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
