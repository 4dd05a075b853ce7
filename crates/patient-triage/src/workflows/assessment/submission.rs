use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::AlertLists;

/// Grading endpoint that receives the alert lists.
#[async_trait]
pub trait AssessmentSubmitter: Send + Sync {
    async fn submit(&self, alerts: &AlertLists) -> Result<SubmissionResponse, SubmissionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("submission endpoint unreachable: {0}")]
    Transport(String),
    #[error("invalid submission response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<SubmissionResults>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResults {
    pub score: f64,
    pub percentage: f64,
    pub status: String,
    pub breakdown: SubmissionBreakdown,
    pub feedback: SubmissionFeedback,
    pub attempt_number: u32,
    pub remaining_attempts: u32,
    pub is_personal_best: bool,
    pub can_resubmit: bool,
}

impl SubmissionResults {
    /// Sum of the per-category maxima.
    pub fn max_score(&self) -> f64 {
        self.breakdown.high_risk.max + self.breakdown.fever.max + self.breakdown.data_quality.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionBreakdown {
    pub high_risk: CategoryScore,
    pub fever: CategoryScore,
    pub data_quality: CategoryScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: f64,
    pub max: f64,
    pub correct: u32,
    pub submitted: u32,
    pub matches: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubmissionFeedback {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub issues: Vec<String>,
}
