use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::QuizRecord;

/// Success body of `POST /api/generate-quiz`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizResponse {
    pub success: bool,
    #[serde(default)]
    pub quizzes: Vec<QuizRecord>,
    #[serde(default)]
    pub study_content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub gemini_configured: bool,
}

impl HealthResponse {
    pub fn ok(gemini_configured: bool) -> Self {
        Self {
            status: "OK".to_string(),
            timestamp: Utc::now(),
            gemini_configured,
        }
    }
}
