use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/generate-quiz`. An omitted `quizCount` is filled in
/// from configuration by the service.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    #[serde(default)]
    #[validate(length(max = 100000, message = "Study content is too long"))]
    pub study_content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_count: Option<u32>,
}

impl GenerateQuizRequest {
    pub fn new(study_content: impl Into<String>, quiz_count: u32) -> Self {
        Self {
            study_content: study_content.into(),
            quiz_count: Some(quiz_count),
        }
    }

    pub fn has_content(&self) -> bool {
        !self.study_content.trim().is_empty()
    }
}
