use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    config::{DEFAULT_QUIZ_COUNT, MAX_QUIZ_COUNT},
    credentials::CredentialStore,
    errors::{AppError, AppResult},
    models::dto::{request::GenerateQuizRequest, response::GenerateQuizResponse},
    services::gateway::QuizGateway,
};

/// Server side of `POST /api/generate-quiz`: validates the request, runs
/// one provider round trip and wraps the quizzes for the client.
pub struct QuizService {
    gateway: QuizGateway,
    credentials: Arc<dyn CredentialStore>,
    default_count: u32,
    max_count: u32,
}

impl QuizService {
    pub fn new(gateway: QuizGateway, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            gateway,
            credentials,
            default_count: DEFAULT_QUIZ_COUNT,
            max_count: MAX_QUIZ_COUNT,
        }
    }

    /// Count used when a request omits `quizCount`, and the largest count
    /// accepted.
    pub fn with_quiz_counts(mut self, default_count: u32, max_count: u32) -> Self {
        self.default_count = default_count;
        self.max_count = max_count;
        self
    }

    fn resolve_count(&self, requested: Option<u32>) -> AppResult<u32> {
        let count = requested.unwrap_or(self.default_count);
        if count == 0 || count > self.max_count {
            return Err(AppError::ValidationError(format!(
                "quizCount must be between 1 and {}",
                self.max_count
            )));
        }
        Ok(count)
    }

    pub async fn generate_quiz(&self, request: GenerateQuizRequest) -> AppResult<GenerateQuizResponse> {
        if !request.has_content() {
            return Err(AppError::ValidationError(
                "Study content is required".to_string(),
            ));
        }
        request.validate()?;
        let count = self.resolve_count(request.quiz_count)?;

        log::info!("Quiz generation request: {} questions", count);

        let quiz_set = self
            .gateway
            .generate(&request.study_content, count, self.credentials.as_ref())
            .await
            .map_err(|e| {
                log::error!("Quiz generation failed ({:?}): {}", e.kind, e.message);
                AppError::Generation(e)
            })?;

        if let Err(e) = self.credentials.record_generation() {
            log::warn!("Could not record generation count: {}", e);
        }

        Ok(GenerateQuizResponse {
            success: true,
            quizzes: quiz_set.into_records(),
            study_content: request.study_content,
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        credentials::MemoryCredentialStore,
        errors::QuizErrorKind,
        services::gateway::{GatewayTarget, MockModelTransport, TransportRequest, TransportResponse},
        test_utils::fixtures::{gemini_envelope, sky_reply_json},
    };

    fn service_with(transport: MockModelTransport, store: Arc<MemoryCredentialStore>) -> QuizService {
        let gateway = QuizGateway::new(
            Arc::new(transport),
            GatewayTarget::Provider {
                base_url: "http://provider.test".to_string(),
                model: "gemini-2.5-flash".to_string(),
            },
        );
        QuizService::new(gateway, store)
    }

    #[tokio::test]
    async fn generate_quiz_wraps_records() {
        let mut transport = MockModelTransport::new();
        transport.expect_post_json().times(1).returning(|_| {
            Ok(TransportResponse {
                status: 200,
                body: gemini_envelope(&sky_reply_json()),
            })
        });
        let store = Arc::new(MemoryCredentialStore::with_api_key("key"));
        let service = service_with(transport, store.clone());

        let response = service
            .generate_quiz(GenerateQuizRequest::new("The sky is blue.", 1))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.quizzes.len(), 1);
        assert_eq!(response.study_content, "The sky is blue.");
        assert_eq!(store.generation_count(), 1);
    }

    #[tokio::test]
    async fn empty_content_is_rejected_without_network() {
        let mut transport = MockModelTransport::new();
        transport.expect_post_json().never();
        let service = service_with(transport, Arc::new(MemoryCredentialStore::with_api_key("key")));

        let err = service
            .generate_quiz(GenerateQuizRequest::new("  ", 3))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn count_out_of_range_is_rejected() {
        let mut transport = MockModelTransport::new();
        transport.expect_post_json().never();
        let service = service_with(transport, Arc::new(MemoryCredentialStore::with_api_key("key")));

        let err = service
            .generate_quiz(GenerateQuizRequest::new("text", 50))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    fn prompt_of(request: &TransportRequest) -> String {
        request.body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn omitted_count_uses_configured_default() {
        let mut transport = MockModelTransport::new();
        transport
            .expect_post_json()
            .withf(|request| {
                let prompt = prompt_of(request);
                prompt.contains("create 2 multiple") && !prompt.contains("create 5 multiple")
            })
            .times(1)
            .returning(|_| {
                Ok(TransportResponse {
                    status: 200,
                    body: gemini_envelope(&sky_reply_json()),
                })
            });
        let service = service_with(transport, Arc::new(MemoryCredentialStore::with_api_key("key")))
            .with_quiz_counts(2, 30);

        let request: GenerateQuizRequest =
            serde_json::from_str(r#"{"studyContent": "The sky is blue."}"#).unwrap();
        assert!(service.generate_quiz(request).await.is_ok());
    }

    #[tokio::test]
    async fn configured_max_count_is_honoured() {
        let mut transport = MockModelTransport::new();
        transport
            .expect_post_json()
            .withf(|request| prompt_of(request).contains("create 25 multiple"))
            .times(1)
            .returning(|_| {
                Ok(TransportResponse {
                    status: 200,
                    body: gemini_envelope(&sky_reply_json()),
                })
            });
        let service = service_with(transport, Arc::new(MemoryCredentialStore::with_api_key("key")))
            .with_quiz_counts(2, 30);

        assert!(service
            .generate_quiz(GenerateQuizRequest::new("text", 25))
            .await
            .is_ok());

        let err = service
            .generate_quiz(GenerateQuizRequest::new("text", 31))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref m) if m.contains("30")));
    }

    #[tokio::test]
    async fn zero_count_is_rejected() {
        let mut transport = MockModelTransport::new();
        transport.expect_post_json().never();
        let service = service_with(transport, Arc::new(MemoryCredentialStore::with_api_key("key")));

        let err = service
            .generate_quiz(GenerateQuizRequest::new("text", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn provider_failure_keeps_its_kind() {
        let mut transport = MockModelTransport::new();
        transport.expect_post_json().returning(|_| {
            Ok(TransportResponse {
                status: 503,
                body: String::new(),
            })
        });
        let store = Arc::new(MemoryCredentialStore::with_api_key("key"));
        let service = service_with(transport, store.clone());

        let err = service
            .generate_quiz(GenerateQuizRequest::new("text", 2))
            .await
            .unwrap_err();
        match err {
            AppError::Generation(e) => assert_eq!(e.kind, QuizErrorKind::ApiError),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.generation_count(), 0);
    }
}
