use std::sync::Arc;

use actix_web::{test, web, App};
use async_trait::async_trait;
use rand::{rngs::StdRng, SeedableRng};

use study_quiz::{
    app_state::AppState,
    config::{Config, DEFAULT_GEMINI_MODEL},
    errors::ErrorResponse,
    handlers::{generate_quiz, health_check, json_config},
    models::{
        domain::{OptionLabel, QuizSet},
        dto::response::GenerateQuizResponse,
    },
    services::{
        gateway::{ModelTransport, TransportError, TransportRequest, TransportResponse},
        prompt_builder::build_quiz_prompt,
        response_parser::parse_quiz_response,
    },
    session::{QuizSession, ResultBand, SessionPhase},
};

const SKY_REPLY: &str = "```json\n{\"quizzes\":[{\"id\":1,\"question\":\"What color is the sky?\",\"options\":{\"A\":\"Red\",\"B\":\"Blue\",\"C\":\"Green\",\"D\":\"Yellow\"},\"correctAnswer\":\"B\",\"explanation\":\"Stated directly.\",\"optionExplanations\":{\"A\":\"Wrong.\",\"B\":\"Correct.\",\"C\":\"Wrong.\",\"D\":\"Wrong.\"}}]}\n```";

/// Provider stand-in that always returns the same generated text.
struct CannedProvider {
    text: String,
}

#[async_trait]
impl ModelTransport for CannedProvider {
    async fn post_json(&self, _request: TransportRequest) -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse {
            status: 200,
            body: serde_json::json!({ "candidates": [{ "content": { "parts": [{ "text": self.text }] } }] })
                .to_string(),
        })
    }
}

fn test_config() -> Config {
    Config {
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 0,
        gemini_api_key: Some("integration-key".to_string().into()),
        gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
        gemini_api_base: "http://provider.test".to_string(),
        request_timeout_secs: 5,
        default_quiz_count: 5,
        max_quiz_count: 20,
        access_token: None,
    }
}

fn canned_state(text: &str) -> AppState {
    AppState::with_transport(
        test_config(),
        Arc::new(CannedProvider {
            text: text.to_string(),
        }),
    )
}

#[::core::prelude::v1::test]
fn sky_scenario_end_to_end() {
    let prompt = build_quiz_prompt("The sky is blue.", 1);
    assert!(prompt.contains("The sky is blue."));
    for key in ["quizzes", "options", "correctAnswer"] {
        assert!(prompt.contains(key), "prompt is missing {}", key);
    }

    let quiz_set = parse_quiz_response(SKY_REPLY).unwrap();
    assert_eq!(quiz_set.len(), 1);
    assert_eq!(quiz_set.get(0).unwrap().correct_answer, OptionLabel::B);

    let mut session = QuizSession::with_rng(StdRng::seed_from_u64(2024));
    session.seed(quiz_set).unwrap();

    let display = session.display_mapping().unwrap().display_for(OptionLabel::B);
    assert!(session.select(display));
    let feedback = session.submit().unwrap();

    assert!(feedback.is_correct);
    assert_eq!(session.score(), 1);
    assert!(session.is_answered());

    assert!(session.advance());
    assert_eq!(session.phase(), SessionPhase::Finished);
    let summary = session.result_summary().unwrap();
    assert_eq!(summary.band, ResultBand::Perfect);
    assert_eq!(summary.percentage, 100.0);
}

#[actix_web::test]
async fn backend_response_seeds_a_session() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(canned_state(SKY_REPLY)))
            .app_data(json_config())
            .service(generate_quiz)
            .service(health_check),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/generate-quiz")
        .set_json(serde_json::json!({ "studyContent": "The sky is blue.", "quizCount": 1 }))
        .to_request();
    let body: GenerateQuizResponse = test::call_and_read_body_json(&app, req).await;
    assert!(body.success);

    let mut session = QuizSession::with_rng(StdRng::seed_from_u64(5));
    session.seed(QuizSet::new(body.quizzes)).unwrap();
    let view = session.current_question().unwrap();
    assert_eq!(view.question, "What color is the sky?");
    assert!(view.options.iter().any(|o| o.text == "Blue"));
}

#[actix_web::test]
async fn backend_reports_unusable_reply_as_creation_failure() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(canned_state("Sorry, I can only chat.")))
            .app_data(json_config())
            .service(generate_quiz),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/generate-quiz")
        .set_json(serde_json::json!({ "studyContent": "notes", "quizCount": 2 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 500);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "Failed to generate quiz");
    assert_eq!(body.error_type.as_deref(), Some("creation_failed"));
}

#[actix_web::test]
async fn backend_rejects_empty_study_content() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(canned_state(SKY_REPLY)))
            .app_data(json_config())
            .service(generate_quiz),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/generate-quiz")
        .set_json(serde_json::json!({ "studyContent": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn health_reports_configuration() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(canned_state(SKY_REPLY)))
            .service(health_check),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["geminiConfigured"], true);
}
