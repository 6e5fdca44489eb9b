use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    credentials::{CredentialKind, CredentialStore},
    errors::{ErrorResponse, QuizError, QuizErrorKind, QuizResult},
    models::{
        domain::QuizSet,
        dto::{
            gemini::{GenerateContentRequest, GenerateContentResponse},
            request::GenerateQuizRequest,
            response::GenerateQuizResponse,
        },
    },
    services::{prompt_builder::build_quiz_prompt, response_parser::parse_quiz_response},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// One outbound JSON POST.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

impl TransportRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Could not reach {0}")]
    Connect(String),
    #[error("Request failed: {0}")]
    Request(String),
}

/// The network seam of the gateway.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn post_json(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ModelTransport for ReqwestTransport {
    async fn post_json(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                TransportError::Connect(
                    e.url()
                        .and_then(|u| u.host_str())
                        .unwrap_or("server")
                        .to_string(),
                )
            } else {
                TransportError::Request(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}

/// Where generation requests go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayTarget {
    /// Direct call to Gemini `generateContent`.
    Provider { base_url: String, model: String },
    /// The local backend's `POST /api/generate-quiz`.
    Backend { base_url: String },
}

impl GatewayTarget {
    pub fn url(&self) -> String {
        match self {
            GatewayTarget::Provider { base_url, model } => format!(
                "{}/v1/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
            GatewayTarget::Backend { base_url } => {
                format!("{}/api/generate-quiz", base_url.trim_end_matches('/'))
            }
        }
    }
}

/// Error class for a non-2xx status from the provider.
pub fn classify_status(status: u16) -> QuizErrorKind {
    match status {
        400 => QuizErrorKind::InvalidInput,
        401 | 403 => QuizErrorKind::AuthFailure,
        429 => QuizErrorKind::RateLimited,
        _ => QuizErrorKind::ApiError,
    }
}

fn status_message(status: u16) -> String {
    match status {
        400 => "The request was rejected. Change the study text or request fewer questions.".to_string(),
        401 | 403 => "The API key is invalid. Set a valid API key.".to_string(),
        404 => "The configured Gemini model was not found. Update the model name.".to_string(),
        429 => "The API usage limit was reached. Wait before retrying.".to_string(),
        other => format!("The API returned an error (HTTP {})", other),
    }
}

pub struct QuizGateway {
    transport: Arc<dyn ModelTransport>,
    target: GatewayTarget,
    timeout: Duration,
}

impl QuizGateway {
    pub fn new(transport: Arc<dyn ModelTransport>, target: GatewayTarget) -> Self {
        Self {
            transport,
            target,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// One generation round trip. No retries; each failure is returned once
    /// with its classification.
    pub async fn generate(
        &self,
        study_text: &str,
        count: u32,
        credentials: &dyn CredentialStore,
    ) -> QuizResult<QuizSet> {
        let study_text = study_text.trim();
        if study_text.is_empty() {
            return Err(QuizError::invalid_input("Please enter some study content."));
        }
        let count = count.max(1);

        let request = self.build_request(study_text, count, credentials)?;
        log::info!(
            "Requesting {} quiz questions ({} chars of study text)",
            count,
            study_text.chars().count()
        );

        let response = match tokio::time::timeout(self.timeout, self.transport.post_json(request)).await {
            Err(_) => {
                log::warn!("Quiz generation timed out after {:?}", self.timeout);
                return Err(QuizError::new(
                    QuizErrorKind::Timeout,
                    format!("The request timed out after {:?}", self.timeout),
                ));
            }
            Ok(Err(e)) => {
                log::error!("Quiz generation transport failure: {}", e);
                return Err(QuizError::api_error(match e {
                    TransportError::Connect(_) => "Could not connect to the server.".to_string(),
                    TransportError::Request(_) => "The request could not be completed.".to_string(),
                }));
            }
            Ok(Ok(response)) => response,
        };

        let quiz_set = match self.target {
            GatewayTarget::Provider { .. } => read_provider_reply(response)?,
            GatewayTarget::Backend { .. } => read_backend_reply(response)?,
        };

        if quiz_set.is_empty() {
            return Err(QuizError::creation_failure("The AI did not produce any questions."));
        }

        log::info!("Generated {} quiz questions", quiz_set.len());
        Ok(quiz_set)
    }

    fn build_request(
        &self,
        study_text: &str,
        count: u32,
        credentials: &dyn CredentialStore,
    ) -> QuizResult<TransportRequest> {
        let mut headers = Vec::new();
        if let Some(token) = credentials.get(CredentialKind::BearerToken) {
            headers.push((
                "Authorization".to_string(),
                format!("Bearer {}", token.expose_secret()),
            ));
        }

        let body = match &self.target {
            GatewayTarget::Provider { .. } => {
                let api_key = credentials
                    .get(CredentialKind::ApiKey)
                    .ok_or_else(|| QuizError::auth_failure("The API key is not set."))?;
                headers.push((API_KEY_HEADER.to_string(), api_key.expose_secret().to_string()));

                let prompt = build_quiz_prompt(study_text, count);
                serde_json::to_value(GenerateContentRequest::from_prompt(prompt))
            }
            GatewayTarget::Backend { .. } => {
                serde_json::to_value(GenerateQuizRequest::new(study_text, count))
            }
        }
        .map_err(|e| QuizError::api_error(format!("Could not encode the request: {}", e)))?;

        Ok(TransportRequest {
            url: self.target.url(),
            headers,
            body,
        })
    }
}

fn decode_envelope<T: DeserializeOwned>(body: &str) -> QuizResult<T> {
    serde_json::from_str(body).map_err(|e| {
        log::error!("Unreadable response envelope: {}", e);
        QuizError::api_error("The server response could not be read.")
    })
}

fn read_provider_reply(response: TransportResponse) -> QuizResult<QuizSet> {
    if !(200..300).contains(&response.status) {
        log::warn!("Provider returned HTTP {}", response.status);
        return Err(QuizError::new(
            classify_status(response.status),
            status_message(response.status),
        ));
    }

    let envelope: GenerateContentResponse = decode_envelope(&response.body)?;
    let text = envelope.first_text().ok_or_else(|| {
        QuizError::new(
            QuizErrorKind::EmptyResponse,
            "The AI returned an empty answer. Change the study text and try again.",
        )
    })?;

    log::debug!("AI reply: {}", text);
    parse_quiz_response(text).map_err(QuizError::from_parse_failure)
}

fn read_backend_reply(response: TransportResponse) -> QuizResult<QuizSet> {
    if (200..300).contains(&response.status) {
        let reply: GenerateQuizResponse = decode_envelope(&response.body)?;
        if !reply.success {
            return Err(QuizError::creation_failure(
                "Quiz generation failed. Review the study text and try again.",
            ));
        }
        return Ok(QuizSet::new(reply.quizzes));
    }

    let error_body: Option<ErrorResponse> = serde_json::from_str(&response.body).ok();
    let error_type = error_body.as_ref().and_then(|b| b.error_type.as_deref());
    log::warn!(
        "Backend returned HTTP {} ({})",
        response.status,
        error_type.unwrap_or("no errorType")
    );

    let error = match (response.status, error_type) {
        (500, Some("creation_failed")) => QuizError::creation_failure(
            "Quiz creation failed. Change the study text or request fewer questions.",
        ),
        (500, Some("api_error")) => {
            QuizError::api_error("The AI API reported an error. Try again later.")
        }
        (500, _) => QuizError::api_error("The server reported an error. Try again later."),
        (400, _) => QuizError::invalid_input(
            error_body
                .map(|b| b.error)
                .unwrap_or_else(|| "The input was rejected.".to_string()),
        ),
        (status, _) => QuizError::new(classify_status(status), status_message(status)),
    };
    Err(error)
}
