use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed classification of everything that can go wrong between the study
/// text and a playable quiz. The kind is decided where the failure is
/// detected and never rewritten further up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuizErrorKind {
    InvalidInput,
    AuthFailure,
    RateLimited,
    Timeout,
    EmptyResponse,
    MalformedResponse,
    UnexpectedShape,
    ApiError,
    CreationFailure,
}

/// Which family of user-facing copy a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Creation,
    Api,
}

impl QuizErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QuizErrorKind::InvalidInput
            | QuizErrorKind::EmptyResponse
            | QuizErrorKind::MalformedResponse
            | QuizErrorKind::UnexpectedShape
            | QuizErrorKind::CreationFailure => ErrorCategory::Creation,
            QuizErrorKind::AuthFailure
            | QuizErrorKind::RateLimited
            | QuizErrorKind::Timeout
            | QuizErrorKind::ApiError => ErrorCategory::Api,
        }
    }

    /// Value of the `errorType` field in backend error bodies.
    pub fn error_type(&self) -> &'static str {
        match self {
            QuizErrorKind::InvalidInput => "invalid_input",
            QuizErrorKind::RateLimited => "rate_limited",
            kind if kind.category() == ErrorCategory::Creation => "creation_failed",
            _ => "api_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct QuizError {
    pub kind: QuizErrorKind,
    pub message: String,
    /// Parser-stage kind behind a `CreationFailure`.
    pub cause: Option<QuizErrorKind>,
}

impl QuizError {
    pub fn new(kind: QuizErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(QuizErrorKind::InvalidInput, message)
    }

    pub fn auth_failure(message: impl Into<String>) -> Self {
        Self::new(QuizErrorKind::AuthFailure, message)
    }

    pub fn api_error(message: impl Into<String>) -> Self {
        Self::new(QuizErrorKind::ApiError, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(QuizErrorKind::MalformedResponse, message)
    }

    pub fn unexpected_shape(message: impl Into<String>) -> Self {
        Self::new(QuizErrorKind::UnexpectedShape, message)
    }

    pub fn creation_failure(message: impl Into<String>) -> Self {
        Self::new(QuizErrorKind::CreationFailure, message)
    }

    /// Wraps a parser failure so callers can tell "the network worked but
    /// the content was unusable" apart from transport problems.
    pub fn from_parse_failure(err: QuizError) -> Self {
        Self {
            kind: QuizErrorKind::CreationFailure,
            message: err.message,
            cause: Some(err.kind),
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        self.kind == QuizErrorKind::AuthFailure
    }

    /// Single line shown to the end user, prefixed by category.
    pub fn user_message(&self) -> String {
        let prefix = match self.kind.category() {
            ErrorCategory::Creation => "[Creation Error]",
            ErrorCategory::Api => "[API Error]",
        };
        format!("{} {}", prefix, self.user_copy())
    }

    fn user_copy(&self) -> &str {
        match self.kind {
            QuizErrorKind::InvalidInput => self.message.as_str(),
            QuizErrorKind::AuthFailure => {
                "The API key or token was rejected. Set a valid credential and try again."
            }
            QuizErrorKind::RateLimited => {
                "The API usage limit was reached. Wait a while before trying again."
            }
            QuizErrorKind::Timeout => "The request timed out. Please try again.",
            QuizErrorKind::EmptyResponse => {
                "The AI returned an empty answer. Change the study text and try again."
            }
            QuizErrorKind::MalformedResponse
            | QuizErrorKind::UnexpectedShape
            | QuizErrorKind::CreationFailure => {
                "Could not build a quiz from this text. Change the study text or request fewer questions."
            }
            QuizErrorKind::ApiError => {
                "The AI service reported an error. Please try again later."
            }
        }
    }
}

pub type QuizResult<T> = Result<T, QuizError>;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Quiz generation failed: {0}")]
    Generation(#[from] QuizError),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Generation(_) => "GENERATION_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(
        rename = "errorType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Generation(err) => match err.kind {
                QuizErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                QuizErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(message) | AppError::Unauthorized(message) => {
                ErrorResponse {
                    error: message.clone(),
                    details: None,
                    error_type: None,
                    code: Some(self.error_code().to_string()),
                }
            }
            AppError::Generation(err) if err.kind == QuizErrorKind::InvalidInput => ErrorResponse {
                error: err.message.clone(),
                details: None,
                error_type: Some(err.kind.error_type().to_string()),
                code: Some(self.error_code().to_string()),
            },
            AppError::Generation(err) => ErrorResponse {
                error: "Failed to generate quiz".to_string(),
                details: Some(err.message.clone()),
                error_type: Some(err.kind.error_type().to_string()),
                code: Some(self.error_code().to_string()),
            },
            AppError::InternalError(message) => ErrorResponse {
                error: "Internal server error".to_string(),
                details: Some(message.clone()),
                error_type: None,
                code: Some(self.error_code().to_string()),
            },
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
