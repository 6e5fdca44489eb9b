use std::{env, time::Duration};
use secrecy::SecretString;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_QUIZ_COUNT: u32 = 5;
pub const MAX_QUIZ_COUNT: u32 = 20;

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub gemini_api_key: Option<SecretString>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub request_timeout_secs: u64,
    pub default_quiz_count: u32,
    pub max_quiz_count: u32,
    /// When set, `/api/generate-quiz` requires this bearer token.
    pub access_token: Option<SecretString>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("PORT")
                .or_else(|_| env::var("WEB_SERVER_PORT"))
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            gemini_api_key: non_empty_var("GEMINI_API_KEY").map(SecretString::from),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_base: env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            default_quiz_count: env::var("DEFAULT_QUIZ_COUNT")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(DEFAULT_QUIZ_COUNT),
            max_quiz_count: env::var("MAX_QUIZ_COUNT")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(MAX_QUIZ_COUNT),
            access_token: non_empty_var("QUIZ_ACCESS_TOKEN").map(SecretString::from),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn gemini_configured(&self) -> bool {
        self.gemini_api_key.is_some()
    }

    /// Validate that production-critical configuration is set
    /// Panics if the provider key is missing or the limits are unusable
    pub fn validate_for_production(&self) {
        if self.gemini_api_key.is_none() {
            panic!(
                "FATAL: GEMINI_API_KEY is not set! Set GEMINI_API_KEY environment variable before serving quizzes."
            );
        }

        if self.default_quiz_count == 0 || self.default_quiz_count > self.max_quiz_count {
            panic!(
                "FATAL: DEFAULT_QUIZ_COUNT ({}) must be between 1 and MAX_QUIZ_COUNT ({}).",
                self.default_quiz_count, self.max_quiz_count
            );
        }

        if self.request_timeout_secs == 0 {
            panic!("FATAL: REQUEST_TIMEOUT_SECS must be greater than zero.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 3000,
            gemini_api_key: Some(SecretString::from("test-gemini-key".to_string())),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_base: "http://provider.test".to_string(),
            request_timeout_secs: 30,
            default_quiz_count: DEFAULT_QUIZ_COUNT,
            max_quiz_count: MAX_QUIZ_COUNT,
            access_token: None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
