use std::future::{ready, Ready};

use actix_web::{http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use secrecy::ExposeSecret;

use crate::{app_state::AppState, errors::AppError};

/// Pulls the token out of an `Authorization: Bearer ...` header.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

// Extractor guarding quiz generation. Open when no access token is configured.
pub struct AuthorizedCaller;

impl FromRequest for AuthorizedCaller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn authorize(req: &HttpRequest) -> Result<AuthorizedCaller, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalError("Application state not configured".to_string()))?;

    let expected = match state.config.access_token.as_ref() {
        Some(token) => token,
        None => return Ok(AuthorizedCaller),
    };

    match bearer_token(req) {
        Some(token) if token == expected.expose_secret() => Ok(AuthorizedCaller),
        Some(_) => {
            log::warn!("Rejected request with an invalid bearer token");
            Err(AppError::Unauthorized("Invalid or expired token".to_string()))
        }
        None => Err(AppError::Unauthorized("Missing authorization header".to_string())),
    }
}
