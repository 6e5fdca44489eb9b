use actix_web::{get, post, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthorizedCaller,
    errors::AppError,
    middleware::get_request_id,
    models::dto::{request::GenerateQuizRequest, response::HealthResponse},
};

pub const JSON_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Body limit plus a JSON error shape for unreadable payloads.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| {
            log::warn!("Rejected request body: {}", err);
            AppError::ValidationError(format!("Invalid request body: {}", err)).into()
        })
}

#[post("/api/generate-quiz")]
async fn generate_quiz(
    req: HttpRequest,
    state: web::Data<AppState>,
    _caller: AuthorizedCaller,
    request: web::Json<GenerateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "Generating quiz [{}]",
        get_request_id(&req).unwrap_or_else(|| "-".to_string())
    );
    let response = state.quiz_service.generate_quiz(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/health")]
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::ok(state.config.gemini_configured()))
}
