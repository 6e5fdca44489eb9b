use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;

use study_quiz::{
    app_state::AppState,
    config::Config,
    handlers::{generate_quiz, health_check, json_config},
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    if std::env::var("APP_ENV").map(|v| v == "production").unwrap_or(false) {
        config.validate_for_production();
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    info!("Quiz model: {}", config.gemini_model);
    info!("Gemini API key configured: {}", config.gemini_configured());
    if config.access_token.is_some() {
        info!("Quiz generation requires a bearer token");
    }

    let state = web::Data::new(AppState::new(config));

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(json_config())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .service(generate_quiz)
            .service(health_check)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
