use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::{
    config::Config,
    credentials::{CredentialKind, CredentialStore, MemoryCredentialStore},
    services::{
        gateway::{GatewayTarget, ModelTransport, QuizGateway, ReqwestTransport},
        quiz_service::QuizService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub credentials: Arc<dyn CredentialStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Builds the state around any transport; the server uses reqwest.
    pub fn with_transport(config: Config, transport: Arc<dyn ModelTransport>) -> Self {
        let credentials: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
        if let Some(key) = config.gemini_api_key.as_ref() {
            if let Err(e) = credentials.set(CredentialKind::ApiKey, key.expose_secret()) {
                log::error!("Failed to load provider key: {}", e);
            }
        } else {
            log::warn!("GEMINI_API_KEY is not set; quiz generation will fail");
        }

        let target = GatewayTarget::Provider {
            base_url: config.gemini_api_base.clone(),
            model: config.gemini_model.clone(),
        };
        let gateway = QuizGateway::new(transport, target).with_timeout(config.request_timeout());
        let quiz_service = Arc::new(
            QuizService::new(gateway, credentials.clone())
                .with_quiz_counts(config.default_quiz_count, config.max_quiz_count),
        );

        Self {
            quiz_service,
            credentials,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::gateway::MockModelTransport;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn seeds_provider_key_from_config() {
        let state = AppState::with_transport(Config::test_config(), Arc::new(MockModelTransport::new()));
        assert_eq!(
            state.credentials.get(CredentialKind::ApiKey).unwrap().expose_secret(),
            "test-gemini-key"
        );
        assert_eq!(state.credentials.generation_count(), 0);
    }

    #[test]
    fn missing_key_leaves_store_empty() {
        let config = Config {
            gemini_api_key: None,
            ..Config::test_config()
        };
        let state = AppState::with_transport(config, Arc::new(MockModelTransport::new()));
        assert!(state.credentials.get(CredentialKind::ApiKey).is_none());
    }
}
