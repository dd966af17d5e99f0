use std::sync::Arc;

use crate::chat::ChatService;
use crate::config::AppConfig;

/// Shared application state passed to all handlers via Axum's State extractor.
pub struct AppState {
    pub config: AppConfig,
    pub chat: Arc<ChatService>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// State backed by the Vertex AI provider described in `config`.
    pub fn new(config: AppConfig) -> SharedState {
        let chat = ChatService::from_config(&config);
        Self::with_chat(config, chat)
    }

    /// State with an injected chat service (tests, alternative providers).
    pub fn with_chat(config: AppConfig, chat: Arc<ChatService>) -> SharedState {
        Arc::new(AppState { config, chat })
    }
}
