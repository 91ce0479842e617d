//! # Application State
//!
//! The shared application state and the logic for building it at
//! startup. All external-service clients are constructed here, once,
//! and handed to the handlers by dependency injection; nothing is
//! lazily initialized behind a global.

use crate::config::AppConfig;
use ragsite::{
    providers::ai::openai::OpenAiChatProvider, ChatProvider, EmbeddingProvider, IdentityProvider,
    PostgrestProvider,
};
use std::sync::Arc;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded at startup.
    pub config: Arc<AppConfig>,
    /// Gateway to the hosted knowledge store.
    pub store: Arc<PostgrestProvider>,
    /// Client for the embeddings endpoint (one model per deployment).
    pub embedder: Arc<EmbeddingProvider>,
    /// The chat-completion provider used for grounded, streamed answers.
    pub chat_provider: Box<dyn ChatProvider>,
    /// Client for the external identity service.
    pub identity: Arc<IdentityProvider>,
    /// Plain HTTP client for one-off outbound calls (lead forwarding).
    pub http: reqwest::Client,
}

/// Builds the shared application state from the configuration.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let store = Arc::new(PostgrestProvider::new(
        config.store.api_url.clone(),
        config.store.service_role_key.clone(),
    )?);

    let embedder = Arc::new(EmbeddingProvider::new(
        config.embedding.api_url.clone(),
        config.embedding.model_name.clone(),
        config.embedding.api_key.clone(),
    )?);

    let chat_provider: Box<dyn ChatProvider> = Box::new(OpenAiChatProvider::new(
        config.chat.api_url.clone(),
        config.chat.model_name.clone(),
        config.chat.api_key.clone(),
    )?);

    let identity = Arc::new(IdentityProvider::new(
        config.identity.api_url.clone(),
        config.identity.api_key.clone(),
    )?);

    Ok(AppState {
        config: Arc::new(config),
        store,
        embedder,
        chat_provider,
        identity,
        http: reqwest::Client::new(),
    })
}
