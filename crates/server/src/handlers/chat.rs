//! # Retrieval/Chat Handler
//!
//! `POST /chat`: answer a query using only previously ingested chunks
//! as grounding context. The query is embedded, the nearest chunks are
//! fetched from the store, and the composed prompt is sent to the chat
//! provider with streaming enabled. Tokens are relayed to the caller
//! as they arrive; if the caller disconnects, dropping the response
//! body closes the upstream stream.
//!
//! Failures before the first token produce a JSON error. Once
//! streaming has begun, a provider failure terminates the stream
//! abruptly instead; there is no way to deliver a status code at that
//! point.

use super::{AppError, AppState};
use axum::{
    body::Body,
    extract::State,
    http::header,
    response::Response,
    Json,
};
use ragsite::prompts::{build_context, render_system_prompt, DEFAULT_RAG_SYSTEM_PROMPT};
use serde::Deserialize;
use tracing::info;

/// The request body for the `/chat` endpoint.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub query: String,
    pub match_count: Option<u32>,
    pub min_similarity: Option<f64>,
    pub filter_source: Option<String>,
    pub system_prompt: Option<String>,
}

/// The handler for the `/chat` endpoint. Public.
pub async fn chat_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Response, AppError> {
    let query = payload.query.trim().to_string();
    if query.is_empty() {
        return Err(AppError::Validation(
            "Missing required field: query".to_string(),
        ));
    }

    let defaults = &app_state.config.search;
    let match_count = payload
        .match_count
        .filter(|&n| n > 0)
        .unwrap_or(defaults.match_count);
    let min_similarity = payload.min_similarity.unwrap_or(defaults.min_similarity);

    let query_embedding = app_state.embedder.embed(&query).await?;

    let matches = app_state
        .store
        .match_documents(
            &query_embedding,
            match_count,
            min_similarity,
            payload.filter_source.as_deref(),
        )
        .await?;
    info!(matches = matches.len(), "Retrieved context for chat query");

    let context = build_context(&matches);
    let template = payload
        .system_prompt
        .or_else(|| app_state.config.chat.system_prompt.clone())
        .unwrap_or_else(|| DEFAULT_RAG_SYSTEM_PROMPT.to_string());
    let system_prompt = render_system_prompt(&template, &context);

    let token_stream = app_state
        .chat_provider
        .stream_chat(&system_prompt, &query)
        .await?;

    let response = Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache, no-transform")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(token_stream))
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(response)
}
