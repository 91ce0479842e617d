//! # Ingestion Handler
//!
//! `POST /ingest`: chunk administrator-submitted text, embed the
//! chunks as one batch, and persist them to the knowledge store.
//! Re-submitting the same text appends duplicate chunks; the store is
//! an append-only knowledge base with no de-duplication.

use super::{AppError, AppState};
use crate::auth::middleware::AdminUser;
use axum::{extract::State, http::StatusCode, Json};
use ragsite::{ingest_text, IngestOptions, Metadata};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The request body for the `/ingest` endpoint.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    pub text: String,
    pub source: Option<String>,
    pub metadata: Option<Metadata>,
    pub chunk_size: Option<usize>,
    pub chunk_overlap: Option<usize>,
}

/// The response body for a successful ingestion.
#[derive(Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub count: usize,
    pub message: String,
}

/// The handler for the `/ingest` endpoint. Administrator only.
pub async fn ingest_handler(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<IngestRequest>,
) -> Result<(StatusCode, Json<IngestResponse>), AppError> {
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "Missing required field: text".to_string(),
        ));
    }

    let defaults = &app_state.config.ingest;
    let source = payload
        .source
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| defaults.default_source.clone());
    // A zero chunk size is meaningless and falls back to the default;
    // a zero overlap is a valid request.
    let chunk_size = payload
        .chunk_size
        .filter(|&n| n > 0)
        .unwrap_or(defaults.chunk_size);
    let chunk_overlap = payload.chunk_overlap.unwrap_or(defaults.chunk_overlap);

    let options = IngestOptions {
        source: source.clone(),
        metadata: payload.metadata.unwrap_or_default(),
        chunk_size,
        chunk_overlap,
    };

    let count = ingest_text(&app_state.store, &app_state.embedder, text, options).await?;

    info!(user_id = %admin.user_id, count, %source, "Ingestion complete");

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            success: true,
            count,
            message: format!("Successfully ingested {count} chunks from {source}"),
        }),
    ))
}
