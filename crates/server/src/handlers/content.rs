//! # Site Content Handlers
//!
//! Simple CRUD over the `site_content` table: public reads of
//! published entries, administrator upserts keyed on `(key, locale)`,
//! and administrator deletes.

use super::{AppError, AppState};
use crate::auth::middleware::AdminUser;
use axum::{
    extract::{Query, State},
    Json,
};
use ragsite::{types::NewSiteContent, Metadata, SiteContent};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
pub struct ContentQuery {
    pub section: Option<String>,
    pub key: Option<String>,
}

/// Handler for `GET /content`: published entries, optionally filtered
/// by section and/or key.
pub async fn list_content_handler(
    State(app_state): State<AppState>,
    Query(params): Query<ContentQuery>,
) -> Result<Json<Vec<SiteContent>>, AppError> {
    let entries = app_state
        .store
        .published_content(params.section.as_deref(), params.key.as_deref())
        .await?;
    Ok(Json(entries))
}

/// The request body for a content upsert.
#[derive(Deserialize)]
pub struct UpsertContentRequest {
    pub key: Option<String>,
    pub locale: Option<String>,
    pub section: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub metadata: Option<Metadata>,
    pub published: Option<bool>,
}

/// Handler for `POST /content`: create or update an entry. Admin only.
pub async fn upsert_content_handler(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<UpsertContentRequest>,
) -> Result<Json<SiteContent>, AppError> {
    let (Some(key), Some(section), Some(body)) = (payload.key, payload.section, payload.body)
    else {
        return Err(AppError::Validation(
            "Missing required fields: key, section, body".to_string(),
        ));
    };

    let entry = NewSiteContent {
        key,
        locale: payload.locale.unwrap_or_else(|| "tr".to_string()),
        section,
        title: payload.title,
        body,
        metadata: payload.metadata.unwrap_or_default(),
        published: payload.published.unwrap_or(true),
    };

    let stored = app_state.store.upsert_content(&entry).await?;
    Ok(Json(stored))
}

#[derive(Deserialize)]
pub struct DeleteContentQuery {
    pub id: Option<String>,
}

/// Handler for `DELETE /content?id=`: remove an entry by id. Admin only.
pub async fn delete_content_handler(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<DeleteContentQuery>,
) -> Result<Json<Value>, AppError> {
    let Some(id) = params.id.filter(|id| !id.is_empty()) else {
        return Err(AppError::Validation(
            "Missing required parameter: id".to_string(),
        ));
    };

    app_state.store.delete_content(&id).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Content {id} deleted"),
    })))
}
