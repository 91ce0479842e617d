//! # Lead Capture Handler
//!
//! `POST /leads`: accept a marketing lead and forward it to the
//! configured webhook as a timestamped row. When no webhook is
//! configured the lead is logged and acknowledged anyway, so a
//! deployment without credentials never blocks the form.

use super::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

/// The request body for the `/leads` endpoint.
#[derive(Deserialize)]
pub struct LeadRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub source: Option<String>,
}

/// Handler for `POST /leads`. Public.
pub async fn lead_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<LeadRequest>,
) -> impl IntoResponse {
    let Some(email) = payload.email.filter(|e| !e.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Email is required" })),
        );
    };
    let name = payload.name.unwrap_or_else(|| "N/A".to_string());
    let source = payload.source.unwrap_or_else(|| "landing_page".to_string());

    let Some(leads_config) = &app_state.config.leads else {
        warn!("No leads webhook configured; lead recorded in logs only");
        info!(%email, %name, %source, "Lead captured (simulation)");
        return (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Lead logged (simulation)" })),
        );
    };

    let row = json!({
        "values": [[Utc::now().to_rfc3339(), name, email, source]],
    });

    let result = app_state
        .http
        .post(&leads_config.webhook_url)
        .json(&row)
        .send()
        .await;

    match result {
        Ok(response) if response.status().is_success() => {
            (StatusCode::OK, Json(json!({ "success": true })))
        }
        Ok(response) => {
            error!("Lead webhook returned status {}", response.status());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to process lead" })),
            )
        }
        Err(e) => {
            error!("Lead webhook request failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to process lead" })),
            )
        }
    }
}
