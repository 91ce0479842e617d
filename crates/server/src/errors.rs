use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ragsite::RagError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// Handlers return this at their boundary; it converts each failure
/// into the appropriate HTTP response, logging diagnostic detail
/// server-side while relaying the provider message to the caller.
pub enum AppError {
    /// Malformed or missing required input, caught before any external
    /// call.
    Validation(String),
    /// Errors originating from the `ragsite` core (providers, store,
    /// pipeline).
    Rag(RagError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<RagError> for AppError {
    fn from(err: RagError) -> Self {
        AppError::Rag(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Rag(err) => {
                error!("RagError: {:?}", err);
                match err {
                    RagError::EmptyContent => {
                        (StatusCode::BAD_REQUEST, err.to_string())
                    }
                    RagError::IdentityApi { .. } => (
                        StatusCode::UNAUTHORIZED,
                        "Invalid or expired token.".to_string(),
                    ),
                    RagError::EmbeddingRequest(e) | RagError::ChatRequest(e)
                    | RagError::ChatStream(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Request to AI provider failed: {e}"),
                    ),
                    RagError::EmbeddingDeserialization(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Failed to deserialize AI provider response: {e}"),
                    ),
                    RagError::EmbeddingApi(e) | RagError::ChatApi(e) => {
                        (StatusCode::BAD_GATEWAY, format!("AI provider error: {e}"))
                    }
                    RagError::EmbeddingCountMismatch { .. } => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Partial failure in embedding generation".to_string(),
                    ),
                    RagError::StoreRequest(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Knowledge store request failed: {e}"),
                    ),
                    RagError::StoreApi { status, message } => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Knowledge store error ({status}): {message}"),
                    ),
                    RagError::StoreDeserialization(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to deserialize knowledge store response: {e}"),
                    ),
                    RagError::IdentityRequest(e) | RagError::IdentityDeserialization(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Identity provider request failed: {e}"),
                    ),
                    RagError::ReqwestClientBuild(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to build HTTP client: {e}"),
                    ),
                }
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
