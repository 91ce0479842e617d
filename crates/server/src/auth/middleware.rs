//! # Authentication Middleware
//!
//! The `AdminUser` extractor used by administrative routes. Token
//! validation is delegated to the external identity service; the role
//! check is a lookup in the store's `users` table. A handler that takes
//! an `AdminUser` argument can only run for a caller holding a valid
//! bearer token whose user has the `admin` role.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use ragsite::RagError;
use serde_json::json;
use tracing::{error, warn};

use crate::state::AppState;

/// The authenticated administrator extracted from the request.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: String,
}

/// A custom rejection type for authentication failures.
pub struct AuthError(StatusCode, String);

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer_header =
            Option::<TypedHeader<Authorization<Bearer>>>::from_request_parts(parts, state)
                .await
                .map_err(|e| {
                    warn!("Unexpected error during header extraction: {}", e);
                    AuthError(
                        StatusCode::BAD_REQUEST,
                        "Invalid Authorization header format.".to_string(),
                    )
                })?;

        let Some(TypedHeader(Authorization(bearer))) = bearer_header else {
            return Err(AuthError(
                StatusCode::UNAUTHORIZED,
                "Missing Authorization bearer token.".to_string(),
            ));
        };

        // Ask the identity service whose token this is. Session
        // handling lives entirely on its side.
        let user_id = state
            .identity
            .user_id_for_token(bearer.token())
            .await
            .map_err(|e| match e {
                RagError::IdentityApi { status, .. } => {
                    warn!("Identity provider rejected token (status {status})");
                    AuthError(
                        StatusCode::UNAUTHORIZED,
                        "Invalid or expired token.".to_string(),
                    )
                }
                other => {
                    error!("Failed to validate token: {other}");
                    AuthError(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Could not validate credentials.".to_string(),
                    )
                }
            })?;

        let role = state.store.user_role(&user_id).await.map_err(|e| {
            error!("Failed to look up role for user {user_id}: {e}");
            AuthError(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not retrieve user role.".to_string(),
            )
        })?;

        if role.as_deref() != Some("admin") {
            return Err(AuthError(
                StatusCode::FORBIDDEN,
                "Forbidden: administrator role required.".to_string(),
            ));
        }

        Ok(AdminUser { user_id })
    }
}
