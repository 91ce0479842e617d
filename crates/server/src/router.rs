use super::{handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/ingest", post(handlers::ingest_handler))
        .route("/chat", post(handlers::chat_handler))
        .route(
            "/content",
            get(handlers::list_content_handler)
                .post(handlers::upsert_content_handler)
                .delete(handlers::delete_content_handler),
        )
        .route("/leads", post(handlers::lead_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
