pub mod insight_task;
pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    routing::get,
    Router,
};
use rest::{
    catalog_handler, clear_insight_handler, create_session_handler, dashboard_handler,
    get_insight_handler, list_sessions_handler, request_insight_handler,
};
use state::AppState;
use std::sync::Arc;

/// Builds the API routes. Layers such as CORS are added by the binary.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sessions", get(list_sessions_handler).post(create_session_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/catalog", get(catalog_handler))
        .route(
            "/insight",
            get(get_insight_handler)
                .post(request_insight_handler)
                .delete(clear_insight_handler),
        )
        .with_state(app_state)
}
