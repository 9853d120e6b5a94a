pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/analysis",
            get(handlers::handle_list_analyses).post(handlers::handle_create_analysis),
        )
        .route("/api/analysis/:id", get(handlers::handle_get_analysis))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
