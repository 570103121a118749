use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, middleware::metrics_middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Dashboard
        .route("/", get(handlers::dashboard))
        .route("/index.html", get(handlers::dashboard))
        // API
        .route("/api/health", get(handlers::health))
        .route("/api/list", get(handlers::list_generated))
        .route("/api/generate", post(handlers::generate))
        // Generated files
        .route("/output/{*name}", get(handlers::output_file))
        // Prometheus
        .route("/metrics", get(handlers::metrics))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
