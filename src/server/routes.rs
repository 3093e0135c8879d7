//! Router configuration for the web server.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::browse_documents))
        // JSON API
        .route("/api/documents", get(handlers::list_documents))
        .route("/api/documents/:id", delete(handlers::delete_document))
        .route("/api/upload", post(handlers::upload_document))
        .route("/api/extract", post(handlers::extract_metadata))
        // Stored files
        .route("/uploads/*path", get(handlers::serve_upload))
        // Static assets (CSS/JS)
        .route("/static/style.css", get(handlers::serve_css))
        .route("/static/app.js", get(handlers::serve_js))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
