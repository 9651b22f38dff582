//! pscat-api library - Problem statement catalog service
//!
//! Stores academic project problem statements, assigns each a readable
//! domain-prefixed identifier (`AIM001`) and imports records in bulk from
//! CSV uploads with per-row error reporting.

use axum::Router;
use sqlx::SqlitePool;
use std::time::Instant;

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod pagination;
pub mod services;

pub use error::{ApiError, ApiResult};

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Largest accepted bulk upload file
    pub max_upload_bytes: usize,
    /// Server start, for uptime reporting
    pub startup_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, max_upload_bytes: usize) -> Self {
        Self {
            db,
            max_upload_bytes,
            startup_time: Instant::now(),
        }
    }
}

/// Build application router
///
/// Reads and the health check are public; every write route sits behind
/// bearer token authentication.
pub fn build_router(state: AppState) -> Router {
    use axum::extract::DefaultBodyLimit;
    use axum::middleware;
    use axum::routing::{get, patch, post};
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    let upload_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);

    // Protected routes (require authentication)
    let protected = Router::new()
        .route("/api/problem-statements", post(api::create_problem))
        .route(
            "/api/problem-statements/bulk-upload",
            post(api::bulk_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/problem-statements/template",
            get(api::download_template_csv),
        )
        .route(
            "/api/problem-statements/:id",
            axum::routing::put(api::update_problem).delete(api::delete_problem),
        )
        .route("/api/problem-statements/:id/status", patch(api::update_status))
        .route(
            "/api/problem-statements/:id/featured",
            patch(api::toggle_featured),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/problem-statements", get(api::list_problems))
        .route("/api/problem-statements/:id", get(api::get_problem))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
