//! Router configuration.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{delete_file, download, index, login, login_form, logout, upload, AppState};
use super::middleware::{login_rate_limit, require_session, security_headers, RateLimitState};

/// Create the main router.
///
/// File routes are wrapped in the session guard as a group; no file route
/// is reachable without passing it.
pub fn create_router(app_state: Arc<AppState>, rate_limit: Arc<RateLimitState>) -> Router {
    // Routes reachable without a session
    let login_routes = Router::new()
        .route("/login", get(login_form).post(login))
        .route_layer(middleware::from_fn_with_state(rate_limit, login_rate_limit));
    let public_routes = Router::new()
        .merge(login_routes)
        .route("/logout", get(logout));

    // File routes (session required)
    let protected_routes = Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .route("/files/:name", get(download))
        .route("/delete/:name", get(delete_file))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ))
        .layer(DefaultBodyLimit::max(app_state.max_upload_size));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
