//! Route definitions.

use axum::{
    Router,
    http::{HeaderValue, StatusCode},
    routing::{get, post},
};
use config::ServerConfig;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the Axum router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server);
    let timeout = TimeoutLayer::with_status_code(
        StatusCode::GATEWAY_TIMEOUT,
        Duration::from_secs(state.config.server.request_timeout_seconds),
    );

    Router::new()
        .route("/analyze", post(handlers::analyze))
        .route("/suggest-task", post(handlers::suggest_task))
        .route("/insight-summary", post(handlers::insight_summary))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(timeout)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when the list contains `"*"`, otherwise exactly the listed
/// origins. Unparseable entries are skipped with a warning.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
