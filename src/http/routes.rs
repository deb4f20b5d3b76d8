use super::handlers;
use super::state::AppState;
use crate::config::CorsConfig;
use crate::ingest::MAX_UPLOAD_BYTES;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Transport-level body cap. Deliberately above the 25 MiB per-field limit
/// so oversize audio is rejected by the ingestion layer with a proper 413
/// body rather than cut off mid-parse.
const BODY_LIMIT_BYTES: usize = 2 * MAX_UPLOAD_BYTES as usize;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        // Transcription relay
        .route("/transcribe", post(handlers::transcribe))
        // Health check
        .route("/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Strict CORS: an explicit origin allow-list (local development plus any
/// configured production origin), credentials permitted only for those.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
