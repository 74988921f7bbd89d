use crate::error::hide_error_details;
use crate::handlers::{health::health, video_upload::upload_video, videos::get_video};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware::map_response_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;
const HTTP_CONCURRENCY_LIMIT: usize = 256;

/// Build the application router.
pub fn setup_routes(state: Arc<AppState>) -> Router {
    let body_limit = state
        .uploads
        .limits()
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    let api = Router::new()
        .route("/api/video_upload/{video_id}", post(upload_video))
        .route("/api/videos/{video_id}", get(get_video))
        // Uploads are streamed; the size ceiling comes from RequestBodyLimitLayer.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(map_response_with_state(state.production, hide_error_details))
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
