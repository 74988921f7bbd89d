use super::parse_video_id;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// Return the caller's own video record.
#[tracing::instrument(skip(state, headers))]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let user_id = state.auth.resolve_principal(&headers)?;

    let video = state.uploads.authorize(user_id, video_id).await?;

    Ok(Json(video))
}
