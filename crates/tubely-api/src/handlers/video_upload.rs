use super::parse_video_id;
use crate::error::HttpAppError;
use crate::services::upload::UploadRequest;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use futures::TryStreamExt;
use std::io;
use std::sync::Arc;
use tokio_util::io::StreamReader;
use tubely_core::AppError;

/// Multipart form field carrying the video file.
const VIDEO_FIELD: &str = "video";

/// Upload the video file for an existing video record.
///
/// The file part is streamed straight into the upload pipeline; it is never
/// buffered in memory.
#[tracing::instrument(skip(state, headers, multipart))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let user_id = state.auth.resolve_principal(&headers)?;

    let mut multipart = multipart.map_err(|e| {
        AppError::BadRequest(format!("Invalid multipart request: {}", e.body_text()))
    })?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let body = StreamReader::new(Box::pin(field.map_err(io::Error::other)));

        let video = state
            .uploads
            .run(UploadRequest {
                user_id,
                video_id,
                content_type,
                body,
            })
            .await?;

        return Ok((StatusCode::OK, Json(video)));
    }

    Err(AppError::BadRequest(format!("Missing '{}' form field", VIDEO_FIELD)).into())
}
