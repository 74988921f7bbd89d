use super::staging::stage_upload;
use std::fmt;
use std::sync::Arc;
use tempfile::TempPath;
use tokio::io::AsyncRead;
use tubely_core::{AppError, Orientation, UploadLimits, Video};
use tubely_db::VideoStore;
use tubely_processing::{faststart_output_path, MediaToolkit};
use tubely_storage::{build_storage_key, generate_token, Storage};
use uuid::Uuid;

const VIDEO_EXTENSION: &str = "mp4";

/// Progress of a single upload. A failure is reported against the last
/// stage that completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Received,
    Validated,
    Staged,
    Probed,
    Classified,
    Remuxed,
    Uploaded,
    Recorded,
}

impl UploadStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStage::Received => "received",
            UploadStage::Validated => "validated",
            UploadStage::Staged => "staged",
            UploadStage::Probed => "probed",
            UploadStage::Classified => "classified",
            UploadStage::Remuxed => "remuxed",
            UploadStage::Uploaded => "uploaded",
            UploadStage::Recorded => "recorded",
        }
    }
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One upload: who is asking, for which video, and the file part itself.
pub struct UploadRequest<R> {
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub content_type: Option<String>,
    pub body: R,
}

/// Drives an upload from the raw request body to an updated video record.
#[derive(Clone)]
pub struct UploadOrchestrator {
    videos: Arc<dyn VideoStore>,
    storage: Arc<dyn Storage>,
    toolkit: Arc<dyn MediaToolkit>,
    limits: UploadLimits,
}

impl UploadOrchestrator {
    pub fn new(
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn Storage>,
        toolkit: Arc<dyn MediaToolkit>,
        limits: UploadLimits,
    ) -> Self {
        Self {
            videos,
            storage,
            toolkit,
            limits,
        }
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// Fetch the video and require `user_id` to own it.
    #[tracing::instrument(skip(self))]
    pub async fn authorize(&self, user_id: Uuid, video_id: Uuid) -> Result<Video, AppError> {
        let video = self.videos.get_video(video_id).await?;

        if !video.is_owned_by(user_id) {
            tracing::warn!(owner_id = %video.user_id, "Rejected access to video owned by another user");
            return Err(AppError::Forbidden(
                "You do not have permission to modify this video".to_string(),
            ));
        }

        Ok(video)
    }

    /// Run the whole pipeline. Nothing is written to disk or storage until
    /// ownership and content type have been checked.
    #[tracing::instrument(skip(self, request), fields(
        video_id = %request.video_id,
        user_id = %request.user_id
    ))]
    pub async fn run<R>(&self, request: UploadRequest<R>) -> Result<Video, AppError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let start = std::time::Instant::now();
        let mut stage = UploadStage::Received;

        let result = self.drive(&mut stage, request).await;

        match &result {
            Ok(video) => tracing::info!(
                video_url = video.video_url.as_deref().unwrap_or_default(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Video upload completed"
            ),
            Err(e) if e.is_client_error() => {
                tracing::debug!(stage = %stage, error = %e, "Video upload rejected")
            }
            Err(e) => tracing::warn!(stage = %stage, error = %e, "Video upload failed"),
        }

        result
    }

    async fn drive<R>(
        &self,
        stage: &mut UploadStage,
        request: UploadRequest<R>,
    ) -> Result<Video, AppError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let UploadRequest {
            user_id,
            video_id,
            content_type,
            mut body,
        } = request;

        let mut video = self.authorize(user_id, video_id).await?;
        let content_type = self.check_content_type(content_type.as_deref())?;
        advance(stage, UploadStage::Validated);

        let staged = stage_upload(&mut body, &self.limits).await?;
        if staged.size == 0 {
            return Err(AppError::InvalidInput("Uploaded video is empty".to_string()));
        }
        tracing::debug!(size_bytes = staged.size, "Upload staged");
        advance(stage, UploadStage::Staged);

        let aspect_ratio = self.toolkit.probe_aspect_ratio(&staged.path).await?;
        advance(stage, UploadStage::Probed);

        let orientation = Orientation::from_aspect_ratio(&aspect_ratio);
        tracing::debug!(aspect_ratio = %aspect_ratio, orientation = %orientation, "Video classified");
        advance(stage, UploadStage::Classified);

        // Registered before the tool runs so a partial output is removed too.
        let remuxed = TempPath::from_path(faststart_output_path(&staged.path));
        let output_path = self.toolkit.remux_faststart(&staged.path).await?;
        // A toolkit that writes elsewhere still gets its output removed.
        let _other_output = if output_path.as_path() == &*remuxed {
            None
        } else {
            Some(TempPath::from_path(&output_path))
        };
        advance(stage, UploadStage::Remuxed);

        let storage_key = build_storage_key(orientation, &generate_token(), VIDEO_EXTENSION);
        let file = tokio::fs::File::open(&output_path).await?;
        let stored_bytes = self
            .storage
            .put_stream(&storage_key, &content_type, Box::pin(file))
            .await?;
        tracing::debug!(storage_key = %storage_key, size_bytes = stored_bytes, "Video stored");
        advance(stage, UploadStage::Uploaded);

        video.video_url = Some(self.storage.public_url(&storage_key));
        let updated = self.videos.update_video(&video).await.map_err(|e| {
            tracing::error!(
                storage_key = %storage_key,
                error = %e,
                "Video record update failed after upload; stored object is unreferenced"
            );
            e
        })?;
        advance(stage, UploadStage::Recorded);

        Ok(updated)
    }

    /// Accept only the configured media type, ignoring parameters such as
    /// `; codecs=...`. Returns the normalized type.
    fn check_content_type(&self, declared: Option<&str>) -> Result<String, AppError> {
        let media_type = declared
            .map(normalize_mime_type)
            .unwrap_or_default()
            .to_lowercase();

        if media_type != self.limits.accepted_media_type {
            return Err(AppError::UnsupportedMediaType(format!(
                "Invalid file type '{}', only {} is accepted",
                media_type, self.limits.accepted_media_type
            )));
        }

        Ok(media_type)
    }
}

fn advance(stage: &mut UploadStage, next: UploadStage) {
    tracing::debug!(from = %stage, to = %next, "Upload stage complete");
    *stage = next;
}

fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mime_type() {
        assert_eq!(normalize_mime_type("video/mp4"), "video/mp4");
        assert_eq!(normalize_mime_type("video/mp4; codecs=avc1"), "video/mp4");
        assert_eq!(normalize_mime_type(" video/mp4 ;"), "video/mp4");
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(UploadStage::Received.to_string(), "received");
        assert_eq!(UploadStage::Recorded.to_string(), "recorded");
    }
}
