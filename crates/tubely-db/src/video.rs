use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres};
use tubely_core::{AppError, Video};
use uuid::Uuid;

/// Record store collaborator of the upload pipeline.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Fails with [`AppError::NotFound`] when no record has this id.
    async fn get_video(&self, id: Uuid) -> Result<Video, AppError>;

    /// Persist every mutable field of `video` and return the stored row.
    async fn update_video(&self, video: &Video) -> Result<Video, AppError>;
}

const VIDEO_COLUMNS: &str =
    "id, created_at, updated_at, title, description, user_id, thumbnail_url, video_url";

#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for VideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn get_video(&self, id: Uuid) -> Result<Video, AppError> {
        let query = format!("SELECT {} FROM videos WHERE id = $1", VIDEO_COLUMNS);

        sqlx::query_as::<Postgres, Video>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "update", video_id = %video.id))]
    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        let query = format!(
            "UPDATE videos
             SET title = $2, description = $3, thumbnail_url = $4, video_url = $5, updated_at = $6
             WHERE id = $1
             RETURNING {}",
            VIDEO_COLUMNS
        );

        let updated = sqlx::query_as::<Postgres, Video>(&query)
            .bind(video.id)
            .bind(&video.title)
            .bind(&video.description)
            .bind(&video.thumbnail_url)
            .bind(&video.video_url)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        Ok(updated)
    }
}
