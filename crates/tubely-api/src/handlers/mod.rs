pub mod health;
pub mod video_upload;
pub mod videos;

use tubely_core::AppError;
use uuid::Uuid;

/// Path identifiers arrive as raw strings so a malformed one gets our JSON error.
pub(crate) fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput("Invalid ID".to_string()))
}
