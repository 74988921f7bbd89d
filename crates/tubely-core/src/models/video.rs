use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A video entity as held by the record store.
///
/// `video_url` is only ever written by the upload pipeline after the
/// remuxed file has been stored; every other path leaves it untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
}

impl Video {
    pub fn new(user_id: Uuid, title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            title: title.into(),
            description: description.into(),
            user_id,
            thumbnail_url: None,
            video_url: None,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}
