use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub video_url: Option<String>,
    pub github_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a post the server has not assigned an id or timestamps to yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub video_url: Option<String>,
    pub github_url: Option<String>,
    pub published: bool,
}

/// Partial update. `None` means "leave the stored value alone".
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub github_url: Option<String>,
    pub published: Option<bool>,
}
