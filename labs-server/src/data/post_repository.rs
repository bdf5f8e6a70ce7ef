use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostPatch};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, draft: NewPost) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn update(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError>;
    /// Returns `false` when no row with that id existed.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
    /// Every post, newest first. The table is small by design; no pagination.
    async fn list_all(&self) -> Result<Vec<Post>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, draft: NewPost) -> Result<Post, DomainError> {
        let now = Utc::now();
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, content, image_url, video_url, github_url, published, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id, title, content, image_url, video_url, github_url, published, created_at, updated_at
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(&draft.image_url)
        .bind(&draft.video_url)
        .bind(&draft.github_url)
        .bind(draft.published)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(post_id = post.id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, image_url, video_url, github_url, published, created_at, updated_at
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn update(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let now = Utc::now();
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET
                title = COALESCE($1, title),
                content = COALESCE($2, content),
                image_url = COALESCE($3, image_url),
                video_url = COALESCE($4, video_url),
                github_url = COALESCE($5, github_url),
                published = COALESCE($6, published),
                updated_at = $7
            WHERE id = $8
            RETURNING id, title, content, image_url, video_url, github_url, published, created_at, updated_at
            "#,
        )
        .bind(patch.title)
        .bind(patch.content)
        .bind(patch.image_url)
        .bind(patch.video_url)
        .bind(patch.github_url)
        .bind(patch.published)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if post.is_some() {
            info!(post_id = id, "post updated");
        }

        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete post {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(post_id = id, "post deleted");
        }
        Ok(removed)
    }

    async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, image_url, video_url, github_url, published, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching posts: {}", e);
            DomainError::Internal(e.to_string())
        })
    }
}
