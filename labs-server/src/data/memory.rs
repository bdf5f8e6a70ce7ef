//! In-memory post store. Backs the test suite and local runs without Postgres.

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostPatch};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
    next_id: AtomicI64,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, draft: NewPost) -> Result<Post, DomainError> {
        let now = Utc::now();
        let post = Post {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: draft.title,
            content: draft.content,
            image_url: draft.image_url,
            video_url: draft.video_url,
            github_url: draft.github_url,
            published: draft.published,
            created_at: now,
            updated_at: now,
        };
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.posts.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(image_url) = patch.image_url {
            post.image_url = image_url;
        }
        if let Some(video_url) = patch.video_url {
            post.video_url = Some(video_url);
        }
        if let Some(github_url) = patch.github_url {
            post.github_url = Some(github_url);
        }
        if let Some(published) = patch.published {
            post.published = published;
        }
        post.updated_at = Utc::now();

        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() < before)
    }

    async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        let mut posts = self.posts.read().await.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }
}
