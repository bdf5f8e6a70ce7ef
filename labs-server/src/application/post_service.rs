use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostPatch};
use crate::presentation::dto::{CreatePostRequest, UpdatePostRequest, validation_message};
use tracing::instrument;
use validator::Validate;

/// The one canonical CRUD surface over the posts table. Both public route
/// prefixes resolve to this service.
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.repo.list_all().await
    }

    #[instrument(skip(self, payload))]
    pub async fn create_post(&self, payload: CreatePostRequest) -> Result<Post, DomainError> {
        payload
            .validate()
            .map_err(|e| DomainError::Validation(validation_message(&e)))?;

        let draft = NewPost {
            title: payload.title,
            content: payload.content,
            image_url: payload.image_url,
            video_url: payload.video_url,
            github_url: payload.github_url,
            published: payload.published.unwrap_or(true),
        };
        self.repo.create(draft).await
    }

    #[instrument(skip(self, payload))]
    pub async fn update_post(
        &self,
        id: i64,
        payload: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        payload
            .validate()
            .map_err(|e| DomainError::Validation(validation_message(&e)))?;

        let patch = PostPatch {
            title: payload.title,
            content: payload.content,
            image_url: payload.image_url,
            video_url: payload.video_url,
            github_url: payload.github_url,
            published: payload.published,
        };
        match self.repo.update(id, patch).await? {
            Some(post) => Ok(post),
            None => Err(DomainError::PostNotFound(id)),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: i64) -> Result<(), DomainError> {
        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::PostNotFound(id))
        }
    }
}
