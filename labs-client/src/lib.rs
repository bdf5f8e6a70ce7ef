//! Typed HTTP client for the Labs API. Used by the admin CLI and the
//! prerender tool.

mod error;

pub use error::ClientError;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
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

#[derive(Debug, Default, Serialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

#[derive(Debug, Default, Serialize)]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadedImage {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub filename: String,
}

#[derive(Clone)]
pub struct LabsClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl LabsClient {
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
            token: None,
        })
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::Unauthorized)?;
        Ok(req.bearer_auth(token))
    }

    /// Authenticates and keeps the returned token for subsequent calls.
    pub async fn login(&mut self, password: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .post(self.url("/api/admin/login"))
            .json(&serde_json::json!({ "password": password }))
            .send()
            .await?;
        let response = check(response).await?;
        let body: LoginResponse = response.json().await?;
        self.token = Some(body.token.clone());
        Ok(body.token)
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        let response = self.client.get(self.url("/api/labs/posts")).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn get_post(&self, id: i64) -> Result<Post, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/api/labs/posts/{}", id)))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn create_post(&self, draft: &PostDraft) -> Result<Post, ClientError> {
        let req = self.client.post(self.url("/api/labs/posts")).json(draft);
        let response = self.authorized(req)?.send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn update_post(&self, id: i64, update: &PostUpdate) -> Result<Post, ClientError> {
        let req = self
            .client
            .put(self.url(&format!("/api/labs/posts/{}", id)))
            .json(update);
        let response = self.authorized(req)?.send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), ClientError> {
        let req = self
            .client
            .delete(self.url(&format!("/api/labs/posts/{}", id)));
        let response = self.authorized(req)?.send().await?;
        check(response).await?;
        Ok(())
    }

    pub async fn upload_image(&self, path: &Path) -> Result<UploadedImage, ClientError> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".into());
        let mime = guess_image_mime(&filename);

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str(mime)
            .map_err(ClientError::Http)?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let req = self
            .client
            .post(self.url("/api/uploads/image"))
            .multipart(form);
        let response = self.authorized(req)?.send().await?;
        Ok(check(response).await?.json().await?)
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ClientError::NotFound),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Api(body))
        }
    }
}

fn guess_image_mime(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "image/png",
    }
}
