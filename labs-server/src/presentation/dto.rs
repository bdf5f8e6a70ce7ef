use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

// ======================= POSTS =======================

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: String,
    #[validate(url(message = "video_url must be a valid URL"))]
    pub video_url: Option<String>,
    #[validate(url(message = "github_url must be a valid URL"))]
    pub github_url: Option<String>,
    pub published: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: Option<String>,
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
    #[validate(url(message = "video_url must be a valid URL"))]
    pub video_url: Option<String>,
    #[validate(url(message = "github_url must be a valid URL"))]
    pub github_url: Option<String>,
    pub published: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

// ======================= ADMIN =======================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: i64,
}

// ======================= UPLOADS =======================

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub filename: String,
}

// ======================= Utils =======================

/// Flattens validator output into one stable, human-readable line.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(move |err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{field} is invalid"),
                })
                .collect::<Vec<_>>()
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreatePostRequest {
        CreatePostRequest {
            title: "A".into(),
            content: "B".into(),
            image_url: "https://x.com/a.png".into(),
            video_url: None,
            github_url: None,
            published: None,
        }
    }

    #[test]
    fn accepts_minimal_valid_payload() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn rejects_empty_title() {
        let payload = CreatePostRequest {
            title: String::new(),
            ..valid_create()
        };
        let errors = payload.validate().unwrap_err();
        assert!(validation_message(&errors).contains("title must not be empty"));
    }

    #[test]
    fn rejects_non_url_image() {
        let payload = CreatePostRequest {
            image_url: "not-a-url".into(),
            ..valid_create()
        };
        let errors = payload.validate().unwrap_err();
        assert!(validation_message(&errors).contains("image_url must be a valid URL"));
    }

    #[test]
    fn optional_urls_are_checked_when_present() {
        let payload = CreatePostRequest {
            video_url: Some("not a url".into()),
            ..valid_create()
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(UpdatePostRequest::default().validate().is_ok());
    }

    #[test]
    fn update_rejects_blank_title() {
        let payload = UpdatePostRequest {
            title: Some(String::new()),
            ..UpdatePostRequest::default()
        };
        assert!(payload.validate().is_err());
    }
}
