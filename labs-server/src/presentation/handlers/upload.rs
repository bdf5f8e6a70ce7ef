use crate::domain::error::DomainError;
use crate::infrastructure::config::AppConfig;
use crate::presentation::dto::UploadResponse;
use crate::presentation::utils::{AdminContext, request_id};
use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, post, web};
use futures_util::StreamExt;
use tracing::{error, info};
use uuid::Uuid;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepts one multipart `image` field, images only, 5MB ceiling. The file
/// lands under the public uploads dir and the response carries the relative
/// URL a post can reference. Type checking is MIME-header only; the bytes
/// themselves are not sniffed.
#[post("/image")]
pub async fn upload_image(
    req: HttpRequest,
    admin: AdminContext,
    config: web::Data<AppConfig>,
    mut payload: Multipart,
) -> Result<HttpResponse, DomainError> {
    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|e| DomainError::Validation(format!("invalid multipart payload: {}", e)))?;

        if field.content_disposition().get_name() != Some("image") {
            // Unknown field; drain it so the stream can move on.
            while field.next().await.is_some() {}
            continue;
        }

        let content_type = field
            .content_type()
            .cloned()
            .ok_or_else(|| DomainError::Validation("upload is missing a content type".into()))?;
        if content_type.type_() != mime::IMAGE {
            return Err(DomainError::Validation(
                "only image uploads are accepted".into(),
            ));
        }

        let mut data = web::BytesMut::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| DomainError::Validation(format!("failed to read upload: {}", e)))?;
            if data.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(DomainError::Validation(
                    "image exceeds the 5MB size limit".into(),
                ));
            }
            data.extend_from_slice(&chunk);
        }

        let extension = match content_type.subtype().as_str() {
            "jpeg" => "jpg",
            "svg+xml" => "svg",
            other => other,
        };
        let filename = format!("{}.{}", Uuid::new_v4(), extension);

        let upload_dir = config.upload_dir();
        tokio::fs::create_dir_all(&upload_dir).await.map_err(|e| {
            error!("failed to create upload dir: {}", e);
            DomainError::Internal(e.to_string())
        })?;
        tokio::fs::write(upload_dir.join(&filename), &data)
            .await
            .map_err(|e| {
                error!("failed to persist upload {}: {}", filename, e);
                DomainError::Internal(e.to_string())
            })?;

        info!(
            request_id = %request_id(&req),
            admin = %admin.sub,
            filename = %filename,
            size = data.len(),
            "image uploaded"
        );

        return Ok(HttpResponse::Ok().json(UploadResponse {
            success: true,
            image_url: format!("/uploads/{}", filename),
            filename,
        }));
    }

    Err(DomainError::Validation(
        "multipart field `image` is required".into(),
    ))
}
