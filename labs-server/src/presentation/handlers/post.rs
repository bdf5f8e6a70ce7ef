use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::infrastructure::security::JwtKeys;
use crate::presentation::dto::{CreatePostRequest, DeleteResponse, UpdatePostRequest};
use crate::presentation::middleware::JwtAuthMiddleware;
use crate::presentation::utils::{AdminContext, request_id};
use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use tracing::info;

/// Post routes under a given prefix. `/api/labs` is canonical and
/// `/api/portfolio` is a compatibility alias; both mount this same set.
/// Reads are public, mutations sit behind the JWT middleware.
pub fn scope(prefix: &str, keys: JwtKeys) -> Scope {
    web::scope(prefix)
        .service(get_posts)
        .service(get_post)
        .service(
            web::scope("")
                .wrap(JwtAuthMiddleware::new(keys))
                .service(create_post)
                .service(update_post)
                .service(delete_post),
        )
}

#[get("/posts")]
async fn get_posts(
    req: HttpRequest,
    service: web::Data<PostService>,
) -> Result<HttpResponse, DomainError> {
    let posts = service.list_posts().await?;

    info!(
        request_id = %request_id(&req),
        count = posts.len(),
        "posts retrieved"
    );

    Ok(HttpResponse::Ok().json(posts))
}

#[get("/posts/{id}")]
async fn get_post(
    service: web::Data<PostService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post = service.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[post("/posts")]
async fn create_post(
    req: HttpRequest,
    admin: AdminContext,
    service: web::Data<PostService>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post = service.create_post(payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        admin = %admin.sub,
        post_id = post.id,
        "post created"
    );

    Ok(HttpResponse::Created().json(post))
}

#[put("/posts/{id}")]
async fn update_post(
    req: HttpRequest,
    admin: AdminContext,
    service: web::Data<PostService>,
    payload: web::Json<UpdatePostRequest>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let post = service.update_post(post_id, payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        admin = %admin.sub,
        post_id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/posts/{id}")]
async fn delete_post(
    req: HttpRequest,
    admin: AdminContext,
    service: web::Data<PostService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    service.delete_post(post_id).await?;

    info!(
        request_id = %request_id(&req),
        admin = %admin.sub,
        post_id,
        "post deleted"
    );

    Ok(HttpResponse::Ok().json(DeleteResponse { success: true }))
}
