use std::path::PathBuf;
use std::sync::Arc;

use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use labs_server::application::auth_service::AdminAuthService;
use labs_server::application::post_service::PostService;
use labs_server::data::memory::InMemoryPostRepository;
use labs_server::data::post_repository::PostRepository;
use labs_server::domain::error::DomainError;
use labs_server::domain::post::Post;
use labs_server::infrastructure::config::AppConfig;
use labs_server::infrastructure::rate_limit::LoginRateLimiter;
use labs_server::infrastructure::security::JwtKeys;
use labs_server::presentation::handlers;
use labs_server::presentation::middleware::JwtAuthMiddleware;
use serde_json::json;
use tempfile::TempDir;

const ADMIN_PASSWORD: &str = "hunter2";

struct TestCtx {
    post_service: PostService,
    auth: AdminAuthService,
    keys: JwtKeys,
    limiter: web::Data<LoginRateLimiter>,
    config: AppConfig,
    _tmp: TempDir,
}

fn ctx() -> TestCtx {
    let tmp = tempfile::tempdir().expect("tempdir");
    let keys = JwtKeys::new("test-secret".into());
    let repo: Arc<dyn PostRepository> = Arc::new(InMemoryPostRepository::new());
    TestCtx {
        post_service: PostService::new(repo),
        auth: AdminAuthService::new(ADMIN_PASSWORD, keys.clone()).expect("auth"),
        keys: keys.clone(),
        limiter: web::Data::new(LoginRateLimiter::for_admin_login().expect("limiter")),
        config: AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: String::new(),
            jwt_secret: "test-secret".into(),
            admin_password: ADMIN_PASSWORD.into(),
            cors_origins: vec![],
            public_dir: tmp.path().to_path_buf(),
        },
        _tmp: tmp,
    }
}

fn test_app(
    ctx: &TestCtx,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        // In production the HTTP dispatcher converts service errors into
        // responses; init_service does not, so do it here to keep
        // call_service from panicking on middleware errors.
        .wrap_fn(|req, srv| {
            let fut = srv.call(req);
            async move {
                Ok(match fut.await {
                    Ok(res) => res.map_into_boxed_body(),
                    Err(err) => ServiceResponse::from_err(
                        err,
                        test::TestRequest::default().to_http_request(),
                    ),
                })
            }
        })
        .app_data(web::Data::new(ctx.post_service.clone()))
        .app_data(web::Data::new(ctx.auth.clone()))
        .app_data(web::Data::new(ctx.config.clone()))
        .app_data(ctx.limiter.clone())
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| DomainError::Validation(err.to_string()).into()),
        )
        .service(
            web::scope("/api")
                .service(handlers::auth::scope())
                .service(handlers::post::scope("/labs", ctx.keys.clone()))
                .service(handlers::post::scope("/portfolio", ctx.keys.clone()))
                .service(
                    web::scope("/uploads")
                        .wrap(JwtAuthMiddleware::new(ctx.keys.clone()))
                        .service(handlers::upload::upload_image),
                ),
        )
}

fn bearer(ctx: &TestCtx) -> (header::HeaderName, String) {
    let (token, _) = ctx.auth.login(ADMIN_PASSWORD).expect("login");
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

fn multipart_body(boundary: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; \
             filename=\"upload.bin\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[actix_web::test]
async fn post_lifecycle_round_trip() {
    let ctx = ctx();
    let app = test::init_service(test_app(&ctx)).await;
    let auth = bearer(&ctx);

    // create
    let req = test::TestRequest::post()
        .uri("/api/labs/posts")
        .insert_header(auth.clone())
        .set_json(json!({
            "title": "A",
            "content": "B",
            "image_url": "https://x.com/a.png"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Post = test::read_body_json(resp).await;
    assert_eq!(created.title, "A");
    assert_eq!(created.content, "B");
    assert_eq!(created.image_url, "https://x.com/a.png");
    assert!(created.published);
    assert!(created.updated_at >= created.created_at);

    // fetch by id round-trips the payload
    let req = test::TestRequest::get()
        .uri(&format!("/api/labs/posts/{}", created.id))
        .to_request();
    let fetched: Post = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.content, created.content);

    // partial update changes only the supplied field
    let req = test::TestRequest::put()
        .uri(&format!("/api/labs/posts/{}", created.id))
        .insert_header(auth.clone())
        .set_json(json!({ "title": "A2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Post = test::read_body_json(resp).await;
    assert_eq!(updated.title, "A2");
    assert_eq!(updated.content, "B");
    assert!(updated.updated_at >= created.updated_at);

    // delete
    let req = test::TestRequest::delete()
        .uri(&format!("/api/labs/posts/{}", created.id))
        .insert_header(auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));

    // gone
    let req = test::TestRequest::get()
        .uri(&format!("/api/labs/posts/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn create_with_empty_title_is_rejected_and_not_persisted() {
    let ctx = ctx();
    let app = test::init_service(test_app(&ctx)).await;
    let auth = bearer(&ctx);

    let req = test::TestRequest::post()
        .uri("/api/labs/posts")
        .insert_header(auth)
        .set_json(json!({
            "title": "",
            "content": "B",
            "image_url": "https://x.com/a.png"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("title must not be empty"));

    let req = test::TestRequest::get().uri("/api/labs/posts").to_request();
    let posts: Vec<Post> = test::call_and_read_body_json(&app, req).await;
    assert!(posts.is_empty());
}

#[actix_web::test]
async fn create_with_malformed_image_url_is_rejected() {
    let ctx = ctx();
    let app = test::init_service(test_app(&ctx)).await;
    let auth = bearer(&ctx);

    let req = test::TestRequest::post()
        .uri("/api/labs/posts")
        .insert_header(auth)
        .set_json(json!({
            "title": "A",
            "content": "B",
            "image_url": "not-a-url"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn create_with_missing_field_is_rejected() {
    let ctx = ctx();
    let app = test::init_service(test_app(&ctx)).await;
    let auth = bearer(&ctx);

    let req = test::TestRequest::post()
        .uri("/api/labs/posts")
        .insert_header(auth)
        .set_json(json!({ "title": "A" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn mutations_require_a_token() {
    let ctx = ctx();
    let app = test::init_service(test_app(&ctx)).await;

    let req = test::TestRequest::post()
        .uri("/api/labs/posts")
        .set_json(json!({
            "title": "A",
            "content": "B",
            "image_url": "https://x.com/a.png"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::delete()
        .uri("/api/labs/posts/1")
        .insert_header((header::AUTHORIZATION, "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn portfolio_prefix_is_an_alias() {
    let ctx = ctx();
    let app = test::init_service(test_app(&ctx)).await;
    let auth = bearer(&ctx);

    let req = test::TestRequest::post()
        .uri("/api/portfolio/posts")
        .insert_header(auth)
        .set_json(json!({
            "title": "via portfolio",
            "content": "B",
            "image_url": "https://x.com/a.png"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/api/labs/posts").to_request();
    let posts: Vec<Post> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "via portfolio");
}

#[actix_web::test]
async fn list_is_ordered_newest_first() {
    let ctx = ctx();
    let app = test::init_service(test_app(&ctx)).await;
    let auth = bearer(&ctx);

    for title in ["one", "two", "three"] {
        let req = test::TestRequest::post()
            .uri("/api/labs/posts")
            .insert_header(auth.clone())
            .set_json(json!({
                "title": title,
                "content": "B",
                "image_url": "https://x.com/a.png"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/labs/posts").to_request();
    let posts: Vec<Post> = test::call_and_read_body_json(&app, req).await;
    let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["three", "two", "one"]);
}

#[actix_web::test]
async fn upload_accepts_small_image_and_stores_it() {
    let ctx = ctx();
    let app = test::init_service(test_app(&ctx)).await;
    let auth = bearer(&ctx);

    let body = multipart_body("BOUND", "image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0]);
    let req = test::TestRequest::post()
        .uri("/api/uploads/image")
        .insert_header(auth)
        .insert_header((
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=BOUND",
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));

    let image_url = body["imageUrl"].as_str().unwrap();
    assert!(image_url.starts_with("/uploads/"));
    assert!(image_url.ends_with(".jpg"));

    let filename = body["filename"].as_str().unwrap();
    let stored: PathBuf = ctx.config.upload_dir().join(filename);
    assert!(stored.exists());
}

#[actix_web::test]
async fn upload_rejects_non_image_mime() {
    let ctx = ctx();
    let app = test::init_service(test_app(&ctx)).await;
    let auth = bearer(&ctx);

    let body = multipart_body("BOUND", "text/plain", b"hello");
    let req = test::TestRequest::post()
        .uri("/api/uploads/image")
        .insert_header(auth)
        .insert_header((
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=BOUND",
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn upload_rejects_oversized_image() {
    let ctx = ctx();
    let app = test::init_service(test_app(&ctx)).await;
    let auth = bearer(&ctx);

    let oversized = vec![0u8; 6 * 1024 * 1024];
    let body = multipart_body("BOUND", "image/png", &oversized);
    let req = test::TestRequest::post()
        .uri("/api/uploads/image")
        .insert_header(auth)
        .insert_header((
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=BOUND",
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn login_issues_token_and_rejects_wrong_password() {
    let ctx = ctx();
    let app = test::init_service(test_app(&ctx)).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/login")
        .set_json(json!({ "password": ADMIN_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["expiresIn"], json!(3600));
    assert!(ctx.keys.verify_token(body["token"].as_str().unwrap()).is_ok());

    let req = test::TestRequest::post()
        .uri("/api/admin/login")
        .set_json(json!({ "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn sixth_login_attempt_is_rate_limited() {
    let ctx = ctx();
    let app = test::init_service(test_app(&ctx)).await;

    for _ in 0..5 {
        let req = test::TestRequest::post()
            .uri("/api/admin/login")
            .set_json(json!({ "password": "wrong" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    let req = test::TestRequest::post()
        .uri("/api/admin/login")
        .set_json(json!({ "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key(header::RETRY_AFTER));
}
