use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpServer, web};
use labs_server::application::auth_service::AdminAuthService;
use labs_server::application::post_service::PostService;
use labs_server::data::post_repository::{PostRepository, PostgresPostRepository};
use labs_server::domain::error::DomainError;
use labs_server::infrastructure::config::AppConfig;
use labs_server::infrastructure::database::{create_pool, run_migrations};
use labs_server::infrastructure::logging::init_logging;
use labs_server::infrastructure::rate_limit::LoginRateLimiter;
use labs_server::infrastructure::security::JwtKeys;
use labs_server::presentation::handlers;
use labs_server::presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().expect("invalid configuration");
    let pool = create_pool(&config.database_url)
        .await
        .expect("failed to connect to database");
    run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    let post_repo: Arc<dyn PostRepository> = Arc::new(PostgresPostRepository::new(pool.clone()));
    let post_service = PostService::new(post_repo);
    let auth_service = AdminAuthService::new(
        &config.admin_password,
        JwtKeys::new(config.jwt_secret.clone()),
    )
    .expect("failed to initialise admin auth");
    let login_limiter =
        web::Data::new(LoginRateLimiter::for_admin_login().expect("invalid rate limit config"));

    let config_data = config.clone();

    HttpServer::new(move || {
        let cors = build_cors(&config_data);
        let keys = auth_service.keys().clone();
        App::new()
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .wrap(TimingMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .app_data(web::Data::new(post_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(login_limiter.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                DomainError::Validation(err.to_string()).into()
            }))
            .service(
                web::scope("/api")
                    .service(handlers::auth::scope())
                    .service(handlers::post::scope("/labs", keys.clone()))
                    .service(handlers::post::scope("/portfolio", keys.clone()))
                    .service(
                        web::scope("/uploads")
                            .wrap(JwtAuthMiddleware::new(keys))
                            .service(handlers::upload::upload_image),
                    ),
            )
            // CV, favicon, touch icons, prerendered HTML, /data/posts.json
            // and /uploads all resolve from the public dir.
            .service(Files::new("/", config_data.public_dir.clone()).index_file("index.html"))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .max_age(3600);

    // A wildcard cannot be combined with credentialed requests.
    if config.cors_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        cors = cors.supports_credentials();
        for origin in &config.cors_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
