use crate::application::auth_service::AdminAuthService;
use crate::domain::error::DomainError;
use crate::infrastructure::rate_limit::LoginRateLimiter;
use crate::presentation::dto::{LoginRequest, LoginResponse};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, Scope, post, web};
use tracing::{info, warn};

pub fn scope() -> Scope {
    web::scope("/admin").service(login)
}

#[post("/login")]
async fn login(
    req: HttpRequest,
    limiter: web::Data<LoginRateLimiter>,
    service: web::Data<AdminAuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, DomainError> {
    let client = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string();

    // Every attempt counts against the allowance, successful or not.
    if let Err(wait) = limiter.check(&client) {
        warn!(client = %client, "login rate limited");
        return Err(DomainError::RateLimited {
            retry_after_secs: wait.as_secs().max(1),
        });
    }

    let (token, expires_in) = service.login(&payload.password)?;

    info!(request_id = %request_id(&req), "admin logged in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        token,
        expires_in,
    }))
}
