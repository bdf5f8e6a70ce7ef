use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, error::ErrorUnauthorized};
use futures_util::future::{Ready, ready};

use crate::presentation::middleware::RequestId;

/// Inserted by the JWT middleware; extracting it in a handler signature both
/// documents the auth requirement and fails closed if the route is ever
/// mounted without the middleware.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub sub: String,
}

impl FromRequest for AdminContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AdminContext>() {
            Some(ctx) => ready(Ok(ctx.clone())),
            None => ready(Err(ErrorUnauthorized("missing admin context"))),
        }
    }
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}
