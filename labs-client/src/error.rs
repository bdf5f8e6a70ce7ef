use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unauthorized; log in first")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("server rejected the request: {0}")]
    Api(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
