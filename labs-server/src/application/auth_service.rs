use crate::domain::error::DomainError;
use crate::infrastructure::security::{JwtKeys, TOKEN_TTL_SECS, hash_password, verify_password};
use tracing::instrument;

/// Single-admin authentication. The configured password is hashed once at
/// startup; login verifies against the hash and issues a signed, expiring
/// token. There is no user table behind this.
#[derive(Clone)]
pub struct AdminAuthService {
    password_hash: String,
    keys: JwtKeys,
}

impl AdminAuthService {
    pub fn new(admin_password: &str, keys: JwtKeys) -> Result<Self, DomainError> {
        let password_hash =
            hash_password(admin_password).map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(Self {
            password_hash,
            keys,
        })
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    /// Returns the token and its lifetime in seconds.
    #[instrument(skip_all)]
    pub fn login(&self, password: &str) -> Result<(String, i64), DomainError> {
        let valid = verify_password(password, &self.password_hash)
            .map_err(|_| DomainError::Unauthorized)?;
        if !valid {
            return Err(DomainError::Unauthorized);
        }

        let token = self
            .keys
            .generate_token()
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok((token, TOKEN_TTL_SECS))
    }
}
