use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    /// Plaintext from the environment; hashed once at startup, never stored.
    pub admin_password: String,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    pub public_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        // No fallback password; the server refuses to boot without one.
        let admin_password = std::env::var("ADMIN_PASSWORD")
            .map_err(|_| anyhow::anyhow!("ADMIN_PASSWORD must be set"))?;
        if admin_password.trim().is_empty() {
            anyhow::bail!("ADMIN_PASSWORD must not be empty");
        }
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let public_dir = std::env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            admin_password,
            cors_origins,
            public_dir,
        })
    }

    /// Uploaded images live under the public dir so actix-files serves them
    /// back at `/uploads/<name>` without extra routing.
    pub fn upload_dir(&self) -> PathBuf {
        self.public_dir.join("uploads")
    }
}
