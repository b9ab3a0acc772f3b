// Application configuration loaded from environment variables.
// Decision: AUTH_ prefix for auth-related config, matching deployment conventions
// The auth core itself never reads the environment; secrets and TTLs are
// injected through constructors from here.

use anyhow::{Context, Result};
use std::time::Duration;

const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_TOKEN_TTL_MINUTES: u64 = 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// e.g. "local", "dev", "production"
    pub app_env: String,
    pub http_port: u16,
    pub database_url: String,
    /// Symmetric secret for signing session tokens
    pub jwt_secret: String,
    /// Session token lifetime
    pub token_ttl: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// DATABASE_URL and AUTH_JWT_SECRET are required; everything else defaults.
    pub fn from_env() -> Result<Self> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

        let http_port = match std::env::var("HTTP_PORT") {
            Ok(s) => s.parse::<u16>().context("invalid HTTP_PORT")?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;

        let jwt_secret = std::env::var("AUTH_JWT_SECRET")
            .context("AUTH_JWT_SECRET environment variable required")?;

        let token_ttl_minutes = match std::env::var("AUTH_TOKEN_TTL_MINUTES") {
            Ok(s) => s
                .parse::<u64>()
                .context("invalid AUTH_TOKEN_TTL_MINUTES")?,
            Err(_) => DEFAULT_TOKEN_TTL_MINUTES,
        };

        Ok(Self {
            app_env,
            http_port,
            database_url,
            jwt_secret,
            token_ttl: Duration::from_secs(token_ttl_minutes * 60),
        })
    }
}
