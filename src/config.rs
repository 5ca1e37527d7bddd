// Application configuration loaded once at startup
// All environment reads live here; the rest of the crate receives values by injection

use serde::Deserialize;

/// Process-wide configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: String,
    /// Signing secret for session tokens, injected into TokenService at construction
    pub jwt_secret: String,
    /// Session token validity window in days
    pub session_ttl_days: i64,
    /// Reset token validity window in minutes
    pub reset_token_ttl_minutes: i64,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// DATABASE_URL and JWT_SECRET are required; everything else has a default.
    pub fn from_env() -> Result<Self, std::env::VarError> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")?,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT").unwrap_or_else(|_| "8080".to_string()),
            jwt_secret: std::env::var("JWT_SECRET")?,
            session_ttl_days: std::env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(90),
            reset_token_ttl_minutes: std::env::var("RESET_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(10),
        })
    }

    /// Session token validity window in seconds
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_days * 24 * 60 * 60
    }
}
