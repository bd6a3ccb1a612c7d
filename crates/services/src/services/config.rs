use std::env;

const DEFAULT_SESSION_SECRET: &str = "garden-dev-secret-change-me";

/// Runtime configuration, read from the environment (a `.env` file is loaded
/// by the server binary before this runs).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let session_secret =
            env::var("GARDEN_SESSION_SECRET").unwrap_or_else(|_| DEFAULT_SESSION_SECRET.into());
        if session_secret == DEFAULT_SESSION_SECRET {
            tracing::warn!("GARDEN_SESSION_SECRET is not set, using the development default");
        }
        Self {
            host: env::var("GARDEN_HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("GARDEN_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("GARDEN_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:garden.db".into()),
            session_secret,
            session_ttl_hours: env::var("GARDEN_SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            admin_username: env::var("GARDEN_ADMIN_USERNAME").ok(),
            admin_password: env::var("GARDEN_ADMIN_PASSWORD").ok(),
        }
    }
}
