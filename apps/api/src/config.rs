use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// App base route of the NLQ backend; the anti-forgery probe targets it
    /// and `/api/chat`, `/user-api/currentUser` hang off it.
    pub backend_base_url: String,
    /// Root of the OData prompt service.
    pub prompt_service_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_base_url: require_env("BACKEND_BASE_URL")?,
            prompt_service_url: require_env("PROMPT_SERVICE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))
        .and_then(|v| {
            if v.trim().is_empty() {
                anyhow::bail!("Required environment variable '{key}' is empty")
            }
            Ok(v)
        })
}
