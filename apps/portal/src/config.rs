use anyhow::{Context, Result};

use crate::models::user::Role;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
/// Only malformed values are errors; everything has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub user_id: Option<String>,
    pub user_role: Option<Role>,
    pub http_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: std::env::var("PORTAL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_token: optional_env("PORTAL_API_TOKEN"),
            user_id: optional_env("PORTAL_USER_ID"),
            user_role: optional_env("PORTAL_USER_ROLE")
                .map(|raw| raw.parse::<Role>())
                .transpose()
                .map_err(anyhow::Error::msg)
                .context("PORTAL_USER_ROLE must be 'candidate' or 'employer'")?,
            http_timeout_secs: std::env::var("PORTAL_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .context("PORTAL_HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
