//! HTTP gateway to the job-board backend. Nothing else in the crate talks HTTP.
//!
//! One method per REST operation. Each issues exactly one request: no retry,
//! no caching, no deduplication of identical in-flight calls. Controllers reach
//! the gateway through the traits declared in the submodules so they can be
//! driven by fakes in tests.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod admin;
pub mod auth;
pub mod employer_jobs;
pub mod jobs;
pub mod notifications;
pub mod profile;

pub use admin::AdminCatalog;
pub use auth::PasswordResetApi;
pub use employer_jobs::{JobStore, SkillCatalog};
pub use jobs::JobBoardApi;
pub use profile::ProfileStore;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {}", message.as_deref().unwrap_or("request failed"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// The message reported by the server, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Error bodies come as `{"error": ...}` from most endpoints and as
/// `{"message": ...}` from a few.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .error
        .or(parsed.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl Gateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
            token: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        Ok(Self::new(
            config.api_url.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )?
        .with_token(config.api_token.clone()))
    }

    /// Bearer token sent with every request that does not carry its own.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "gateway request");
        self.client.request(method, url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.build(method, path);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn authorized(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.build(method, path).bearer_auth(token)
    }

    /// Sends the request and decodes the success body as `T`.
    /// Non-2xx responses become `GatewayError::Api` with the server's message when present.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = server_message(&body);
            warn!(status = status.as_u16(), ?message, "gateway request failed");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        debug!(status = status.as_u16(), len = bytes.len(), "gateway response");

        // 204 and friends carry no body.
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"{}")?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}
