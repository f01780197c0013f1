use async_trait::async_trait;
use reqwest::Method;

use super::{Gateway, GatewayError};
use crate::models::auth::{ApiMessage, ForgotPasswordRequest, ResetPasswordRequest, TokenStatus};

/// Password-reset endpoints, as seen by the forgot/reset forms.
#[async_trait]
pub trait PasswordResetApi: Send + Sync {
    async fn request_password_reset(&self, email: &str) -> Result<ApiMessage, GatewayError>;
    async fn verify_reset_token(&self, token: &str) -> Result<TokenStatus, GatewayError>;
    async fn reset_password(&self, token: &str, password: &str) -> Result<ApiMessage, GatewayError>;
}

impl Gateway {
    /// POST /auth/forgot-password
    pub async fn request_password_reset(&self, email: &str) -> Result<ApiMessage, GatewayError> {
        let req = self
            .request(Method::POST, "/auth/forgot-password")
            .json(&ForgotPasswordRequest { email });
        self.execute(req).await
    }

    /// GET /auth/verify-reset-token?token=
    pub async fn verify_reset_token(&self, token: &str) -> Result<TokenStatus, GatewayError> {
        let req = self
            .request(Method::GET, "/auth/verify-reset-token")
            .query(&[("token", token)]);
        self.execute(req).await
    }

    /// POST /auth/reset-password
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<ApiMessage, GatewayError> {
        let req = self
            .request(Method::POST, "/auth/reset-password")
            .json(&ResetPasswordRequest { token, password });
        self.execute(req).await
    }
}

#[async_trait]
impl PasswordResetApi for Gateway {
    async fn request_password_reset(&self, email: &str) -> Result<ApiMessage, GatewayError> {
        Gateway::request_password_reset(self, email).await
    }

    async fn verify_reset_token(&self, token: &str) -> Result<TokenStatus, GatewayError> {
        Gateway::verify_reset_token(self, token).await
    }

    async fn reset_password(&self, token: &str, password: &str) -> Result<ApiMessage, GatewayError> {
        Gateway::reset_password(self, token, password).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::gateway::test_support::{gateway, spawn};

    #[tokio::test]
    async fn test_reset_password_posts_token_and_password() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/auth/reset-password",
                post(
                    |State(hits): State<Arc<AtomicUsize>>, Json(body): Json<Value>| async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        assert_eq!(body, json!({"token": "tok-1", "password": "s3cretpass"}));
                        Json(json!({"message": "Password updated"}))
                    },
                ),
            )
            .with_state(hits.clone());
        let gw = gateway(&spawn(router).await);

        let resp = gw.reset_password("tok-1", "s3cretpass").await.unwrap();
        assert_eq!(resp.message.as_deref(), Some("Password updated"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_verify_token_encodes_query() {
        let router = Router::new().route(
            "/auth/verify-reset-token",
            get(|Query(q): Query<std::collections::HashMap<String, String>>| async move {
                Json(json!({"valid": q.get("token").map(String::as_str) == Some("a+b/c")}))
            }),
        );
        let gw = gateway(&spawn(router).await);

        let status = gw.verify_reset_token("a+b/c").await.unwrap();
        assert!(status.valid);
    }

    #[tokio::test]
    async fn test_forgot_password_surfaces_server_error() {
        let router = Router::new().route(
            "/auth/forgot-password",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({"error": "Too many reset requests"})),
                )
            }),
        );
        let gw = gateway(&spawn(router).await);

        let err = gw.request_password_reset("a@b.co").await.unwrap_err();
        match err {
            GatewayError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message.as_deref(), Some("Too many reset requests"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
