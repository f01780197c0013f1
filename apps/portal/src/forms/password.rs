use std::time::Duration;

use tracing::{info, warn};

use crate::errors::FormError;
use crate::forms::lifecycle::{SubmitGate, Ticket};
use crate::forms::validation::{password_strength, validate_email, validate_new_password, PasswordStrength};
use crate::forms::Notice;
use crate::gateway::{GatewayError, PasswordResetApi};
use crate::models::auth::{ApiMessage, TokenStatus};

const RESET_LINK_SENT: &str = "If an account exists with this email, a reset link has been sent.";
const RESET_DONE: &str = "Password reset successful!";
const INVALID_LINK: &str = "Invalid or expired reset link";
const REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// "Forgot password" form: one email field.
#[derive(Debug, Default)]
pub struct ForgotPasswordForm {
    pub email: String,
    sent: bool,
    gate: SubmitGate,
}

#[derive(Debug)]
pub struct ForgotRequest {
    pub email: String,
    ticket: Ticket,
}

impl ForgotPasswordForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.gate.is_busy()
    }

    /// Whether the last submission was accepted by the server.
    pub fn email_sent(&self) -> bool {
        self.sent
    }

    pub fn begin_submit(&mut self) -> Result<ForgotRequest, FormError> {
        let email = self.email.trim().to_string();
        validate_email(&email)?;
        let ticket = self.gate.try_begin()?;
        Ok(ForgotRequest { email, ticket })
    }

    pub fn complete(
        &mut self,
        request: ForgotRequest,
        result: Result<ApiMessage, GatewayError>,
    ) -> Result<Notice, FormError> {
        self.gate.finish(request.ticket)?;
        match result {
            Ok(ack) => {
                info!("password reset link requested");
                self.sent = true;
                Ok(Notice::success(
                    ack.message.unwrap_or_else(|| RESET_LINK_SENT.to_string()),
                ))
            }
            Err(e) => {
                warn!(error = %e, "password reset request failed");
                Err(FormError::from_gateway(&e, "Failed to send reset link"))
            }
        }
    }

    pub async fn submit(&mut self, api: &dyn PasswordResetApi) -> Result<Notice, FormError> {
        let request = self.begin_submit()?;
        let result = api.request_password_reset(&request.email).await;
        self.complete(request, result)
    }

    /// Back to an empty form, e.g. to try another address.
    pub fn start_over(&mut self) {
        self.email.clear();
        self.sent = false;
    }

    pub fn unmount(&self) {
        self.gate.unmount();
    }
}

/// Validity of the reset link the form was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    Verifying,
    Valid,
    Invalid(String),
}

/// "Reset password" form, opened from the emailed link.
#[derive(Debug)]
pub struct ResetPasswordForm {
    token: Option<String>,
    pub password: String,
    pub confirmation: String,
    state: TokenState,
    done: bool,
    gate: SubmitGate,
}

#[derive(Debug)]
pub struct ResetRequest {
    pub token: String,
    pub password: String,
    ticket: Ticket,
}

impl ResetPasswordForm {
    /// A blank token counts as missing.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            password: String::new(),
            confirmation: String::new(),
            state: TokenState::Verifying,
            done: false,
            gate: SubmitGate::new(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn state(&self) -> &TokenState {
        &self.state
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn is_submitting(&self) -> bool {
        self.gate.is_busy()
    }

    /// Checks the link with the server. Without a token no request is made.
    pub async fn verify_token(&mut self, api: &dyn PasswordResetApi) -> Result<(), FormError> {
        let Some(token) = self.token.clone() else {
            self.state = TokenState::Invalid("No reset token provided".to_string());
            return Err(FormError::validation("No reset token provided"));
        };

        let result = api.verify_reset_token(&token).await;
        if !self.gate.liveness().is_alive() {
            return Err(FormError::Unmounted);
        }
        self.apply_verification(result)
    }

    fn apply_verification(&mut self, result: Result<TokenStatus, GatewayError>) -> Result<(), FormError> {
        let err = match result {
            Ok(status) if status.valid => {
                self.state = TokenState::Valid;
                return Ok(());
            }
            Ok(status) => FormError::Server(status.message.unwrap_or_else(|| INVALID_LINK.to_string())),
            Err(e) => {
                warn!(error = %e, "reset token verification failed");
                FormError::from_gateway(&e, INVALID_LINK)
            }
        };
        self.state = TokenState::Invalid(err.to_string());
        Err(err)
    }

    pub fn strength(&self) -> Option<PasswordStrength> {
        password_strength(&self.password)
    }

    pub fn can_submit(&self) -> bool {
        self.state == TokenState::Valid && !self.done && !self.gate.is_busy()
    }

    /// Length, then match, then token presence.
    pub fn validate(&self) -> Result<&str, FormError> {
        validate_new_password(&self.password, &self.confirmation)?;
        self.token
            .as_deref()
            .ok_or_else(|| FormError::validation("Invalid reset token"))
    }

    /// Only a verified link that has not been used yet can be submitted.
    fn check_link(&self) -> Result<(), FormError> {
        if self.done {
            return Err(FormError::validation("Password has already been reset"));
        }
        match &self.state {
            TokenState::Valid => Ok(()),
            TokenState::Verifying => Err(FormError::validation("Reset link has not been verified yet")),
            TokenState::Invalid(message) => Err(FormError::Validation(message.clone())),
        }
    }

    pub fn begin_submit(&mut self) -> Result<ResetRequest, FormError> {
        self.check_link()?;
        let token = self.validate()?.to_string();
        let ticket = self.gate.try_begin()?;
        Ok(ResetRequest {
            token,
            password: self.password.clone(),
            ticket,
        })
    }

    pub fn complete(
        &mut self,
        request: ResetRequest,
        result: Result<ApiMessage, GatewayError>,
    ) -> Result<Notice, FormError> {
        self.gate.finish(request.ticket)?;
        match result {
            Ok(ack) => {
                info!("password reset completed");
                self.done = true;
                self.password.clear();
                self.confirmation.clear();
                Ok(Notice::success(ack.message.unwrap_or_else(|| RESET_DONE.to_string())))
            }
            Err(e) => {
                warn!(error = %e, "password reset failed");
                Err(FormError::from_gateway(&e, "Failed to reset password"))
            }
        }
    }

    pub async fn submit(&mut self, api: &dyn PasswordResetApi) -> Result<Notice, FormError> {
        let request = self.begin_submit()?;
        let result = api.reset_password(&request.token, &request.password).await;
        self.complete(request, result)
    }

    /// How long to show the success message before moving on to login.
    /// `None` until the reset has succeeded.
    pub fn redirect_after(&self) -> Option<Duration> {
        self.done.then_some(REDIRECT_DELAY)
    }

    pub fn unmount(&self) {
        self.gate.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct FakeAuth {
        forgot_calls: AtomicUsize,
        verify_calls: AtomicUsize,
        reset_calls: AtomicUsize,
        token_valid: bool,
        fail_with: Option<String>,
    }

    impl FakeAuth {
        fn result(&self) -> Result<ApiMessage, GatewayError> {
            match &self.fail_with {
                Some(msg) => Err(GatewayError::Api {
                    status: 400,
                    message: Some(msg.clone()),
                }),
                None => Ok(ApiMessage::default()),
            }
        }
    }

    #[async_trait]
    impl PasswordResetApi for FakeAuth {
        async fn request_password_reset(&self, _email: &str) -> Result<ApiMessage, GatewayError> {
            self.forgot_calls.fetch_add(1, Ordering::SeqCst);
            self.result()
        }

        async fn verify_reset_token(&self, _token: &str) -> Result<TokenStatus, GatewayError> {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            if self.token_valid {
                Ok(TokenStatus {
                    valid: true,
                    message: None,
                })
            } else {
                Err(GatewayError::Api {
                    status: 400,
                    message: None,
                })
            }
        }

        async fn reset_password(&self, _token: &str, _password: &str) -> Result<ApiMessage, GatewayError> {
            self.reset_calls.fetch_add(1, Ordering::SeqCst);
            self.result()
        }
    }

    fn valid_api() -> FakeAuth {
        FakeAuth {
            token_valid: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_forgot_rejects_bad_email_without_request() {
        let api = FakeAuth::default();
        let mut form = ForgotPasswordForm::new();
        form.email = "not-an-email".to_string();

        let err = form.submit(&api).await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid email address");
        assert_eq!(api.forgot_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_forgot_success_uses_default_message() {
        let api = FakeAuth::default();
        let mut form = ForgotPasswordForm::new();
        form.email = " jane@example.com ".to_string();

        let notice = form.submit(&api).await.unwrap();
        assert_eq!(notice.message, RESET_LINK_SENT);
        assert!(form.email_sent());

        form.start_over();
        assert!(!form.email_sent());
        assert!(form.email.is_empty());
    }

    #[tokio::test]
    async fn test_forgot_failure_shows_server_message() {
        let api = FakeAuth {
            fail_with: Some("Too many requests".to_string()),
            ..Default::default()
        };
        let mut form = ForgotPasswordForm::new();
        form.email = "jane@example.com".to_string();

        let err = form.submit(&api).await.unwrap_err();
        assert_eq!(err, FormError::Server("Too many requests".to_string()));
        assert!(!form.email_sent());
    }

    #[tokio::test]
    async fn test_missing_token_skips_verification_request() {
        let api = valid_api();
        let mut form = ResetPasswordForm::new(Some("  ".to_string()));

        assert!(form.verify_token(&api).await.is_err());
        assert_eq!(
            form.state(),
            &TokenState::Invalid("No reset token provided".to_string())
        );
        assert_eq!(api.verify_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejected_token_uses_fallback_message() {
        let api = FakeAuth::default();
        let mut form = ResetPasswordForm::new(Some("expired".to_string()));

        form.verify_token(&api).await.unwrap_err();
        assert_eq!(form.state(), &TokenState::Invalid(INVALID_LINK.to_string()));
        assert!(!form.can_submit());
    }

    #[tokio::test]
    async fn test_short_password_makes_no_request() {
        let api = valid_api();
        let mut form = ResetPasswordForm::new(Some("tok".to_string()));
        form.verify_token(&api).await.unwrap();
        form.password = "abc".to_string();
        form.confirmation = "abc".to_string();

        let err = form.submit(&api).await.unwrap_err();
        assert!(matches!(err, FormError::Validation(_)));
        assert_eq!(api.reset_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_reset_sends_exactly_one_request() {
        let api = valid_api();
        let mut form = ResetPasswordForm::new(Some("tok".to_string()));
        form.verify_token(&api).await.unwrap();
        assert!(form.can_submit());
        form.password = "Sup3r!secret".to_string();
        form.confirmation = "Sup3r!secret".to_string();
        assert_eq!(form.strength(), Some(PasswordStrength::Strong));

        let notice = form.submit(&api).await.unwrap();
        assert_eq!(notice.message, RESET_DONE);
        assert_eq!(api.reset_calls.load(Ordering::SeqCst), 1);
        assert_eq!(form.redirect_after(), Some(Duration::from_secs(2)));
        assert!(!form.can_submit());
    }

    #[test]
    fn test_validation_order_token_checked_last() {
        let mut form = ResetPasswordForm::new(None);
        form.password = "longenough".to_string();
        form.confirmation = "different1".to_string();
        assert_eq!(form.validate().unwrap_err().to_string(), "Passwords do not match");

        form.confirmation = "longenough".to_string();
        assert_eq!(form.validate().unwrap_err().to_string(), "Invalid reset token");
    }

    #[test]
    fn test_duplicate_reset_rejected_while_in_flight() {
        let mut form = ResetPasswordForm::new(Some("tok".to_string()));
        form.state = TokenState::Valid;
        form.password = "longenough".to_string();
        form.confirmation = "longenough".to_string();

        let first = form.begin_submit().unwrap();
        assert_eq!(form.begin_submit().unwrap_err(), FormError::Busy);
        assert!(form.redirect_after().is_none());
        form.complete(first, Ok(ApiMessage::default())).unwrap();
        assert!(form.is_done());
    }

    #[tokio::test]
    async fn test_rejected_link_never_posts_reset() {
        let api = FakeAuth::default();
        let mut form = ResetPasswordForm::new(Some("expired".to_string()));
        form.verify_token(&api).await.unwrap_err();
        form.password = "longenough".to_string();
        form.confirmation = "longenough".to_string();

        let err = form.submit(&api).await.unwrap_err();
        assert_eq!(err, FormError::Validation(INVALID_LINK.to_string()));
        assert_eq!(api.reset_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unverified_link_cannot_submit() {
        let api = valid_api();
        let mut form = ResetPasswordForm::new(Some("tok".to_string()));
        form.password = "longenough".to_string();
        form.confirmation = "longenough".to_string();

        assert!(matches!(form.submit(&api).await, Err(FormError::Validation(_))));
        assert_eq!(api.reset_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_used_link_cannot_submit_again() {
        let api = valid_api();
        let mut form = ResetPasswordForm::new(Some("tok".to_string()));
        form.verify_token(&api).await.unwrap();
        form.password = "longenough".to_string();
        form.confirmation = "longenough".to_string();
        form.submit(&api).await.unwrap();

        form.password = "longenough".to_string();
        form.confirmation = "longenough".to_string();
        let err = form.submit(&api).await.unwrap_err();
        assert_eq!(err.to_string(), "Password has already been reset");
        assert_eq!(api.reset_calls.load(Ordering::SeqCst), 1);
    }
}
