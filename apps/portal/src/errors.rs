use thiserror::Error;

use crate::forms::Notice;
use crate::gateway::GatewayError;

/// Generic message shown when the backend could not be reached at all.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// User-facing failure of a controller action.
/// Every variant is recoverable: the user can fix the input or retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Local validation failed; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// Another submission from the same component is still in flight.
    #[error("A submission is already in progress")]
    Busy,

    /// The backend rejected the request.
    #[error("{0}")]
    Server(String),

    #[error("{}", GENERIC_FAILURE)]
    Network,

    /// The owning component went away before the response arrived.
    #[error("Component was unmounted before the response arrived")]
    Unmounted,
}

impl FormError {
    pub fn validation(message: impl Into<String>) -> Self {
        FormError::Validation(message.into())
    }

    /// Converts a gateway failure, preferring the server's own message and
    /// falling back to `fallback` when the server did not report one.
    pub fn from_gateway(err: &GatewayError, fallback: &str) -> Self {
        match err {
            GatewayError::Api {
                message: Some(message),
                ..
            } => FormError::Server(message.clone()),
            GatewayError::Api { message: None, .. } | GatewayError::Decode(_) => {
                FormError::Server(fallback.to_string())
            }
            GatewayError::Transport(_) | GatewayError::Io(_) => FormError::Network,
        }
    }

    pub fn notice(&self) -> Notice {
        Notice::error(self.to_string())
    }
}
