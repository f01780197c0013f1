// Form controllers: job post/edit, password reset, profile edit, admin catalog.
// Each splits a submission into begin (validate + gate), one gateway call, and
// complete (apply result), with an async `submit` running all three.

pub mod catalog_form;
pub mod job_form;
pub mod lifecycle;
pub mod password;
pub mod profile_form;
pub mod validation;

use serde::Serialize;

pub use catalog_form::CatalogEntryForm;
pub use job_form::{JobDraft, JobForm, JobFormMode};
pub use lifecycle::{Liveness, SubmitGate, Ticket};
pub use password::{ForgotPasswordForm, ResetPasswordForm, TokenState};
pub use profile_form::ProfileForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient, user-facing notification (the toast of a web UI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = match self.level {
            NoticeLevel::Success => "✓",
            NoticeLevel::Info => "i",
            NoticeLevel::Error => "✗",
        };
        write!(f, "{marker} {}", self.message)
    }
}
