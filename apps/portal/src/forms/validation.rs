use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::errors::FormError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Deliberately permissive: something@something.tld, no whitespace.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

pub fn require(value: &str, message: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::validation(message))
    } else {
        Ok(())
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_email(email: &str) -> Result<(), FormError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(FormError::validation("Please enter a valid email address"))
    }
}

/// Length first, then confirmation.
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), FormError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    if password != confirmation {
        return Err(FormError::validation("Passwords do not match"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

/// Scores five signals: upper, lower, digit, special character, length.
/// Returns `None` for an empty password.
pub fn password_strength(password: &str) -> Option<PasswordStrength> {
    if password.is_empty() {
        return None;
    }
    let signals = [
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| SPECIAL_CHARS.contains(c)),
        password.chars().count() >= MIN_PASSWORD_LEN,
    ];
    let score = signals.iter().filter(|s| **s).count();
    Some(match score {
        0..=2 => PasswordStrength::Weak,
        3..=4 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    })
}

/// Splits newline-separated text into trimmed, non-blank lines, order kept.
pub fn lines_to_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
