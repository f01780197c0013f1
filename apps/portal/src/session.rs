use crate::config::Config;
use crate::errors::FormError;
use crate::models::user::Role;

/// Who is using the client. Passed explicitly to whatever needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<String>,
    pub role: Option<Role>,
    pub token: Option<String>,
}

impl Session {
    pub fn from_config(config: &Config) -> Self {
        Self {
            user_id: config.user_id.clone(),
            role: config.user_role,
            token: config.api_token.clone(),
        }
    }

    /// Profile endpoints accept "current" for the signed-in user.
    pub fn user_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or("current")
    }

    pub fn role_or(&self, fallback: Role) -> Role {
        self.role.unwrap_or(fallback)
    }

    pub fn require_token(&self) -> Result<&str, FormError> {
        self.token
            .as_deref()
            .ok_or_else(|| FormError::validation("You must be signed in as an admin (set PORTAL_API_TOKEN)"))
    }
}
