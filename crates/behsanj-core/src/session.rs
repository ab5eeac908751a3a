//! Explicit login sessions.
//!
//! There is deliberately no global "current user" slot: a [`Session`] is
//! created at login, handed to whatever needs it, and dropped at logout.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::models::{Role, Settings};

const FALLBACK_DEVELOPER_PASSWORD: &str = "111";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("wrong password for user: {0}")]
    WrongPassword(String),

    #[error("wrong developer password")]
    WrongDeveloperPassword,
}

/// An authenticated session. Read-only after creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

impl Session {
    /// Log a roster user in. A password is checked only for accounts that
    /// have one enabled.
    pub fn login(
        settings: &Settings,
        username: &str,
        password: Option<&str>,
    ) -> Result<Self, AuthError> {
        let user = settings
            .find_user(username)
            .ok_or_else(|| AuthError::UnknownUser(username.to_string()))?;

        if user.is_password_enabled {
            let expected = user.password.as_deref().unwrap_or_default();
            if password != Some(expected) {
                return Err(AuthError::WrongPassword(username.to_string()));
            }
        }

        Ok(Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
            display_name: user.name.clone(),
            role: user.role,
        })
    }

    /// The developer panel is gated by a single shared password rather than a
    /// roster account.
    pub fn developer(settings: &Settings, password: &str) -> Result<Self, AuthError> {
        let expected = settings
            .developer_password
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(FALLBACK_DEVELOPER_PASSWORD);
        if password != expected {
            return Err(AuthError::WrongDeveloperPassword);
        }
        Ok(Self {
            user_id: "developer".to_string(),
            username: "developer".to_string(),
            display_name: "Developer".to_string(),
            role: Role::Developer,
        })
    }

    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }
}
