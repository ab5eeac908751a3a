use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    Guest,
    Staff,
    Admin,
    /// The developer panel is a password-gated route rather than a stored
    /// role, but sessions still carry it.
    Developer,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AppUser {
    pub id: String,
    /// Login key; unique across the roster.
    pub username: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default)]
    pub password: Option<String>,
    pub is_password_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_color: Option<String>,
}

/// Who may change whose password. The rule set the backend enforces, kept
/// data-driven so the roster can change without touching code.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PasswordPolicy {
    /// Usernames that may only ever change their own password.
    pub self_only: Vec<String>,
    pub managers: Vec<String>,
    pub supervisors: Vec<String>,
    /// Accounts nobody else may touch.
    pub protected: Vec<String>,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            self_only: vec!["mahlouji".into()],
            managers: vec!["matlabi".into(), "kand".into()],
            supervisors: vec!["mostafavi".into()],
            protected: vec![
                "matlabi".into(),
                "kand".into(),
                "mahlouji".into(),
                "mostafavi".into(),
            ],
        }
    }
}

impl PasswordPolicy {
    /// Whether `current` may set a new password for `target`.
    ///
    /// Changing one's own password is always allowed. A self-only account may
    /// never change anyone else's. Managers and supervisors may change any
    /// account outside the protected set. Everything else is denied.
    pub fn can_change(&self, current: &AppUser, target: &AppUser) -> bool {
        if current.id == target.id {
            return true;
        }
        if self.self_only.iter().any(|u| u == &current.username) {
            return false;
        }
        let is_elevated = self.managers.iter().any(|u| u == &current.username)
            || self.supervisors.iter().any(|u| u == &current.username);
        let target_protected = self.protected.iter().any(|u| u == &target.username);
        is_elevated && !target_protected
    }
}
