use serde::{Deserialize, Serialize};

/// Account security state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    /// Argon2id hash. None until a password is first set. Never printed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    /// RFC 3339 time of the last password change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_changed_at: Option<String>,

    #[serde(default)]
    pub two_factor_enabled: bool,

    /// Most recent first.
    #[serde(default)]
    pub login_activity: Vec<LoginEvent>,
}

impl SecuritySettings {
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// One entry of the login-activity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginEvent {
    /// Device or browser description.
    pub device: String,
    pub location: String,
    /// RFC 3339 timestamp.
    pub at: String,
    /// Whether this is the session in use.
    #[serde(default)]
    pub current: bool,
}
