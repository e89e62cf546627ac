use std::sync::Arc;

use quesera_core::{now_rfc3339, ServiceError};
use quesera_kv::KVStore;
use tracing::info;

use crate::model::{LoginEvent, SecuritySettings};
use crate::password::{hash_password, verify_password};
use crate::slot;

/// Slot holding the serialized security settings.
pub const SECURITY_SLOT: &str = "quesera:security";

/// Shortest accepted new password.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Login-activity entries kept; older ones are dropped.
pub const MAX_LOGIN_ACTIVITY: usize = 20;

pub struct SecurityStore {
    kv: Arc<dyn KVStore>,
}

impl SecurityStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    pub fn settings(&self) -> Result<SecuritySettings, ServiceError> {
        slot::read(self.kv.as_ref(), SECURITY_SLOT)
    }

    fn save(&self, settings: &SecuritySettings) -> Result<(), ServiceError> {
        slot::write(self.kv.as_ref(), SECURITY_SLOT, settings)
    }

    /// Change (or first set) the account password.
    ///
    /// Once a password exists, `current` must verify against it.
    pub fn change_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), ServiceError> {
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::Validation(format!(
                "new password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if new != confirm {
            return Err(ServiceError::Validation(
                "password confirmation does not match".into(),
            ));
        }

        let mut settings = self.settings()?;
        if let Some(hash) = &settings.password_hash {
            if !verify_password(current, hash) {
                return Err(ServiceError::Unauthorized(
                    "current password is incorrect".into(),
                ));
            }
            if new == current {
                return Err(ServiceError::Validation(
                    "new password must differ from the current one".into(),
                ));
            }
        }

        settings.password_hash = Some(hash_password(new)?);
        settings.password_changed_at = Some(now_rfc3339());
        self.save(&settings)?;
        info!("Account password changed");
        Ok(())
    }

    /// Check a password against the stored hash. False when none is set.
    pub fn verify(&self, password: &str) -> Result<bool, ServiceError> {
        Ok(self
            .settings()?
            .password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(password, hash)))
    }

    pub fn set_two_factor(&self, enabled: bool) -> Result<SecuritySettings, ServiceError> {
        let mut settings = self.settings()?;
        settings.two_factor_enabled = enabled;
        self.save(&settings)?;
        info!("Two-factor authentication {}", if enabled { "enabled" } else { "disabled" });
        Ok(settings)
    }

    /// Prepend a login to the activity list. A `current` login clears the
    /// current flag on every older entry.
    pub fn record_login(
        &self,
        device: &str,
        location: &str,
        current: bool,
    ) -> Result<LoginEvent, ServiceError> {
        let mut settings = self.settings()?;
        if current {
            for event in &mut settings.login_activity {
                event.current = false;
            }
        }

        let event = LoginEvent {
            device: device.to_string(),
            location: location.to_string(),
            at: now_rfc3339(),
            current,
        };
        settings.login_activity.insert(0, event.clone());
        settings.login_activity.truncate(MAX_LOGIN_ACTIVITY);
        self.save(&settings)?;
        Ok(event)
    }

    /// Login activity, most recent first.
    pub fn login_activity(&self) -> Result<Vec<LoginEvent>, ServiceError> {
        Ok(self.settings()?.login_activity)
    }

    /// Drop every non-current entry ("sign out other sessions").
    /// Returns how many were removed.
    pub fn clear_other_sessions(&self) -> Result<usize, ServiceError> {
        let mut settings = self.settings()?;
        let before = settings.login_activity.len();
        settings.login_activity.retain(|e| e.current);
        let removed = before - settings.login_activity.len();
        if removed > 0 {
            self.save(&settings)?;
            info!("Signed out {} other sessions", removed);
        }
        Ok(removed)
    }
}
