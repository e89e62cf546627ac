use std::sync::Arc;

use quesera_core::{merge_patch, now_rfc3339, ServiceError};
use quesera_kv::KVStore;
use tracing::info;

use crate::model::UserProfile;
use crate::slot;

/// Slot holding the serialized profile.
pub const PROFILE_SLOT: &str = "quesera:profile";

pub struct ProfileStore {
    kv: Arc<dyn KVStore>,
}

impl ProfileStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    /// The stored profile, or an empty one if none was saved yet.
    pub fn get(&self) -> Result<UserProfile, ServiceError> {
        slot::read(self.kv.as_ref(), PROFILE_SLOT)
    }

    /// Replace the profile. Full name and email must be non-blank.
    pub fn save(&self, mut profile: UserProfile) -> Result<UserProfile, ServiceError> {
        let missing = profile.missing_fields();
        if !missing.is_empty() {
            return Err(ServiceError::Validation(format!(
                "required: {}",
                missing.join(", ")
            )));
        }
        profile.full_name = profile.full_name.trim().to_string();
        profile.email = profile.email.trim().to_string();
        profile.updated_at = now_rfc3339();

        slot::write(self.kv.as_ref(), PROFILE_SLOT, &profile)?;
        info!("Profile saved for {}", profile.email);
        Ok(profile)
    }

    /// Shallow merge-patch onto the stored profile, then save.
    pub fn update(&self, patch: &serde_json::Value) -> Result<UserProfile, ServiceError> {
        let mut base = serde_json::to_value(self.get()?)?;
        merge_patch(&mut base, patch);
        let profile: UserProfile = serde_json::from_value(base)
            .map_err(|e| ServiceError::Validation(format!("invalid profile patch: {}", e)))?;
        self.save(profile)
    }
}
