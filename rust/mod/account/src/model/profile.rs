use serde::{Deserialize, Serialize};

/// The farm operator's profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Required.
    #[serde(default)]
    pub full_name: String,

    /// Required.
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    /// Name of the farm or dairy.
    #[serde(default)]
    pub farm_name: String,

    /// Role on the farm (e.g. "Maestro quesero").
    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub bio: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
}

impl UserProfile {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.full_name.trim().is_empty() {
            missing.push("fullName");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        missing
    }
}
