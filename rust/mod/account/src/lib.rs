//! Single-user account records: the profile and the security settings.
//!
//! Each lives in its own slot and has no relationship to production data.

pub mod model;
pub mod password;
pub mod profile;
pub mod security;
mod slot;

pub use model::{LoginEvent, SecuritySettings, UserProfile};
pub use profile::{ProfileStore, PROFILE_SLOT};
pub use security::{SecurityStore, MAX_LOGIN_ACTIVITY, MIN_PASSWORD_LEN, SECURITY_SLOT};
