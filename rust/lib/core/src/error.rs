use quesera_kv::KVError;
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Callers match on these,
// never on the human-readable message string.

pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const READ_ONLY: &str = "READ_ONLY";
    pub const INTERNAL: &str = "INTERNAL";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified error type shared by the production and account stores.
///
/// Each variant maps to a stable code in [`error_code`]. Display is the bare
/// message, e.g. `batch 'abc' not found`.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Required input missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// Credentials did not verify.
    #[error("{0}")]
    Unauthorized(String),

    /// Attempted write to a seed (read-only) key.
    #[error("{0}")]
    ReadOnly(String),

    /// Storage backend failure.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error (serialization, hashing).
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::Unauthorized(_) => error_code::UNAUTHENTICATED,
            ServiceError::ReadOnly(_) => error_code::READ_ONLY,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}

impl From<KVError> for ServiceError {
    fn from(e: KVError) -> Self {
        match e {
            KVError::ReadOnly(key) => ServiceError::ReadOnly(format!("key '{}' is read-only", key)),
            KVError::Serialization(msg) => ServiceError::Internal(msg),
            other => ServiceError::Storage(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Internal(format!("serde: {}", e))
    }
}
