//! Password hashing for the account security record.
//!
//! Hashes are argon2id PHC strings (`$argon2id$v=19$...`), so the salt and
//! parameters travel with the hash and nothing else needs storing.

use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use quesera_core::ServiceError;

/// Produce the stored form of a new password, freshly salted.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::Internal(format!("hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Whether `password` matches the stored hash. Anything that is not a PHC
/// string is treated as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
