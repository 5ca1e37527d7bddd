// Password hashing and verification service

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::auth::error::AuthError;

/// Password service for hashing and verification
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a freshly generated salt
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {}", e);
                AuthError::PasswordHashError
            })?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash
    ///
    /// Total: a malformed stored hash yields false, never an error.
    pub fn verify_password(password: &str, stored_hash: &str) -> bool {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                return false;
            }
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = PasswordService::hash_password("secret123").unwrap();
        assert!(PasswordService::verify_password("secret123", &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = PasswordService::hash_password("secret123").unwrap();
        assert!(!PasswordService::verify_password("secret124", &hash));
    }

    #[test]
    fn verify_returns_false_on_malformed_hash() {
        assert!(!PasswordService::verify_password("anything", "not-a-phc-string"));
        assert!(!PasswordService::verify_password("anything", ""));
    }

    #[test]
    fn hashes_are_salted() {
        let first = PasswordService::hash_password("secret123").unwrap();
        let second = PasswordService::hash_password("secret123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn hash_never_contains_plaintext() {
        let hash = PasswordService::hash_password("secret123").unwrap();
        assert!(!hash.contains("secret123"));
    }
}
