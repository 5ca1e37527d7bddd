// Single-use password reset tokens
//
// Reset tokens are high-entropy random secrets, so a fast SHA-256 digest is
// enough for at-rest storage; the slow password hasher is not used here.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// A freshly generated reset token
///
/// The plaintext is handed to the user exactly once; only the hash is
/// persisted.
pub struct IssuedResetToken {
    pub plaintext: String,
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Generator for single-use, expiring reset tokens
#[derive(Clone)]
pub struct ResetTokenGenerator {
    ttl: Duration,
}

impl ResetTokenGenerator {
    /// Create a generator with the given validity window
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Generate a new reset token: 32 bytes of OS entropy, hex encoded
    pub fn generate(&self) -> IssuedResetToken {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);

        let plaintext: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        let hash = Self::hash_token(&plaintext);
        let expires_at = Utc::now() + self.ttl;

        IssuedResetToken {
            plaintext,
            hash,
            expires_at,
        }
    }

    /// Hash a reset token plaintext with SHA-256
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Check a plaintext token against a stored hash
    pub fn matches(token: &str, stored_hash: &str) -> bool {
        Self::hash_token(token) == stored_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_matches_its_own_hash() {
        let generator = ResetTokenGenerator::new(10);
        let issued = generator.generate();
        assert!(ResetTokenGenerator::matches(&issued.plaintext, &issued.hash));
    }

    #[test]
    fn wrong_plaintext_does_not_match() {
        let generator = ResetTokenGenerator::new(10);
        let issued = generator.generate();
        assert!(!ResetTokenGenerator::matches("deadbeef", &issued.hash));
    }

    #[test]
    fn plaintext_is_never_stored_verbatim() {
        let generator = ResetTokenGenerator::new(10);
        let issued = generator.generate();
        assert_ne!(issued.plaintext, issued.hash);
    }

    #[test]
    fn tokens_are_unique() {
        let generator = ResetTokenGenerator::new(10);
        let first = generator.generate();
        let second = generator.generate();
        assert_ne!(first.plaintext, second.plaintext);
    }

    #[test]
    fn plaintext_carries_32_bytes_of_entropy() {
        let generator = ResetTokenGenerator::new(10);
        let issued = generator.generate();
        // 32 bytes hex encoded
        assert_eq!(issued.plaintext.len(), 64);
        assert!(issued.plaintext.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn expiry_is_the_configured_window_from_now() {
        let generator = ResetTokenGenerator::new(10);
        let before = Utc::now();
        let issued = generator.generate();
        let after = Utc::now();

        assert!(issued.expires_at >= before + Duration::minutes(10));
        assert!(issued.expires_at <= after + Duration::minutes(10));
    }
}
