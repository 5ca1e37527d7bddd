// Session token generation and validation service

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user id
    pub iat: i64, // issued at timestamp
    pub exp: i64, // expiration timestamp
}

/// Token service for stateless session tokens
///
/// The signing secret is injected at construction; swapping the key means
/// constructing a new service, callers never touch key material.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    session_ttl: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService from a signing secret and a validity
    /// window in seconds
    pub fn new(secret: &str, session_ttl: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl,
        }
    }

    /// Issue a session token for a user
    pub fn issue(&self, user_id: i32) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + self.session_ttl,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Verify a session token, returning its claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_TTL: i64 = 90 * 24 * 60 * 60;

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes", TEST_TTL)
    }

    #[test]
    fn issued_token_verifies_and_carries_identity() {
        let service = test_token_service();
        let token = service.issue(42).unwrap();
        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, 42);
    }

    #[test]
    fn expiry_matches_configured_window() {
        let service = test_token_service();
        let token = service.issue(1).unwrap();
        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, TEST_TTL);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let service = test_token_service();
        assert!(matches!(service.verify(""), Err(AuthError::InvalidToken)));
        assert!(matches!(service.verify("not.a.token"), Err(AuthError::InvalidToken)));
        assert!(matches!(
            service.verify("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let service1 = TokenService::new("secret1", TEST_TTL);
        let service2 = TokenService::new("secret2", TEST_TTL);

        let token = service1.issue(1).unwrap();
        assert!(service1.verify(&token).is_ok());
        assert!(matches!(service2.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let service = test_token_service();

        // Sign an already-expired token with the same secret
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            iat: now - 1000,
            exp: now - 500,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_key_for_testing_purposes".as_bytes()),
        )
        .unwrap();

        assert!(matches!(service.verify(&token), Err(AuthError::ExpiredToken)));
    }

    proptest! {
        #[test]
        fn prop_issued_tokens_roundtrip(user_id in 1i32..1000000) {
            let service = test_token_service();
            let token = service.issue(user_id)?;
            let claims = service.verify(&token)?;
            prop_assert_eq!(claims.sub, user_id);
            prop_assert_eq!(claims.exp - claims.iat, TEST_TTL);
        }

        #[test]
        fn prop_random_strings_rejected(malformed in "[a-zA-Z0-9]{10,50}") {
            let service = test_token_service();
            prop_assert!(service.verify(&malformed).is_err());
        }
    }
}
