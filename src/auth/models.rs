// Authentication data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::validate_password_strength;

/// User role for coarse-grained authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Customer => write!(f, "customer"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// User database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    pub password_changed_at: DateTime<Utc>,
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the password was changed after a token with the given
    /// issued-at timestamp was signed. Comparison is in whole seconds,
    /// matching the resolution of the iat claim: a token issued in the
    /// same second as the change is still accepted.
    pub fn changed_password_after(&self, token_issued_at: i64) -> bool {
        token_issued_at < self.password_changed_at.timestamp()
    }
}

/// User response model (excludes password_hash and reset token fields)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Signup request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom = "validate_password_strength")]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}

/// Login request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Forgot-password request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Reset-password request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 32, message = "Invalid reset token"))]
    pub token: String,
    #[validate(custom = "validate_password_strength")]
    pub new_password: String,
}

/// Change-password request DTO for logged-in users
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password must not be empty"))]
    pub current_password: String,
    #[validate(custom = "validate_password_strength")]
    pub new_password: String,
}

/// Authentication response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Generic acknowledgement body for logout and forgot-password
#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    pub status: String,
    pub message: String,
}

impl AckResponse {
    pub fn new(message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use validator::Validate;

    fn sample_user(changed_at: DateTime<Utc>) -> User {
        User {
            id: 1,
            name: "Ali".to_string(),
            email: "ali@x.com".to_string(),
            role: Role::Customer,
            password_hash: "hash".to_string(),
            password_changed_at: changed_at,
            reset_token_hash: None,
            reset_token_expires_at: None,
            active: true,
            created_at: changed_at,
        }
    }

    #[test]
    fn token_issued_before_change_is_stale() {
        let changed_at = Utc::now();
        let user = sample_user(changed_at);
        let issued_earlier = (changed_at - Duration::seconds(60)).timestamp();
        assert!(user.changed_password_after(issued_earlier));
    }

    #[test]
    fn token_issued_after_change_is_fresh() {
        let changed_at = Utc::now();
        let user = sample_user(changed_at);
        let issued_later = (changed_at + Duration::seconds(60)).timestamp();
        assert!(!user.changed_password_after(issued_later));
    }

    #[test]
    fn token_issued_same_second_is_fresh() {
        let changed_at = Utc::now();
        let user = sample_user(changed_at);
        assert!(!user.changed_password_after(changed_at.timestamp()));
    }

    #[test]
    fn signup_rejects_password_mismatch() {
        let request = SignupRequest {
            name: "Ali".to_string(),
            email: "ali@x.com".to_string(),
            password: "secret123".to_string(),
            password_confirmation: "secret124".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn signup_rejects_short_password() {
        let request = SignupRequest {
            name: "Ali".to_string(),
            email: "ali@x.com".to_string(),
            password: "short".to_string(),
            password_confirmation: "short".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn signup_accepts_valid_request() {
        let request = SignupRequest {
            name: "Ali".to_string(),
            email: "ali@x.com".to_string(),
            password: "secret123".to_string(),
            password_confirmation: "secret123".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn user_response_excludes_secret_fields() {
        let user = sample_user(Utc::now());
        let response = UserResponse::from(user.clone());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("reset_token_hash").is_none());
        assert_eq!(json["email"], user.email);
    }
}
