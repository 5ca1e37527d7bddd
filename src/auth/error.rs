// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

use crate::auth::models::Role;

/// Authentication and authorization error types
///
/// Credential failures deliberately share a single message so callers cannot
/// tell an unknown email apart from a wrong password.
#[derive(Debug)]
pub enum AuthError {
    // Authentication errors
    ValidationError(String),
    InvalidCredentials,
    EmailAlreadyExists,
    MissingToken,
    InvalidToken,
    ExpiredToken,
    /// Token was issued before the user's most recent password change
    PasswordChanged,
    /// The account behind a valid token no longer exists (or was deactivated)
    UserNoLongerExists,

    // Password recovery errors
    /// Reset token unknown, already consumed, or past its expiry window
    InvalidResetToken,
    /// The out-of-band reset message could not be delivered
    NotificationFailed,

    // Authorization errors
    /// User lacks the role required for the operation
    InsufficientPermissions { actual: Role },

    // Internal errors, never exposed to callers
    DatabaseError(String),
    PasswordHashError,
    TokenGenerationError(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::EmailAlreadyExists => write!(f, "Email already exists"),
            AuthError::MissingToken => write!(f, "Missing authentication token"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::ExpiredToken => write!(f, "Token has expired"),
            AuthError::PasswordChanged => {
                write!(f, "Password was changed after this token was issued")
            }
            AuthError::UserNoLongerExists => {
                write!(f, "The user belonging to this token no longer exists")
            }
            AuthError::InvalidResetToken => write!(f, "Reset token is invalid or has expired"),
            AuthError::NotificationFailed => {
                write!(f, "Could not send the password reset message")
            }
            AuthError::InsufficientPermissions { actual } => {
                write!(f, "Insufficient permissions for role '{}'", actual)
            }
            AuthError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AuthError::PasswordHashError => write!(f, "Password hashing error"),
            AuthError::TokenGenerationError(msg) => write!(f, "Token generation error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::ValidationError(errors.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AuthError::InvalidCredentials => {
                // Same status and message whether the email is unknown or
                // the password is wrong
                (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string())
            }
            AuthError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Email already exists".to_string())
            }
            AuthError::MissingToken => {
                warn!("Missing token in request");
                (
                    StatusCode::UNAUTHORIZED,
                    "You are not logged in. Please log in to get access".to_string(),
                )
            }
            AuthError::InvalidToken => {
                warn!("Invalid token attempt");
                (StatusCode::UNAUTHORIZED, "Invalid token. Please log in again".to_string())
            }
            AuthError::ExpiredToken => {
                warn!("Expired token attempt");
                (
                    StatusCode::UNAUTHORIZED,
                    "Your session has expired. Please log in again".to_string(),
                )
            }
            AuthError::PasswordChanged => {
                warn!("Token issued before latest password change");
                (
                    StatusCode::UNAUTHORIZED,
                    "Password was recently changed. Please log in again".to_string(),
                )
            }
            AuthError::UserNoLongerExists => {
                warn!("Token references a missing or deactivated user");
                (
                    StatusCode::UNAUTHORIZED,
                    "The user belonging to this token no longer exists".to_string(),
                )
            }
            AuthError::InvalidResetToken => (
                StatusCode::BAD_REQUEST,
                "Reset token is invalid or has expired".to_string(),
            ),
            AuthError::NotificationFailed => {
                error!("Password reset message delivery failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not send the password reset message. Please try again later".to_string(),
                )
            }
            AuthError::InsufficientPermissions { actual } => {
                warn!("Authorization failed for role '{}'", actual);
                (
                    StatusCode::FORBIDDEN,
                    "You do not have permission to perform this action".to_string(),
                )
            }
            AuthError::DatabaseError(msg) => {
                error!("Database error in auth: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AuthError::PasswordHashError => {
                error!("Password hashing error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AuthError::TokenGenerationError(msg) => {
                error!("Token generation error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::EmailAlreadyExists => StatusCode::CONFLICT,
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::PasswordChanged
            | AuthError::UserNoLongerExists => StatusCode::UNAUTHORIZED,
            AuthError::InvalidResetToken => StatusCode::BAD_REQUEST,
            AuthError::NotificationFailed => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError
            | AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_failure_status_is_unauthorized() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn stale_token_errors_map_to_unauthorized() {
        assert_eq!(AuthError::PasswordChanged.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UserNoLongerExists.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn reset_token_failure_is_distinct_from_delivery_failure() {
        assert_eq!(AuthError::InvalidResetToken.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AuthError::NotificationFailed.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_never_leak_details() {
        let display = AuthError::DatabaseError("connection refused to 10.0.0.5".to_string());
        // Display carries the detail for logs; the HTTP body must not
        let response = display.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
