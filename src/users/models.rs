// Account profile DTOs

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Profile update request DTO
///
/// The password field exists only so the handler can reject attempts to
/// change the password through this route.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateMeRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn empty_update_is_valid() {
        let request = UpdateMeRequest {
            name: None,
            email: None,
            password: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let request = UpdateMeRequest {
            name: None,
            email: Some("not-an-email".to_string()),
            password: None,
        };
        assert!(request.validate().is_err());
    }
}
