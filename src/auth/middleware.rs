// Access control middleware for protected routes
//
// Authentication is an ordered pipeline with typed rejections: extract the
// bearer credential, verify the token, re-resolve the user, reject tokens
// issued before the last password change, then attach the identity to the
// request. Role checks compose as a second stage after it.

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::{
    error::AuthError,
    models::{Role, User},
};
use crate::AppState;

/// Resolved identity attached to the request context by `protect`
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Extract the bearer credential from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)
}

/// Run the full authentication pipeline for a request
///
/// Steps, in order: bearer extraction, token verification, user lookup
/// (accounts deleted since issuance fail here), staleness check against
/// password_changed_at.
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, AuthError> {
    let token = bearer_token(headers)?;
    let claims = state.tokens.verify(token)?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or(AuthError::UserNoLongerExists)?;

    if user.changed_password_after(claims.iat) {
        return Err(AuthError::PasswordChanged);
    }

    Ok(user)
}

/// Authentication middleware guarding protected routes
///
/// On success the resolved user is inserted into the request extensions,
/// where the `CurrentUser` extractor picks it up for handlers.
pub async fn protect(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();

    let user = authenticate(&state, request.headers()).await.map_err(|e| {
        warn!("Authentication failed for {}: {}", endpoint, e);
        e
    })?;

    debug!("Authenticated user {} for {}", user.id, endpoint);
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Populated by the protect middleware; absent means the route was
        // wired without it
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Authorization middleware restricting a route to a set of roles
///
/// Must be composed after `protect`; it reads the identity that `protect`
/// attached.
#[derive(Debug, Clone)]
pub struct RequireRole {
    allowed: &'static [Role],
}

impl RequireRole {
    /// Create a middleware allowing any of the given roles
    pub fn new(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    /// Create a middleware that requires the admin role
    pub fn admin() -> Self {
        Self::new(&[Role::Admin])
    }

    fn check(&self, role: Role) -> Result<(), AuthError> {
        if self.allowed.contains(&role) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions { actual: role })
        }
    }

    /// Middleware function enforcing the role requirement
    pub async fn middleware(
        self,
        request: Request<Body>,
        next: Next,
    ) -> Result<Response, AuthError> {
        let endpoint = request.uri().path();

        let CurrentUser(user) = request
            .extensions()
            .get::<CurrentUser>()
            .ok_or(AuthError::MissingToken)?;

        self.check(user.role).map_err(|e| {
            warn!(
                "Authorization failed: user_id={}, role={}, endpoint={}",
                user.id, user.role, endpoint
            );
            e
        })?;

        debug!(
            "Authorization successful: user_id={}, role={}, endpoint={}",
            user.id, user.role, endpoint
        );
        Ok(next.run(request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn bearer_token_extracts_credential() {
        let headers = headers_with_auth("Bearer some.token.here");
        assert_eq!(bearer_token(&headers).unwrap(), "some.token.here");
    }

    #[test]
    fn missing_header_is_missing_token() {
        let headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingToken)));
    }

    #[test]
    fn non_bearer_schemes_are_rejected() {
        for value in ["Basic dXNlcjpwYXNz", "token_without_scheme", "bearer lowercase"] {
            let headers = headers_with_auth(value);
            assert!(
                matches!(bearer_token(&headers), Err(AuthError::InvalidToken)),
                "{} must be rejected",
                value
            );
        }
    }

    #[test]
    fn admin_guard_allows_admin() {
        assert!(RequireRole::admin().check(Role::Admin).is_ok());
    }

    #[test]
    fn admin_guard_denies_customer() {
        let result = RequireRole::admin().check(Role::Customer);
        match result {
            Err(AuthError::InsufficientPermissions { actual }) => {
                assert_eq!(actual, Role::Customer);
            }
            _ => panic!("Expected InsufficientPermissions error"),
        }
    }

    #[test]
    fn multi_role_guard_allows_each_listed_role() {
        let guard = RequireRole::new(&[Role::Customer, Role::Admin]);
        assert!(guard.check(Role::Customer).is_ok());
        assert!(guard.check(Role::Admin).is_ok());
    }

    proptest! {
        #[test]
        fn prop_headers_without_bearer_prefix_rejected(value in "[a-zA-Z0-9 ]{1,40}") {
            prop_assume!(!value.starts_with("Bearer "));
            let headers = headers_with_auth(&value);
            prop_assert!(bearer_token(&headers).is_err());
        }
    }
}
