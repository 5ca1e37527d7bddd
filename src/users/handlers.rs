// HTTP handlers for account profile endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::{error::AuthError, middleware::CurrentUser, models::UserResponse};
use crate::users::models::UpdateMeRequest;
use crate::AppState;

/// Update the logged-in user's profile (name and email only)
/// PATCH /api/users/update-me
#[utoipa::path(
    patch,
    path = "/api/users/update-me",
    request_body = UpdateMeRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid input or password field present"),
        (status = 409, description = "Email already registered")
    ),
    tag = "users"
)]
pub async fn update_me_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>, AuthError> {
    if request.password.is_some() {
        return Err(AuthError::ValidationError(
            "This route is not for password updates. Use /api/users/update-me-password".to_string(),
        ));
    }
    request.validate()?;

    let updated = state
        .users
        .update_profile(user.id, request.name.as_deref(), request.email.as_deref())
        .await?;

    tracing::debug!("Profile updated for user {}", updated.id);
    Ok(Json(UserResponse::from(updated)))
}

/// Deactivate the logged-in user's account
/// DELETE /api/users/delete-me
#[utoipa::path(
    delete,
    path = "/api/users/delete-me",
    responses(
        (status = 204, description = "Account deactivated"),
        (status = 401, description = "Not authenticated")
    ),
    tag = "users"
)]
pub async fn delete_me_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, AuthError> {
    state.users.deactivate(user.id).await?;

    tracing::info!("Account deactivated for user {}", user.id);
    Ok(StatusCode::NO_CONTENT)
}

/// List all active users (admin only)
/// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Active users", body = Vec<UserResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    ),
    tag = "users"
)]
pub async fn list_users_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AuthError> {
    let users = state.users.list_active().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
