// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    middleware::CurrentUser,
    models::{
        AckResponse, AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest,
        ResetPasswordRequest, SignupRequest, UserResponse,
    },
};
use crate::AppState;

/// Register a new user
/// POST /api/users/signup
#[utoipa::path(
    post,
    path = "/api/users/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Invalid input data"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    let response = state.auth.signup(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log a user in
/// POST /api/users/login
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth.login(request).await?;
    Ok(Json(response))
}

/// Log out
/// GET /api/users/logout
///
/// Sessions are stateless, so logging out means the client discards its
/// token; there is no server-side session to destroy.
#[utoipa::path(
    get,
    path = "/api/users/logout",
    responses((status = 200, description = "Logout acknowledged", body = AckResponse)),
    tag = "auth"
)]
pub async fn logout_handler() -> Json<AckResponse> {
    Json(AckResponse::new("Logged out. Discard your session token"))
}

/// Start password recovery
/// POST /api/users/forgot-password
///
/// Responds with the same acknowledgement whether or not the email is
/// registered.
#[utoipa::path(
    post,
    path = "/api/users/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Acknowledged", body = AckResponse),
        (status = 500, description = "Reset message could not be delivered")
    ),
    tag = "auth"
)]
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<AckResponse>, AuthError> {
    request.validate()?;
    state.auth.forgot_password(&request.email).await?;
    Ok(Json(AckResponse::new(
        "If that email is registered, a reset token has been sent",
    )))
}

/// Complete password recovery with a reset token
/// PATCH /api/users/reset-password
#[utoipa::path(
    patch,
    path = "/api/users/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = AuthResponse),
        (status = 400, description = "Reset token invalid or expired")
    ),
    tag = "auth"
)]
pub async fn reset_password_handler(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth.reset_password(request).await?;
    Ok(Json(response))
}

/// Change the password of the logged-in user
/// PATCH /api/users/update-me-password
#[utoipa::path(
    patch,
    path = "/api/users/update-me-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = AuthResponse),
        (status = 401, description = "Current password incorrect")
    ),
    tag = "auth"
)]
pub async fn change_password_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth.change_password(&user, request).await?;
    Ok(Json(response))
}

/// Get the logged-in user's profile
/// GET /api/users/get-me
#[utoipa::path(
    get,
    path = "/api/users/get-me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated")
    ),
    tag = "auth"
)]
pub async fn me_handler(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}
