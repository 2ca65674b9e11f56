//! Authentication handlers for user registration, login, and identity lookup

use super::{
    store::{AuthResponse, LoginRequest, RegisterRequest},
    AuthUser,
};
use crate::{error::ApiError, AppState};
use apptrack_core::UserProfile;
use axum::{extract::State, http::StatusCode, response::Json};
use tracing::info;

/// User registration endpoint
///
/// Creates a new account and returns the identity summary together with a
/// freshly issued token.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    summary = "Register a new user",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let user = state.users.register(request).await?;
    let token = state.tokens.issue(&user.id)?;

    info!("user registered: {}", user.id);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        }),
    ))
}

/// User login endpoint
///
/// Unknown email and wrong password produce the identical response.
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    summary = "Authenticate a user",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_user(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state.users.authenticate(request).await?;
    let token = state.tokens.issue(&user.id)?;

    info!("user logged in: {}", user.id);
    Ok(Json(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    }))
}

/// Get current user information
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    summary = "Get the authenticated identity",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_me(AuthUser(profile): AuthUser) -> Json<UserProfile> {
    Json(profile)
}
