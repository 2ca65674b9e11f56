//! Authentication and authorization
//!
//! The access guard is an extractor: protected handlers take an
//! [`AuthUser`] argument and never see a request that failed
//! verification. The guard checks the bearer token, then resolves the
//! subject against the credential store so a deleted user's tokens stop
//! working immediately.

pub mod handlers;
pub mod jwt;
pub mod password;
pub mod store;


use crate::AppState;
use apptrack_core::UserProfile;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jwt::AuthError;
use tracing::debug;

/// Authenticated identity attached to the request
///
/// Carries the public profile only; the password hash is stripped before
/// the identity reaches any handler.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserProfile);

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // Extract the token from the authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        // Verify signature and expiry
        let claims = app_state.tokens.verify(token)?;

        // Resolve the subject to a live user record
        let user = app_state
            .users
            .find_by_id(&claims.sub)
            .await
            .map_err(|_| AuthError::Internal)?
            .ok_or_else(|| {
                debug!("token subject no longer exists: {}", claims.sub);
                AuthError::UnknownUser
            })?;

        Ok(AuthUser(user.profile()))
    }
}
