//! JWT issuance and verification
//!
//! Tokens are self-contained HS256 JWTs carrying the subject id, issue
//! time, and a fixed expiry horizon. The signing keys are built from
//! injected configuration at startup; there is no process-global secret.

use crate::error::ApiError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    fn new(user_id: &str, ttl_days: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::days(ttl_days);

        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// JWT signing and verification keys
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Token issuer and verifier
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
    ttl_days: i64,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_days: i64) -> Self {
        Self {
            keys: Arc::new(Keys::new(secret)),
            ttl_days,
        }
    }

    /// Mint a token asserting the given subject
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        let claims = Claims::new(user_id, self.ttl_days);
        encode(&Header::default(), &claims, &self.keys.encoding).map_err(|e| {
            warn!("Failed to encode JWT token: {}", e);
            AuthError::TokenCreation
        })
    }

    /// Verify signature and expiry, returning the decoded claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| {
                debug!("Token verification failed: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })?;

        let claims = token_data.claims;

        if claims.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_days", &self.ttl_days)
            .finish_non_exhaustive()
    }
}

/// Authentication errors surfaced by the token layer and the access guard
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token creation failed")]
    TokenCreation,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing authorization header")]
    MissingAuthHeader,
    #[error("Unknown token subject")]
    UnknownUser,
    #[error("Internal error")]
    Internal,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::TokenCreation => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create authentication token",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or malformed token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token has expired"),
            AuthError::MissingAuthHeader => (
                StatusCode::UNAUTHORIZED,
                "Authorization header is required",
            ),
            // Same body as a bad token: whether the subject ever existed
            // is not disclosed.
            AuthError::UnknownUser => (StatusCode::UNAUTHORIZED, "Invalid or malformed token"),
            AuthError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!"),
        };

        let body = Json(json!({ "message": message }));

        (status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenCreation => {
                ApiError::internal("failed to create authentication token")
            }
            AuthError::Internal => ApiError::internal("authentication backend failure"),
            AuthError::InvalidToken | AuthError::UnknownUser => {
                ApiError::unauthorized("Invalid or malformed token")
            }
            AuthError::TokenExpired => ApiError::unauthorized("Token has expired"),
            AuthError::MissingAuthHeader => {
                ApiError::unauthorized("Authorization header is required")
            }
        }
    }
}
