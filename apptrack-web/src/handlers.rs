//! HTTP request handlers for the apptrack web server

pub mod appointments;
pub mod health;
pub mod types;

pub use appointments::*;
pub use health::*;
pub use types::*;

use crate::error::ApiError;

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
