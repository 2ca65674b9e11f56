//! Apptrack Web Server
//!
//! REST API for appointment scheduling: user registration and login with
//! JWT bearer tokens, and per-user appointment CRUD behind an ownership
//! check.

pub mod auth;
pub mod database;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use error::ApiError;
pub use server::{ApptrackServer, ApptrackServerBuilder};
pub use state::AppState;

use apptrack_core::AuthConfig;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    // Configure CORS for the React development frontend
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_origin("http://127.0.0.1:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    Router::new()
        // API routes
        .nest("/api", routes::api_routes())
        // OpenAPI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .fallback(handlers::not_found)
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB max body size
        .with_state(state)
}

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable development mode
    pub dev_mode: bool,
    /// Database URL (defaults to an in-memory database)
    pub database_url: Option<String>,
    /// Authentication settings
    pub auth: AuthConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            dev_mode: false,
            database_url: None,
            auth: AuthConfig::default(),
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("APPTRACK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("APPTRACK_PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .unwrap_or(5001),
            dev_mode: std::env::var("APPTRACK_DEV_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            database_url: std::env::var("DATABASE_URL").ok(),
            auth: AuthConfig::from_env(),
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;
