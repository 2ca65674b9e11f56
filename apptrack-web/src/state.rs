//! Application state wiring

use crate::{
    auth::{jwt::TokenService, password::Hasher, store::UserStore},
    database::AppointmentStore,
    WebConfig, WebError, WebResult,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: WebConfig,
    /// Credential store
    pub users: UserStore,
    /// Appointment store
    pub appointments: AppointmentStore,
    /// Token issuer and verifier
    pub tokens: TokenService,
}

impl AppState {
    /// Create a new application state
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        let secret = match config.auth.jwt_secret.clone() {
            Some(secret) => secret,
            None if config.dev_mode => {
                warn!(
                    "APPTRACK_JWT_SECRET is not set; using an ephemeral dev secret. \
                     Issued tokens will not survive a restart."
                );
                uuid::Uuid::new_v4().to_string()
            }
            None => {
                return Err(WebError::Config(
                    "APPTRACK_JWT_SECRET must be set (or enable dev mode)".to_string(),
                ))
            }
        };

        let database_url = config
            .database_url
            .clone()
            .unwrap_or_else(|| "sqlite::memory:".to_string());
        let pool = connect_pool(&database_url).await?;

        let hasher = Hasher::new(&config.auth);
        let users = UserStore::new(pool.clone(), hasher)
            .await
            .map_err(|e| WebError::Database(format!("failed to create user store: {e}")))?;
        let appointments = AppointmentStore::new(pool)
            .await
            .map_err(|e| WebError::Database(format!("failed to create appointment store: {e}")))?;

        let tokens = TokenService::new(secret.as_bytes(), config.auth.token_ttl_days);

        info!("application state initialized");
        Ok(Self {
            config,
            users,
            appointments,
            tokens,
        })
    }
}

/// Connect to the SQLite database behind `database_url`
pub(crate) async fn connect_pool(database_url: &str) -> WebResult<SqlitePool> {
    info!("connecting to database: {}", database_url);

    if database_url.contains(":memory:") {
        // Each connection would get its own empty in-memory database, so
        // the pool is pinned to a single connection.
        return SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(database_url)
            .await
            .map_err(|e| WebError::Database(format!("failed to connect to database: {e}")));
    }

    let db_path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);

    if let Some(parent) = std::path::Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| WebError::Database(format!("failed to create directory: {e}")))?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    SqlitePool::connect_with(options)
        .await
        .map_err(|e| WebError::Database(format!("failed to connect to database: {e}")))
}
