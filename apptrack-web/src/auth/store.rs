//! User storage and credential checks

use super::password::Hasher;
use crate::error::ApiError;
use apptrack_core::{Role, User};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use std::sync::LazyLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Email shape check: local part, `@`, domain, TLD of at least two chars
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("email pattern compiles")
});

/// User registration request
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Identity summary returned by registration and login
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Database user record
#[derive(Debug)]
struct UserRecord {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: String,
    updated_at: String,
}

impl UserRecord {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Self {
        Self {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: row.get("role"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn into_user(self) -> Result<User, ApiError> {
        let role: Role = self.role.parse()?;

        Ok(User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApiError::internal(format!("invalid timestamp in store: {e}")))
}

/// SQLite-backed credential store
#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
    hasher: Hasher,
}

impl UserStore {
    /// Create the store and its schema
    pub async fn new(pool: SqlitePool, hasher: Hasher) -> Result<Self, sqlx::Error> {
        let store = Self { pool, hasher };
        store.create_tables().await?;
        Ok(store)
    }

    async fn create_tables(&self) -> Result<(), sqlx::Error> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
        "#;

        sqlx::query(query).execute(&self.pool).await?;

        debug!("users table ready");
        Ok(())
    }

    /// Register a new user
    ///
    /// Validates the input, normalizes the email, hashes the password, and
    /// inserts the record. A duplicate email yields Conflict.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, ApiError> {
        let name = non_empty(request.name)
            .ok_or_else(|| ApiError::bad_request("Please add all fields"))?;
        let email = non_empty(request.email)
            .ok_or_else(|| ApiError::bad_request("Please add all fields"))?;
        let password = request
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::bad_request("Please add all fields"))?;

        let email = email.to_lowercase();
        if !EMAIL_PATTERN.is_match(&email) {
            return Err(ApiError::bad_request("Please add a valid email"));
        }

        if password.chars().count() < 6 {
            return Err(ApiError::bad_request(
                "Password must be at least 6 characters",
            ));
        }

        if self.email_exists(&email).await? {
            debug!("registration rejected, email already in use");
            return Err(ApiError::conflict("User already exists"));
        }

        let password_hash = self.hasher.hash_async(password).await?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            role: Role::default(),
            created_at: now,
            updated_at: now,
        };

        self.insert(&user).await?;

        info!("registered new user: {}", user.id);
        Ok(user)
    }

    /// Authenticate by email and password
    ///
    /// Unknown email and wrong password yield the identical error so the
    /// response never reveals whether an account exists.
    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, ApiError> {
        let email = non_empty(request.email)
            .ok_or_else(|| ApiError::bad_request("Please provide email and password"))?;
        let password = request
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::bad_request("Please provide email and password"))?;

        let user = self
            .find_by_email(&email.to_lowercase())
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

        if !self
            .hasher
            .verify_async(password, user.password_hash.clone())
            .await
        {
            warn!("failed login attempt for user: {}", user.id);
            return Err(ApiError::unauthorized("Invalid credentials"));
        }

        debug!("user authenticated: {}", user.id);
        Ok(user)
    }

    /// Get user by ID
    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, ApiError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| UserRecord::from_row(&row).into_user())
            .transpose()
    }

    /// Get user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| UserRecord::from_row(&row).into_user())
            .transpose()
    }

    async fn email_exists(&self, email: &str) -> Result<bool, ApiError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn insert(&self, user: &User) -> Result<(), ApiError> {
        let query = r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.created_at.to_rfc3339())
            .bind(user.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                // The UNIQUE column backs up the pre-insert existence check.
                if e.as_database_error()
                    .is_some_and(|d| d.is_unique_violation())
                {
                    ApiError::conflict("User already exists")
                } else {
                    ApiError::from(e)
                }
            })?;

        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
