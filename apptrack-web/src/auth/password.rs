//! Password hashing
//!
//! Hashing is an explicit transform invoked by the write path before the
//! store call, never a side effect of persistence. Each hash uses a fresh
//! random salt; verification reads the parameters embedded in the digest.

use crate::error::ApiError;
use apptrack_core::AuthConfig;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use tracing::warn;

/// Password hasher with a configurable work factor
#[derive(Debug, Clone)]
pub struct Hasher {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl Hasher {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            memory_kib: config.argon2_memory_kib,
            iterations: config.argon2_iterations,
            parallelism: config.argon2_parallelism,
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        // Out-of-range settings fall back to the library defaults.
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map(|params| Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
            .unwrap_or_else(|e| {
                warn!("invalid argon2 parameters ({}), using defaults", e);
                Argon2::default()
            })
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ApiError::internal(format!("password hashing failed: {e}")))
    }

    /// Verify a password against a stored digest
    ///
    /// A malformed digest fails closed: the result is `false`, never a match.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            warn!("malformed password digest in store");
            return false;
        };

        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Hash on the blocking pool so the runtime keeps serving requests
    pub async fn hash_async(&self, password: String) -> Result<String, ApiError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ApiError::internal(format!("hashing task failed: {e}")))?
    }

    /// Verify on the blocking pool
    pub async fn verify_async(&self, password: String, digest: String) -> bool {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .unwrap_or(false)
    }
}
