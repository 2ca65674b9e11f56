//! Configuration loaded from the environment

use serde::{Deserialize, Serialize};

/// Authentication configuration
///
/// The signing secret is process-wide configuration injected at startup.
/// There is deliberately no compiled-in default: a missing secret is an
/// error outside development mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret (`APPTRACK_JWT_SECRET`)
    pub jwt_secret: Option<String>,
    /// Token validity window in days
    pub token_ttl_days: i64,
    /// Argon2 memory cost in KiB
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count
    pub argon2_iterations: u32,
    /// Argon2 lane count
    pub argon2_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_days: 30,
            // argon2 crate defaults
            argon2_memory_kib: 19_456,
            argon2_iterations: 2,
            argon2_parallelism: 1,
        }
    }
}

impl AuthConfig {
    /// Load authentication configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            jwt_secret: std::env::var("APPTRACK_JWT_SECRET").ok(),
            token_ttl_days: env_parse("APPTRACK_TOKEN_TTL_DAYS", defaults.token_ttl_days),
            argon2_memory_kib: env_parse("APPTRACK_ARGON2_MEMORY_KIB", defaults.argon2_memory_kib),
            argon2_iterations: env_parse("APPTRACK_ARGON2_ITERATIONS", defaults.argon2_iterations),
            argon2_parallelism: env_parse(
                "APPTRACK_ARGON2_PARALLELISM",
                defaults.argon2_parallelism,
            ),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_secret() {
        let config = AuthConfig::default();
        assert!(config.jwt_secret.is_none());
        assert_eq!(config.token_ttl_days, 30);
    }

    #[test]
    fn env_parse_falls_back_on_missing_variable() {
        assert_eq!(env_parse("APPTRACK_TEST_UNSET_VARIABLE", 7_u32), 7);
    }
}
