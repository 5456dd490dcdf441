//! Auth configuration
//!
//! The signing secret is resolved exactly once at process startup and the
//! resulting struct is handed to [`crate::IdentityService`]; nothing reads
//! the environment at call time.

use std::time::Duration;

const SECRET_ENV: &str = "STACKD_SECRET";
const SECRET_FILE_ENV: &str = "STACKD_SECRET_FILE";
const DEFAULT_SECRET: &str = "development";

/// Identity service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub secret: String,
    /// Lifetime of a normal session token
    pub token_ttl: Duration,
    /// Lifetime of the bootstrap token
    pub bootstrap_ttl: Duration,
    /// Minimum accepted password length
    pub min_password_len: usize,
}

impl AuthConfig {
    /// Resolve the configuration from the environment.
    ///
    /// Secret priority: `STACKD_SECRET` env var, then the file named by
    /// `STACKD_SECRET_FILE`, then a compiled-in default.
    pub fn from_env() -> Self {
        let secret = std::env::var(SECRET_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| {
                std::env::var(SECRET_FILE_ENV)
                    .ok()
                    .and_then(|path| std::fs::read_to_string(path).ok())
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| {
                tracing::warn!("no signing secret configured, using the default");
                DEFAULT_SECRET.to_string()
            });

        Self {
            secret,
            ..Self::default()
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            token_ttl: Duration::from_secs(24 * 60 * 60),
            bootstrap_ttl: Duration::from_secs(5 * 60 * 60),
            min_password_len: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttls() {
        let config = AuthConfig::default();
        assert_eq!(config.token_ttl, Duration::from_secs(86_400));
        assert_eq!(config.bootstrap_ttl, Duration::from_secs(18_000));
        assert_eq!(config.min_password_len, 6);
    }
}
