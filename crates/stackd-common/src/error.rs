//! Error types for stackd

use thiserror::Error;

/// stackd error type
///
/// Every service raises these at the point of detection and lets them
/// propagate unmodified; the HTTP boundary owns the mapping to status codes.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad, missing, or expired credentials. The message never reveals
    /// whether the user exists.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Authenticated but insufficient role or ownership
    #[error("user '{user}' is not authorized to do this operation")]
    Forbidden {
        /// Acting user
        user: String,
    },

    /// Duplicate unique key
    #[error("'{0}' already exists")]
    Conflict(String),

    /// Referenced entity absent
    #[error("'{0}' not found")]
    NotFound(String),

    /// Input fails a declared policy
    #[error("policy violation: {0}")]
    PolicyViolation(String),

    /// Operation disallowed in the current system mode
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Tenant resource ceiling reached
    #[error("max stacks for user '{user}' reached ({limit})")]
    QuotaExceeded {
        /// Acting user
        user: String,
        /// Configured ceiling
        limit: usize,
    },

    /// Orchestration engine failure, surfaced as-is (no retries)
    #[error("engine error: {0}")]
    Engine(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for the role/ownership failure
    pub fn forbidden(user: impl Into<String>) -> Self {
        Self::Forbidden { user: user.into() }
    }
}

/// Result type for stackd
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_message_is_generic() {
        // Same message regardless of which credential check failed.
        assert_eq!(Error::AuthenticationFailed.to_string(), "authentication failed");
    }

    #[test]
    fn quota_message_names_user_and_limit() {
        let err = Error::QuotaExceeded { user: "alice".into(), limit: 2 };
        assert_eq!(err.to_string(), "max stacks for user 'alice' reached (2)");
    }
}
