//! Identity model

use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// True for the administrative role
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

/// Stored user record
///
/// `name` is the unique, case-sensitive identity key. The password is kept
/// only as a salted hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    pub fn principal(&self) -> Principal {
        Principal {
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// Authenticated actor, decoded from a verified token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    pub role: Role,
}

impl Principal {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_defaults_to_user() {
        assert_eq!(Role::default(), Role::User);
        assert!(!Role::default().is_admin());
    }

    #[test]
    fn principal_carries_stored_role() {
        let user = User {
            name: "alice".into(),
            password_hash: "x".into(),
            role: Role::Admin,
        };
        let principal = user.principal();
        assert_eq!(principal.name, "alice");
        assert!(principal.is_admin());
    }
}
