//! Request and response bodies

use serde::{Deserialize, Serialize};
use stackd_common::{Role, User};

// Requests

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStackRequest {
    /// Deploy from a stored template (the tenant path)
    #[serde(default)]
    pub template_name: Option<String>,
    /// Deploy a raw spec (admin only)
    #[serde(default)]
    pub spec: Option<String>,
    #[serde(default)]
    pub stack_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTemplateRequest {
    pub data: String,
}

// Responses

/// User projection; never exposes the password hash
#[derive(Debug, Serialize)]
pub struct UserView {
    pub name: String,
    pub role: Role,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResult {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct HealthcheckResult {
    pub healthy: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackCreationResult {
    pub stack_name: String,
}

#[derive(Debug, Serialize)]
pub struct DeletionResult {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_view_drops_the_hash() {
        let view = UserView::from(User {
            name: "alice".into(),
            password_hash: "salt$digest".into(),
            role: Role::User,
        });
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("salt$digest"));
        assert!(json.contains("alice"));
    }
}
