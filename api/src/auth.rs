//! Request authentication
//!
//! Extracts the bearer token and resolves it to a principal. A missing
//! header and a present-but-invalid one are reported differently so public
//! endpoints can treat "no credentials" as optionally allowed.

use crate::error::ApiError;
use crate::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use stackd_common::Principal;

/// Authenticated principal extractor
pub struct CurrentUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(ApiError::missing_authorization)?;
        let token = header.to_str().map_err(|_| ApiError::invalid_token())?;
        let token = token.strip_prefix("Bearer ").unwrap_or(token);

        state
            .identity
            .authorize(token)
            .map(CurrentUser)
            .map_err(|_| ApiError::invalid_token())
    }
}
