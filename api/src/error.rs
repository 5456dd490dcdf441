//! HTTP error mapping
//!
//! The core raises its taxonomy at the point of detection; this is the one
//! place that turns it into transport status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use stackd_common::Error;

/// Boundary error carrying a transport status
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// No credentials supplied at all
    pub fn missing_authorization() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Authorization header missing.")
    }

    /// Credentials supplied but rejected
    pub fn invalid_token() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Failed to authenticate token.")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::PolicyViolation(_) | Error::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            Error::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Error::Engine(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", err);
        }
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": self.status.as_u16(),
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        let cases = [
            (Error::AuthenticationFailed, StatusCode::UNAUTHORIZED),
            (Error::forbidden("alice"), StatusCode::FORBIDDEN),
            (Error::NotFound("web".into()), StatusCode::NOT_FOUND),
            (Error::Conflict("web".into()), StatusCode::CONFLICT),
            (Error::PolicyViolation("short".into()), StatusCode::BAD_REQUEST),
            (Error::InvalidOperation("nope".into()), StatusCode::BAD_REQUEST),
            (
                Error::QuotaExceeded { user: "alice".into(), limit: 2 },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (Error::Engine("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn missing_and_invalid_credentials_are_distinct() {
        assert_ne!(
            ApiError::missing_authorization().message,
            ApiError::invalid_token().message
        );
    }
}
