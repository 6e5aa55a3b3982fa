//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Every error renders as the
//! `{"success": false, "message": ...}` body the clients already understand;
//! server-side faults are captured to Sentry before responding.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use appsession_core::LoginFailure;

use crate::services::{AuthError, TokenError};

/// Application-level error type for the authority.
#[derive(Debug, Error)]
pub enum AppError {
    /// Login rejected.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session token could not be produced.
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Token(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Auth(err) => err.to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Token(_) => "Internal server error".to_string(),
        };

        (status, Json(LoginFailure::new(message))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for a freshly issued session.
pub fn set_sentry_user(subject: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(subject.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("missing field `otp`".to_string());
        assert_eq!(err.to_string(), "Bad request: missing field `otp`");
    }

    #[tokio::test]
    async fn test_auth_error_is_401_with_generic_message() {
        let response = AppError::from(AuthError::InvalidPhoneOrOtp).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "success": false, "message": "Invalid phone or OTP" })
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = AppError::from(TokenError::InvalidKey).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal server error");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::from(AuthError::InvalidEmailOrPassword)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::BadRequest("x".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(TokenError::InvalidKey).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
