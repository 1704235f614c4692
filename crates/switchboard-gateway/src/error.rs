//! API error types and responses.
//!
//! Every error is returned as a short plain-text body. Details of upstream or
//! internal failures go to the log, never to the caller.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use switchboard_auth::AuthError;

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, invalid or expired credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The backend could not be reached or returned a broken response.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The backend did not answer in time.
    #[error("upstream timed out")]
    UpstreamTimeout,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::UpstreamUnavailable(_) => "bad_gateway",
            Self::UpstreamTimeout => "gateway_timeout",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{}\n", self.code()),
        )
            .into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Malformed(_)
            | AuthError::BadSignature
            | AuthError::Expired
            | AuthError::Unauthenticated
            | AuthError::InvalidCredentials => Self::Unauthorized,
            AuthError::InvalidKey(_) | AuthError::Internal(_) => {
                tracing::error!(error = %err, "Auth internal error");
                Self::Internal("authentication service error".to_string())
            }
        }
    }
}
