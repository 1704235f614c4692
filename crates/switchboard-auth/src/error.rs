//! Authentication error types.

use thiserror::Error;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while issuing or authenticating tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token is structurally invalid (segments, encoding or claims).
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The token signature does not match its contents.
    #[error("invalid signature")]
    BadSignature,

    /// The token is past its `exp` instant.
    #[error("token expired")]
    Expired,

    /// The request carried no usable bearer token.
    #[error("missing or invalid bearer credentials")]
    Unauthenticated,

    /// The login username/password pair was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The signing key could not be used.
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Short, stable name of the failure, suitable for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::BadSignature => "bad_signature",
            Self::Expired => "expired",
            Self::Unauthenticated => "unauthenticated",
            Self::InvalidCredentials => "invalid_credentials",
            Self::InvalidKey(_) => "invalid_key",
            Self::Internal(_) => "internal",
        }
    }

    /// Returns the appropriate HTTP status code for this error.
    ///
    /// Every authentication failure maps to `401` so callers cannot tell
    /// which check rejected them.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Malformed(_)
            | Self::BadSignature
            | Self::Expired
            | Self::Unauthenticated
            | Self::InvalidCredentials => 401,
            Self::InvalidKey(_) | Self::Internal(_) => 500,
        }
    }
}
