//! Bearer-token middleware.
//!
//! Requests under `/api/*` pass through [`require_bearer`], which either
//! rejects them with `401` or stamps them with the authenticated subject.
//!
//! # Trust boundary
//!
//! The subject travels to the backend in the `X-User` header. The backend
//! trusts that header only because it is reachable exclusively through this
//! gateway; any client-supplied `X-User` is overwritten here.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{DateTime, Utc};

use switchboard_auth::{AuthError, CredentialVerifier, TokenAuthenticator, ValidatedClaims};

use crate::error::ApiError;
use crate::state::GatewayState;

/// Header carrying the authenticated subject to the backend.
pub const IDENTITY_HEADER: &str = "x-user";

const BEARER_PREFIX: &str = "Bearer ";

/// The authenticated caller, stored as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// The token subject (login username).
    pub subject: String,
    /// When the caller's token expires.
    pub expires_at: DateTime<Utc>,
}

impl From<ValidatedClaims> for AuthUser {
    fn from(claims: ValidatedClaims) -> Self {
        Self {
            subject: claims.subject,
            expires_at: claims.expires_at,
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The prefix is matched exactly: case-sensitive, one space.
///
/// # Errors
///
/// Returns `AuthError::Unauthenticated` if the header is missing, not valid
/// text, or does not start with `Bearer `.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthError::Unauthenticated)
}

/// Authenticate the bearer token carried in `headers`.
///
/// # Errors
///
/// Returns the specific `AuthError`; callers must not relay it to clients.
pub fn authenticate_headers(
    headers: &HeaderMap,
    authenticator: &TokenAuthenticator,
) -> Result<AuthUser, AuthError> {
    let token = bearer_token(headers)?;
    authenticator.authenticate(token).map(AuthUser::from)
}

/// Middleware that admits only requests with a valid bearer token.
///
/// On success the request gets an `X-User` header and an [`AuthUser`]
/// extension. Every failure becomes the same `401`; the reason is only logged.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` when authentication fails.
pub async fn require_bearer<V>(
    State(state): State<Arc<GatewayState<V>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    V: CredentialVerifier + 'static,
{
    let user = match authenticate_headers(request.headers(), &state.authenticator) {
        Ok(user) => user,
        Err(err) => {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = err.kind(),
                "Rejected unauthenticated request"
            );
            return Err(ApiError::from(err));
        }
    };

    let identity = HeaderValue::from_str(&user.subject).map_err(|_| {
        tracing::warn!("Token subject is not a valid header value");
        ApiError::Unauthorized
    })?;

    request.headers_mut().insert(IDENTITY_HEADER, identity);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
