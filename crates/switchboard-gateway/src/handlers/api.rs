//! Authenticated API passthrough.
//!
//! Everything under `/api/*` reaches this handler only after
//! [`require_bearer`](crate::auth::require_bearer) has admitted it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::response::Response;
use axum::Extension;

use switchboard_auth::CredentialVerifier;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Relay an authorized request to the contacts backend.
///
/// The backend's status, headers and body are returned as-is, including its
/// own error responses (`400`, `404`, ...).
///
/// # Errors
///
/// Returns `502`/`504` if the backend cannot be reached or times out.
pub async fn forward<V>(
    State(state): State<Arc<GatewayState<V>>>,
    Extension(user): Extension<AuthUser>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
) -> Result<Response, ApiError>
where
    V: CredentialVerifier + 'static,
{
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = connect_info.map(|ConnectInfo(addr)| addr.ip());

    let response = state.forwarder.forward(request, client_ip).await?;

    tracing::info!(
        method = %method,
        path = %path,
        user = %user.subject,
        status = response.status().as_u16(),
        "Forwarded request"
    );

    Ok(response)
}
