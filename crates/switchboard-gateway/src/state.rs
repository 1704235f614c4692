//! Gateway application state.
//!
//! This module defines the shared state that is available to all request handlers.

use std::sync::Arc;

use switchboard_auth::{CredentialVerifier, TokenAuthenticator, TokenIssuer};

use crate::config::GatewayConfig;
use crate::proxy::UpstreamForwarder;

/// Shared application state for the gateway.
///
/// Everything here is read-only after startup; requests never write to it.
pub struct GatewayState<V>
where
    V: CredentialVerifier,
{
    /// Login credential check.
    pub credentials: Arc<V>,
    /// Issues tokens after a successful login.
    pub issuer: TokenIssuer,
    /// Checks bearer tokens on `/api/*`.
    pub authenticator: TokenAuthenticator,
    /// Relays authorized requests to the backend.
    pub forwarder: UpstreamForwarder,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<V> GatewayState<V>
where
    V: CredentialVerifier,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(
        credentials: Arc<V>,
        issuer: TokenIssuer,
        authenticator: TokenAuthenticator,
        forwarder: UpstreamForwarder,
        config: GatewayConfig,
    ) -> Self {
        Self {
            credentials,
            issuer,
            authenticator,
            forwarder,
            config,
        }
    }
}
