//! Switchboard Gateway - authenticating reverse proxy
//!
//! This is the main entry point for the gateway service.
//!
//! # Configuration
//!
//! - `LISTEN_ADDR` - bind address (default `0.0.0.0:8080`)
//! - `BACKEND_URL` - contacts backend origin (default `http://localhost:8000`)
//! - `REQUEST_TIMEOUT_SECONDS` - per-request bound (default 30)
//! - `TOKEN_SECRET` - HMAC key for session tokens
//! - `GATEWAY_USERNAME` / `GATEWAY_PASSWORD` - the login account
//!
//! Unset secrets fall back to well-known development values and log a warning.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use switchboard_auth::{HmacSigner, StaticCredentials, TokenAuthenticator, TokenIssuer};
use switchboard_gateway::{create_router, GatewayConfig, GatewayState, UpstreamForwarder};

const DEV_SECRET: &str = "secret";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,switchboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Switchboard Gateway");

    // Load configuration from environment
    let defaults = GatewayConfig::default();
    let config = GatewayConfig {
        listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
        backend_url: std::env::var("BACKEND_URL").unwrap_or(defaults.backend_url),
        request_timeout_seconds: match std::env::var("REQUEST_TIMEOUT_SECONDS") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.request_timeout_seconds,
        },
        ..defaults
    };

    tracing::info!(
        listen_addr = %config.listen_addr,
        backend_url = %config.backend_url,
        request_timeout_seconds = config.request_timeout_seconds,
        "Gateway configuration loaded"
    );

    // The secret is only held long enough to key the signer.
    let signer = match std::env::var("TOKEN_SECRET") {
        Ok(secret) => HmacSigner::new(secret.as_bytes())?,
        Err(_) => {
            tracing::warn!("TOKEN_SECRET not set - signing with the development secret");
            HmacSigner::new(DEV_SECRET.as_bytes())?
        }
    };

    let credentials = match (
        std::env::var("GATEWAY_USERNAME"),
        std::env::var("GATEWAY_PASSWORD"),
    ) {
        (Ok(username), Ok(password)) => StaticCredentials::new(username, password),
        _ => {
            tracing::warn!("GATEWAY_USERNAME/GATEWAY_PASSWORD not set - using the default account");
            StaticCredentials::default()
        }
    };
    tracing::info!(username = %credentials.username(), "Login account configured");

    let forwarder = UpstreamForwarder::new(&config.backend_url, config.request_timeout())?;
    tracing::info!(origin = %forwarder.origin(), "Upstream forwarder initialized");

    // Build gateway state
    let listen_addr = config.listen_addr.clone();
    let state = GatewayState::new(
        Arc::new(credentials),
        TokenIssuer::new(signer.clone()),
        TokenAuthenticator::new(signer),
        forwarder,
        config,
    );

    let app = create_router(state);

    // Start HTTP server
    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
