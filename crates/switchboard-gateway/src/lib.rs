//! Authenticating gateway for the contacts service.
//!
//! This crate is the only public entry point of the system. It handles:
//!
//! - Login against an injected credential check, issuing signed tokens
//! - Bearer-token authentication for everything under `/api/*`
//! - Reverse proxying authorized requests to the contacts backend
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Clients                            │
//! └─────────────────────────────────────────────────────────────┘
//!                │ POST /login                │ /api/*
//!                ▼                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    switchboard-gateway                      │
//! │  ┌─────────────┐   ┌──────────────────┐   ┌─────────────┐   │
//! │  │   Login     │   │  Bearer          │──▶│  Upstream   │   │
//! │  │   Handler   │   │  Middleware      │   │  Forwarder  │   │
//! │  └─────────────┘   └──────────────────┘   └─────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!                                                   │ X-User: <subject>
//!                                                   ▼
//!                                          ┌─────────────────┐
//!                                          │ Contacts backend │
//!                                          └─────────────────┘
//! ```
//!
//! The backend trusts `X-User` because it is only reachable through the
//! gateway. Exposing it directly would require an authenticated channel
//! between the two.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use switchboard_auth::{HmacSigner, StaticCredentials, TokenAuthenticator, TokenIssuer};
//! use switchboard_gateway::{create_router, GatewayConfig, GatewayState, UpstreamForwarder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::default();
//! let signer = HmacSigner::new(b"change-me")?;
//! let forwarder = UpstreamForwarder::new(&config.backend_url, config.request_timeout())?;
//!
//! let state = GatewayState::new(
//!     Arc::new(StaticCredentials::default()),
//!     TokenIssuer::new(signer.clone()),
//!     TokenAuthenticator::new(signer),
//!     forwarder,
//!     config,
//! );
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod proxy;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use proxy::{ForwardError, UpstreamForwarder};
pub use routes::create_router;
pub use state::GatewayState;

// Re-export key types for convenience
pub use auth::{AuthUser, IDENTITY_HEADER};
