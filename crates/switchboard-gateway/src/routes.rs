//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;

use axum::routing::{any, post};
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use switchboard_auth::CredentialVerifier;

use crate::auth::require_bearer;
use crate::handlers::{api, login};
use crate::state::GatewayState;

/// Create the gateway router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `POST /login` - Exchange credentials for a token
///
/// ## Authenticated (`Authorization: Bearer <token>`)
/// - `ANY /api/` and `ANY /api/*` - Forwarded to the contacts backend with
///   `X-User` set
///
/// The body limit and request timeout only wrap `/login`. Proxied requests
/// stream their bodies and are bounded by the forwarder's upstream timeout,
/// which reports `504`.
pub fn create_router<V>(state: GatewayState<V>) -> Router
where
    V: CredentialVerifier + 'static,
{
    // Extract config values before moving state
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout = state.config.request_timeout();

    let state = Arc::new(state);

    let login_routes = Router::new()
        .route("/login", post(login::login::<V>))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(request_timeout));

    let api_routes = Router::new()
        .route("/api/", any(api::forward::<V>))
        .route("/api/*path", any(api::forward::<V>))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_bearer::<V>,
        ));

    Router::new()
        .merge(login_routes)
        .merge(api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
