//! Reverse proxy to the contacts backend.
//!
//! Requests are relayed to a single fixed origin. Bodies are streamed in both
//! directions; neither the request nor the response is buffered in full.

use std::net::IpAddr;
use std::time::Duration;

use axum::body::{Body, HttpBody};
use axum::extract::Request;
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::Uri;
use axum::response::Response;
use thiserror::Error;

use crate::error::ApiError;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Headers that describe a single connection and are never relayed.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Errors raised while setting up the forwarder.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The configured backend origin is not an absolute http(s) URL.
    #[error("invalid backend origin {origin:?}: {reason}")]
    InvalidOrigin {
        /// The rejected value.
        origin: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Relays requests to the backend and streams the responses back.
#[derive(Debug, Clone)]
pub struct UpstreamForwarder {
    client: reqwest::Client,
    origin: String,
}

impl UpstreamForwarder {
    /// Create a forwarder for `origin` (e.g. `http://localhost:8000`).
    ///
    /// `timeout` bounds each upstream call from connect to the last body byte.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin is not an absolute `http`/`https` URL or
    /// the HTTP client cannot be created.
    pub fn new(origin: &str, timeout: Duration) -> Result<Self, ForwardError> {
        let invalid = |reason: String| ForwardError::InvalidOrigin {
            origin: origin.to_string(),
            reason,
        };

        let url = reqwest::Url::parse(origin).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }

        // Redirects are relayed to the caller, not followed.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        })
    }

    /// The backend origin requests are sent to.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Build the upstream URL for an inbound request URI.
    #[must_use]
    pub fn upstream_url(&self, uri: &Uri) -> String {
        let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
        format!("{}{path_and_query}", self.origin)
    }

    /// Forward `request` and relay the backend's status, headers and body.
    ///
    /// `client_ip` is appended to `X-Forwarded-For` when known.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamTimeout` if the backend does not answer in time and
    /// `UpstreamUnavailable` for any other transport failure. Backend error
    /// statuses are relayed, not converted.
    pub async fn forward(
        &self,
        request: Request,
        client_ip: Option<IpAddr>,
    ) -> Result<Response, ApiError> {
        let (parts, body) = request.into_parts();
        let url = self.upstream_url(&parts.uri);

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::HOST);
        if let Some(ip) = client_ip {
            append_forwarded_for(&mut headers, ip);
        }

        let mut builder = self.client.request(parts.method, &url).headers(headers);
        if body.size_hint().exact() != Some(0) {
            builder = builder.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let upstream = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                tracing::warn!(url = %url, "Upstream request timed out");
                ApiError::UpstreamTimeout
            } else {
                tracing::warn!(url = %url, error = %e, "Upstream request failed");
                ApiError::UpstreamUnavailable(e.to_string())
            }
        })?;

        let status = upstream.status();
        let mut response_headers = upstream.headers().clone();
        strip_hop_by_hop(&mut response_headers);

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;
        Ok(response)
    }
}

/// Remove hop-by-hop headers, including any named in `Connection`.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in &named {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Append `ip` to the `X-Forwarded-For` chain.
fn append_forwarded_for(headers: &mut HeaderMap, ip: IpAddr) {
    let prior: Vec<&str> = headers
        .get_all(X_FORWARDED_FOR)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();

    let value = if prior.is_empty() {
        ip.to_string()
    } else {
        format!("{}, {ip}", prior.join(", "))
    };

    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}
