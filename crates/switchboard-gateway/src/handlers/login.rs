//! Login endpoint.
//!
//! This is the only way to obtain a token. It sits outside the bearer
//! middleware.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use switchboard_auth::{AuthError, CredentialVerifier};

use crate::error::ApiError;
use crate::state::GatewayState;

/// Request body for `POST /login`.
///
/// Missing fields are treated as empty strings.
#[derive(Default, Deserialize)]
pub struct LoginRequest {
    /// Account name.
    #[serde(default)]
    pub username: String,
    /// Account password.
    #[serde(default)]
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The signed session token.
    pub token: String,
}

/// Exchange a username and password for a session token.
///
/// A body that is not valid JSON is handled like a wrong password. The
/// response never says which field was wrong.
///
/// # Example
///
/// ```text
/// POST /login
/// {"username": "admin", "password": "password"}
///
/// Response: 200 OK
/// {"token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIi..."}
/// ```
///
/// # Errors
///
/// Returns `401 Unauthorized` if the credentials are rejected.
pub async fn login<V>(
    State(state): State<Arc<GatewayState<V>>>,
    body: Bytes,
) -> Result<Json<LoginResponse>, ApiError>
where
    V: CredentialVerifier + 'static,
{
    let request: LoginRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Unparseable login body");
        LoginRequest::default()
    });

    if !state
        .credentials
        .check_credentials(&request.username, &request.password)
        .await
    {
        tracing::info!("Login rejected");
        return Err(AuthError::InvalidCredentials.into());
    }

    let issued = state.issuer.issue(&request.username)?;

    tracing::info!(
        username = %request.username,
        expires_at = %issued.expires_at,
        "Issued session token"
    );

    Ok(Json(LoginResponse {
        token: issued.token,
    }))
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;
    use std::time::Duration;

    use switchboard_auth::{HmacSigner, StaticCredentials, TokenAuthenticator, TokenIssuer};

    use super::*;
    use crate::config::GatewayConfig;
    use crate::proxy::UpstreamForwarder;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn state() -> Arc<GatewayState<StaticCredentials>> {
        let config = GatewayConfig::default();
        let signer = HmacSigner::new(b"test-secret").unwrap();
        let forwarder =
            UpstreamForwarder::new(&config.backend_url, Duration::from_secs(1)).unwrap();

        Arc::new(GatewayState::new(
            Arc::new(StaticCredentials::default()),
            TokenIssuer::new(signer.clone()),
            TokenAuthenticator::new(signer),
            forwarder,
            config,
        ))
    }

    #[tokio::test]
    async fn valid_login_issues_token_for_username() {
        let body = Bytes::from_static(br#"{"username":"admin","password":"password"}"#);

        let Json(response) = login(State(state()), body).await.unwrap();

        assert_eq!(response.token.split('.').count(), 3);
    }

    #[tokio::test]
    async fn rejected_login_does_not_log_submitted_fields() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let body = Bytes::from_static(br#"{"username":"hunter2-typed-here","password":"nope"}"#);
        let result = login(State(state()), body).await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        let output = logs.contents();
        assert!(output.contains("Login rejected"));
        assert!(!output.contains("hunter2"));
        assert!(!output.contains("nope"));
    }
}
