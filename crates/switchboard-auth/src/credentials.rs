//! Login credential verification.

use std::fmt;

use async_trait::async_trait;
use subtle::ConstantTimeEq;

/// Decides whether a username/password pair may log in.
///
/// The gateway only depends on this trait, so the fixed account below can be
/// replaced with a real identity store without touching token handling.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns `true` if the credentials are accepted.
    async fn check_credentials(&self, username: &str, password: &str) -> bool;
}

/// A single fixed account.
///
/// Both fields are compared in constant time and the results are combined
/// without short-circuiting, so response timing does not reveal which field
/// (or how much of it) matched.
#[derive(Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    /// Create a verifier accepting exactly `username` / `password`.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The accepted username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new("admin", "password")
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentials {
    async fn check_credentials(&self, username: &str, password: &str) -> bool {
        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        bool::from(user_ok & pass_ok)
    }
}
