//! Self-signed session tokens for the switchboard gateway.
//!
//! This crate issues and checks compact HS256 tokens:
//!
//! - Token encoding and splitting ([`codec`])
//! - HMAC-SHA-256 signing with constant-time verification ([`signer`])
//! - Issuance with a fixed one-hour lifetime ([`issuer`])
//! - Stateless authentication ([`authenticator`])
//! - Login credential checks ([`credentials`])
//!
//! # Architecture
//!
//! ```text
//!   login ──▶ CredentialVerifier ──▶ TokenIssuer ──┐
//!                                                  │ codec::encode
//!                                                  ▼
//!                                            HmacSigner  (process secret)
//!                                                  ▲
//!                                                  │ codec::decode
//!   request ──▶ Bearer token ──▶ TokenAuthenticator┘
//! ```
//!
//! Both sides share one [`HmacSigner`], built once at startup from the secret.
//! Nothing else holds the key.
//!
//! # Example
//!
//! ```
//! use switchboard_auth::{HmacSigner, TokenAuthenticator, TokenIssuer};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let signer = HmacSigner::new(b"change-me")?;
//! let issuer = TokenIssuer::new(signer.clone());
//! let authenticator = TokenAuthenticator::new(signer);
//!
//! let issued = issuer.issue("admin")?;
//! let claims = authenticator.authenticate(&issued.token)?;
//! assert_eq!(claims.subject, "admin");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod authenticator;
pub mod codec;
pub mod credentials;
pub mod error;
pub mod issuer;
pub mod signer;

pub use authenticator::{TokenAuthenticator, ValidatedClaims};
pub use credentials::{CredentialVerifier, StaticCredentials};
pub use error::{AuthError, Result};
pub use issuer::{IssuedToken, TokenIssuer, TOKEN_TTL_SECONDS};
pub use signer::HmacSigner;
