//! Token authentication.
//!
//! Authentication runs as a fixed sequence of checks:
//!
//! 1. split the token (`Malformed` on failure)
//! 2. verify the signature over `header.claims` (`BadSignature`)
//! 3. decode and deserialize the claims (`Malformed`)
//! 4. reject if `now > exp` (`Expired`)
//!
//! Claims are never read before the signature has been verified.

use chrono::{DateTime, Utc};

use crate::codec::{self, Claims};
use crate::error::{AuthError, Result};
use crate::signer::HmacSigner;

/// Claims of a token that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedClaims {
    /// The authenticated principal from the `sub` claim.
    pub subject: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

/// Stateless token authenticator.
///
/// Holds nothing but the signer, so a single instance can be shared across
/// any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct TokenAuthenticator {
    signer: HmacSigner,
}

impl TokenAuthenticator {
    /// Create an authenticator that verifies with `signer`.
    #[must_use]
    pub const fn new(signer: HmacSigner) -> Self {
        Self { signer }
    }

    /// Authenticate `token` against the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns `Malformed`, `BadSignature` or `Expired`.
    pub fn authenticate(&self, token: &str) -> Result<ValidatedClaims> {
        self.authenticate_at(token, Utc::now())
    }

    /// Authenticate `token` as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// See [`TokenAuthenticator::authenticate`].
    pub fn authenticate_at(&self, token: &str, now: DateTime<Utc>) -> Result<ValidatedClaims> {
        let result = self.check(token, now);
        if let Err(e) = &result {
            tracing::debug!(reason = e.kind(), error = %e, "Token rejected");
        }
        result
    }

    fn check(&self, token: &str, now: DateTime<Utc>) -> Result<ValidatedClaims> {
        let decoded = codec::decode(token)?;

        if !self
            .signer
            .verify(decoded.signing_input(), decoded.signature())
        {
            return Err(AuthError::BadSignature);
        }

        let claims: Claims = serde_json::from_slice(&decoded.claims_bytes()?)
            .map_err(|e| AuthError::Malformed(format!("invalid claims: {e}")))?;

        // Equality is still valid.
        if now.timestamp() > claims.exp {
            return Err(AuthError::Expired);
        }

        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AuthError::Malformed("exp out of range".to_string()))?;

        Ok(ValidatedClaims {
            subject: claims.sub,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use base64::prelude::*;
    use chrono::Duration;

    use super::*;
    use crate::codec::TokenHeader;
    use crate::issuer::{TokenIssuer, TOKEN_TTL_SECONDS};

    const SECRET: &[u8] = b"secret";

    fn pair() -> (TokenIssuer, TokenAuthenticator) {
        let signer = HmacSigner::new(SECRET).unwrap();
        (
            TokenIssuer::new(signer.clone()),
            TokenAuthenticator::new(signer),
        )
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    /// Sign arbitrary claims JSON with the test secret.
    fn sign_raw(claims_json: &str) -> String {
        let signer = HmacSigner::new(SECRET).unwrap();
        let unsigned = format!(
            "{}.{}",
            BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_vec(&TokenHeader::hs256()).unwrap()),
            BASE64_URL_SAFE_NO_PAD.encode(claims_json)
        );
        codec::attach_signature(&unsigned, &signer.sign(&unsigned))
    }

    #[test]
    fn round_trip_yields_subject() {
        let (issuer, auth) = pair();
        for subject in ["admin", "alice@example.com", "", "名前", "a.b.c"] {
            let issued = issuer.issue(subject).unwrap();
            let claims = auth.authenticate(&issued.token).unwrap();
            assert_eq!(claims.subject, subject);
            assert_eq!(claims.expires_at, issued.expires_at);
        }
    }

    #[test]
    fn expiry_boundary() {
        let (issuer, auth) = pair();
        let token = issuer.issue_at("admin", t0()).unwrap().token;
        let ttl = Duration::seconds(TOKEN_TTL_SECONDS);

        assert!(auth.authenticate_at(&token, t0() + ttl - Duration::seconds(1)).is_ok());
        assert!(auth.authenticate_at(&token, t0() + ttl).is_ok());
        assert!(matches!(
            auth.authenticate_at(&token, t0() + ttl + Duration::seconds(1)),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn flipped_signature_is_rejected() {
        let (issuer, auth) = pair();
        let token = issuer.issue_at("admin", t0()).unwrap().token;
        let sig_start = token.rfind('.').unwrap() + 1;

        for i in sig_start..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();

            match auth.authenticate_at(&tampered, t0()) {
                // The last character also carries padding bits; changing only
                // those makes a non-canonical encoding.
                Err(AuthError::BadSignature) => {}
                Err(AuthError::Malformed(_)) if i == token.len() - 1 => {}
                other => panic!("position {i}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn flipped_claims_fail_signature_check() {
        let (issuer, auth) = pair();
        let token = issuer.issue_at("admin", t0()).unwrap().token;
        let claims_start = token.find('.').unwrap() + 1;
        let claims_end = token.rfind('.').unwrap();

        for i in claims_start..claims_end {
            let mut bytes = token.clone().into_bytes();
            bytes[i] ^= 0x01;
            let tampered = String::from_utf8(bytes).unwrap();

            assert!(
                matches!(
                    auth.authenticate_at(&tampered, t0()),
                    Err(AuthError::BadSignature)
                ),
                "position {i} accepted"
            );
        }
    }

    #[test]
    fn forged_claims_with_valid_structure_rejected() {
        let (issuer, auth) = pair();
        let token = issuer.issue_at("admin", t0()).unwrap().token;
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1] = BASE64_URL_SAFE_NO_PAD.encode(r#"{"sub":"root","exp":9999999999}"#);

        assert!(matches!(
            auth.authenticate_at(&parts.join("."), t0()),
            Err(AuthError::BadSignature)
        ));
    }

    #[test]
    fn other_secret_rejected() {
        let other = TokenIssuer::new(HmacSigner::new(b"another-secret").unwrap());
        let (_, auth) = pair();
        let token = other.issue_at("admin", t0()).unwrap().token;

        assert!(matches!(
            auth.authenticate_at(&token, t0()),
            Err(AuthError::BadSignature)
        ));
    }

    #[test]
    fn malformed_tokens() {
        let (_, auth) = pair();
        for token in ["", "abc", "a.b", "a.b.c.d", "a..c", "a.b.!!"] {
            assert!(
                matches!(auth.authenticate(token), Err(AuthError::Malformed(_))),
                "accepted {token:?}"
            );
        }
    }

    #[test]
    fn signed_but_unparseable_claims_are_malformed() {
        let (_, auth) = pair();
        for claims in [
            "not json",
            r#"{"sub":"admin"}"#,
            r#"{"exp":1700000000}"#,
            r#"{"sub":7,"exp":1700000000}"#,
            r#"{"sub":"admin","exp":"soon"}"#,
            r#"{"sub":"admin","exp":1.5}"#,
        ] {
            assert!(
                matches!(
                    auth.authenticate_at(&sign_raw(claims), t0()),
                    Err(AuthError::Malformed(_))
                ),
                "accepted {claims}"
            );
        }
    }

    #[test]
    fn unknown_claims_are_ignored() {
        let (_, auth) = pair();
        let token = sign_raw(r#"{"sub":"admin","exp":1700000100,"role":"root"}"#);
        let claims = auth.authenticate_at(&token, t0()).unwrap();
        assert_eq!(claims.subject, "admin");
    }

    #[test]
    fn signature_checked_before_expiry() {
        let (issuer, auth) = pair();
        let token = issuer.issue_at("admin", t0()).unwrap().token;
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1] = BASE64_URL_SAFE_NO_PAD.encode(r#"{"sub":"admin","exp":0}"#);

        // Unsigned claims are never consulted, not even to report expiry.
        assert!(matches!(
            auth.authenticate_at(&parts.join("."), t0()),
            Err(AuthError::BadSignature)
        ));
        assert!(matches!(
            auth.authenticate_at(&token, t0() + Duration::days(1)),
            Err(AuthError::Expired)
        ));
    }
}
