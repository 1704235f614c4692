//! Token issuance.

use chrono::{DateTime, Utc};

use crate::codec::{self, Claims, TokenHeader};
use crate::error::{AuthError, Result};
use crate::signer::HmacSigner;

/// Lifetime of every issued token, in seconds.
pub const TOKEN_TTL_SECONDS: i64 = 3600;

/// A freshly issued token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The compact token string handed to the client.
    pub token: String,
    /// The instant encoded in the `exp` claim.
    pub expires_at: DateTime<Utc>,
}

/// Builds and signs tokens for authenticated subjects.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    signer: HmacSigner,
}

impl TokenIssuer {
    /// Create an issuer that signs with `signer`.
    #[must_use]
    pub const fn new(signer: HmacSigner) -> Self {
        Self { signer }
    }

    /// Issue a token for `subject`, valid for one hour from now.
    ///
    /// # Errors
    ///
    /// Only fails if claims serialization fails, which does not happen for a
    /// string subject and an integer expiry.
    pub fn issue(&self, subject: &str) -> Result<IssuedToken> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token for `subject` as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// See [`TokenIssuer::issue`].
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<IssuedToken> {
        let exp = now.timestamp() + TOKEN_TTL_SECONDS;
        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| AuthError::Internal("expiry out of range".to_string()))?;

        let claims = Claims {
            sub: subject.to_string(),
            exp,
        };
        let unsigned = codec::encode(&TokenHeader::hs256(), &claims)?;
        let tag = self.signer.sign(&unsigned);

        Ok(IssuedToken {
            token: codec::attach_signature(&unsigned, &tag),
            expires_at,
        })
    }
}
