//! HMAC-SHA-256 signing and constant-time verification.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{AuthError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies token contents with the process secret.
///
/// The key is absorbed into the MAC state once at construction; each
/// operation works on a clone of that state, so the raw secret is never kept.
#[derive(Clone)]
pub struct HmacSigner {
    mac: HmacSha256,
}

impl HmacSigner {
    /// Create a signer from the shared secret.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidKey` if the secret is empty.
    pub fn new(secret: &[u8]) -> Result<Self> {
        if secret.is_empty() {
            return Err(AuthError::InvalidKey("secret must not be empty".to_string()));
        }
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| AuthError::InvalidKey(e.to_string()))?;
        Ok(Self { mac })
    }

    /// Compute the tag over the UTF-8 bytes of `message`.
    #[must_use]
    pub fn sign(&self, message: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(message.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    /// Check `tag` against the tag for `message` without short-circuiting.
    #[must_use]
    pub fn verify(&self, message: &str, tag: &[u8]) -> bool {
        let expected = self.sign(message);
        bool::from(expected.as_slice().ct_eq(tag))
    }
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner")
            .field("algorithm", &"HS256")
            .finish_non_exhaustive()
    }
}
