//! Compact token encoding.
//!
//! A token is three base64url (unpadded) segments joined by `.`:
//!
//! ```text
//! base64url(header_json) . base64url(claims_json) . base64url(tag)
//! ```
//!
//! This module only deals with the shape of a token. It never interprets the
//! header or claims; that happens in the authenticator once the signature has
//! been checked.

use base64::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

/// The fixed token header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// Signing algorithm, always `HS256`.
    pub alg: String,
    /// Token type, always `JWT`.
    pub typ: String,
}

impl TokenHeader {
    /// The header carried by every token this crate issues.
    #[must_use]
    pub fn hs256() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated principal (the login username).
    pub sub: String,
    /// Expiry as Unix seconds.
    pub exp: i64,
}

/// A token split into its segments.
///
/// Only the signature is decoded up front; header and claims stay as the
/// exact text that was signed.
#[derive(Debug, Clone)]
pub struct DecodedToken<'a> {
    header: &'a str,
    claims: &'a str,
    signing_input: &'a str,
    signature: Vec<u8>,
}

impl<'a> DecodedToken<'a> {
    /// The `header.claims` prefix the signature was computed over.
    #[must_use]
    pub const fn signing_input(&self) -> &'a str {
        self.signing_input
    }

    /// The decoded signature tag.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Decode the header segment to its JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Malformed` if the segment is not valid base64url.
    pub fn header_bytes(&self) -> Result<Vec<u8>> {
        decode_segment(self.header, "header")
    }

    /// Decode the claims segment to its JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Malformed` if the segment is not valid base64url.
    pub fn claims_bytes(&self) -> Result<Vec<u8>> {
        decode_segment(self.claims, "claims")
    }
}

/// Serialize and encode header and claims into the unsigned `header.claims` form.
///
/// # Errors
///
/// Returns `AuthError::Internal` if JSON serialization fails, which cannot
/// happen for the field types used here.
pub fn encode(header: &TokenHeader, claims: &Claims) -> Result<String> {
    let header_json =
        serde_json::to_vec(header).map_err(|e| AuthError::Internal(e.to_string()))?;
    let claims_json =
        serde_json::to_vec(claims).map_err(|e| AuthError::Internal(e.to_string()))?;

    Ok(format!(
        "{}.{}",
        BASE64_URL_SAFE_NO_PAD.encode(header_json),
        BASE64_URL_SAFE_NO_PAD.encode(claims_json)
    ))
}

/// Append an encoded signature tag to an unsigned token.
#[must_use]
pub fn attach_signature(unsigned: &str, tag: &[u8]) -> String {
    format!("{unsigned}.{}", BASE64_URL_SAFE_NO_PAD.encode(tag))
}

/// Split a token into its segments and decode the signature.
///
/// # Errors
///
/// Returns `AuthError::Malformed` unless the token has exactly three
/// non-empty segments and the last one is canonical base64url.
pub fn decode(token: &str) -> Result<DecodedToken<'_>> {
    let mut parts = token.split('.');
    let (Some(header), Some(claims), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::Malformed("expected 3 segments".to_string()));
    };

    if header.is_empty() || claims.is_empty() || signature.is_empty() {
        return Err(AuthError::Malformed("empty segment".to_string()));
    }

    let signature = decode_segment(signature, "signature")?;
    let signing_input = &token[..header.len() + 1 + claims.len()];

    Ok(DecodedToken {
        header,
        claims,
        signing_input,
        signature,
    })
}

fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>> {
    BASE64_URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| AuthError::Malformed(format!("invalid {name} encoding: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_uses_canonical_json() {
        let claims = Claims {
            sub: "admin".to_string(),
            exp: 1_700_000_000,
        };
        let unsigned = encode(&TokenHeader::hs256(), &claims).unwrap();

        let (header, claims) = unsigned.split_once('.').unwrap();
        assert_eq!(
            BASE64_URL_SAFE_NO_PAD.decode(header).unwrap(),
            br#"{"alg":"HS256","typ":"JWT"}"#
        );
        assert_eq!(
            BASE64_URL_SAFE_NO_PAD.decode(claims).unwrap(),
            br#"{"sub":"admin","exp":1700000000}"#
        );
        assert!(!unsigned.contains('='));
    }

    #[test]
    fn decode_splits_segments() {
        let unsigned = encode(
            &TokenHeader::hs256(),
            &Claims {
                sub: "alice".to_string(),
                exp: 42,
            },
        )
        .unwrap();
        let token = attach_signature(&unsigned, &[1, 2, 3, 4]);

        let decoded = decode(&token).unwrap();
        assert_eq!(decoded.signing_input(), unsigned);
        assert_eq!(decoded.signature(), &[1, 2, 3, 4]);
        assert_eq!(decoded.header_bytes().unwrap(), br#"{"alg":"HS256","typ":"JWT"}"#);
        assert_eq!(decoded.claims_bytes().unwrap(), br#"{"sub":"alice","exp":42}"#);
    }

    #[test]
    fn decode_rejects_wrong_segment_count() {
        for token in ["", "abc", "a.b", "a.b.c.d", "a.b.c."] {
            assert!(
                matches!(decode(token), Err(AuthError::Malformed(_))),
                "accepted {token:?}"
            );
        }
    }

    #[test]
    fn decode_rejects_empty_segments() {
        for token in ["..", ".b.AQID", "a..AQID", "a.b."] {
            assert!(
                matches!(decode(token), Err(AuthError::Malformed(_))),
                "accepted {token:?}"
            );
        }
    }

    #[test]
    fn decode_rejects_bad_signature_encoding() {
        assert!(matches!(decode("a.b.!!!"), Err(AuthError::Malformed(_))));
        // Padded input is not accepted by the unpadded alphabet.
        assert!(matches!(decode("a.b.AQ=="), Err(AuthError::Malformed(_))));
    }

    #[test]
    fn decode_does_not_interpret_header_or_claims() {
        // Garbage in the first two segments is only noticed on demand.
        let decoded = decode("not*base64.also*not.AQID").unwrap();
        assert_eq!(decoded.signature(), &[1, 2, 3]);
        assert!(decoded.claims_bytes().is_err());
        assert!(decoded.header_bytes().is_err());
    }
}
