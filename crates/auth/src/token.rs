//! Token codec: HS256 signing and verification of [`Claims`].
//!
//! A single shared secret is sufficient: the issuer and verifier are the
//! same trust domain, so there is no asymmetric key distribution to do. The
//! secret is an explicitly constructed, injected value; it is never read
//! from process-global state by this crate.

use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;

use crate::claims::Claims;

/// Token verification failure.
///
/// Callers on the request path must collapse all variants to a single
/// externally observable "unauthorized" outcome; the distinction exists for
/// internal diagnostics only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,
}

/// Signs and verifies bearer tokens with a shared HS256 secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // A token is either inside its 7-day window or it is not.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Serialize and sign claims into a compact three-segment token.
    ///
    /// Deterministic given identical claims (including `iat`).
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|_| TokenError::Malformed)
    }

    /// Decode a token, checking signature integrity first, then expiry.
    ///
    /// Both checks are mandatory; either failing invalidates the token
    /// regardless of claim content.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    TokenError::InvalidSignature
                }
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })
    }
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Never expose key material through Debug.
        f.write_str("TokenCodec([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::TOKEN_TTL_SECS;
    use crate::roles::Role;
    use chrono::{Duration, Utc};
    use congrego_core::{Tenant, UserId};

    const SECRET: &[u8] = b"test-secret-for-token-codec";

    fn sample_claims() -> Claims {
        let tenant = Tenant::new("Iglesia Central", "logos/central.png");
        Claims::issue(UserId::new(), "Ana", Role::Admin, &tenant)
    }

    #[test]
    fn verify_round_trips_signed_claims() {
        let codec = TokenCodec::new(SECRET);
        let claims = sample_claims();

        let token = codec.sign(&claims).unwrap();
        let verified = codec.verify(&token).unwrap();

        assert_eq!(verified, claims);
    }

    #[test]
    fn signing_is_deterministic_for_identical_claims() {
        let codec = TokenCodec::new(SECRET);
        let claims = sample_claims();

        assert_eq!(codec.sign(&claims).unwrap(), codec.sign(&claims).unwrap());
    }

    #[test]
    fn token_has_three_base64url_segments() {
        let codec = TokenCodec::new(SECRET);
        let token = codec.sign(&sample_claims()).unwrap();

        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn tampered_signature_segment_fails_verification() {
        let codec = TokenCodec::new(SECRET);
        let token = codec.sign(&sample_claims()).unwrap();

        let (rest, sig) = token.rsplit_once('.').unwrap();

        // Corrupt each character of the signature segment in turn. Every
        // variant must be rejected, and never as a mere expiry failure.
        for i in 0..sig.len() {
            let mut bytes = sig.as_bytes().to_vec();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = format!("{}.{}", rest, String::from_utf8(bytes).unwrap());
            if tampered == token {
                continue;
            }

            let err = codec.verify(&tampered).unwrap_err();
            assert_ne!(err, TokenError::Expired);
        }
    }

    #[test]
    fn wrong_secret_fails_with_invalid_signature() {
        let codec = TokenCodec::new(SECRET);
        let other = TokenCodec::new(b"a-different-secret");

        let token = codec.sign(&sample_claims()).unwrap();
        assert_eq!(other.verify(&token).unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn expired_token_fails_even_with_correct_signature() {
        let codec = TokenCodec::new(SECRET);
        let tenant = Tenant::new("Iglesia Central", "logos/central.png");
        let issued_at = Utc::now() - Duration::seconds(TOKEN_TTL_SECS + 60);
        let claims = Claims::issue_at(UserId::new(), "Ana", Role::Admin, &tenant, issued_at);

        let token = codec.sign(&claims).unwrap();
        assert_eq!(codec.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn garbage_input_is_malformed() {
        let codec = TokenCodec::new(SECRET);
        assert_eq!(codec.verify("not-a-token").unwrap_err(), TokenError::Malformed);
        assert_eq!(codec.verify("a.b.c").unwrap_err(), TokenError::Malformed);
        assert_eq!(codec.verify("").unwrap_err(), TokenError::Malformed);
    }
}
