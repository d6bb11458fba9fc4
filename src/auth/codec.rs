//! Signed-token issuance and verification. Stateless: a codec is a pair of
//! derived keys plus a pinned validation policy, safe to share across
//! concurrent requests.

use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::{AuthClaims, IdentityClaims};

/// Typed verification failure. The gate maps every variant to the same
/// unauthenticated response; the distinction exists for logs and tests, not
/// for callers probing which check tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token is expired")]
    Expired,
}

pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Build a codec from the server secret. An empty secret is a
    /// configuration error surfaced at startup, never per request.
    pub fn new(secret: &str, ttl: Duration) -> Result<Self> {
        if secret.is_empty() {
            return Err(anyhow!("token signing secret is not configured"));
        }
        // The accepted algorithm is pinned here and never read back from a
        // presented token's header.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration { self.ttl }

    /// Issue a token carrying the identity snapshot, stamped `iat = now`,
    /// `exp = now + ttl`.
    pub fn issue(&self, identity: &IdentityClaims) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = AuthClaims {
            sub: identity.sub,
            name: identity.name.clone(),
            handle: identity.handle.clone(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| anyhow!("token encoding failed: {}", e))
    }

    /// Check signature integrity and expiry; return the decoded claims or a
    /// typed failure.
    pub fn verify(&self, token: &str) -> Result<AuthClaims, VerifyError> {
        let data = decode::<AuthClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => VerifyError::Expired,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName => VerifyError::SignatureInvalid,
                _ => VerifyError::Malformed,
            }
        })?;
        // Invariant: a check at exactly `iat + ttl` already fails. The
        // library's exp check is strict-less-than, so close the boundary
        // instant here.
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(VerifyError::Expired);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn codec() -> TokenCodec {
        TokenCodec::new("unit-test-secret", Duration::from_secs(3600)).unwrap()
    }

    fn some_identity() -> IdentityClaims {
        IdentityClaims { sub: Uuid::new_v4(), name: "Ada".into(), handle: "ada".into() }
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        assert!(TokenCodec::new("", Duration::from_secs(3600)).is_err());
    }

    #[test]
    fn round_trip_returns_the_issued_claims() {
        let codec = codec();
        let identity = some_identity();
        let token = codec.issue(&identity).unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.identity(), identity);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(codec().verify("not-a-token").unwrap_err(), VerifyError::Malformed);
        assert_eq!(codec().verify("a.b.c").unwrap_err(), VerifyError::Malformed);
    }

    #[test]
    fn wrong_secret_is_signature_invalid() {
        let other = TokenCodec::new("a-different-secret", Duration::from_secs(3600)).unwrap();
        let token = other.issue(&some_identity()).unwrap();
        assert_eq!(codec().verify(&token).unwrap_err(), VerifyError::SignatureInvalid);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let codec = codec();
        let token = codec.issue(&some_identity()).unwrap();
        // Flip a character inside the payload segment; the signature no
        // longer matches (or the segment stops decoding at all).
        let mut parts: Vec<String> = token.split('.').map(|s| s.to_string()).collect();
        let mid = parts[1].len() / 2;
        let flipped = if parts[1].as_bytes()[mid] == b'A' { 'B' } else { 'A' };
        parts[1].replace_range(mid..mid + 1, &flipped.to_string());
        assert!(codec.verify(&parts.join(".")).is_err());
    }

    #[test]
    fn expired_token_fails_verification() {
        // Hand-encode claims whose exp is already in the past, signed with
        // the same secret.
        let now = Utc::now().timestamp();
        let claims = AuthClaims {
            sub: Uuid::new_v4(),
            name: "Ada".into(),
            handle: "ada".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        assert_eq!(codec().verify(&token).unwrap_err(), VerifyError::Expired);
    }

    #[test]
    fn expiry_boundary_is_closed() {
        // exp == now must already fail.
        let now = Utc::now().timestamp();
        let claims = AuthClaims {
            sub: Uuid::new_v4(),
            name: "Ada".into(),
            handle: "ada".into(),
            iat: now - 3600,
            exp: now,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        assert_eq!(codec().verify(&token).unwrap_err(), VerifyError::Expired);
    }

    #[test]
    fn algorithm_is_pinned_not_negotiated() {
        // A token signed with the right secret but a different HMAC variant
        // must not verify.
        let now = Utc::now().timestamp();
        let claims = AuthClaims {
            sub: Uuid::new_v4(),
            name: "Ada".into(),
            handle: "ada".into(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        assert!(codec().verify(&token).is_err());
    }

    #[test]
    fn unknown_claim_fields_are_rejected() {
        let now = Utc::now().timestamp();
        let payload = serde_json::json!({
            "sub": Uuid::new_v4(),
            "name": "Ada",
            "handle": "ada",
            "iat": now,
            "exp": now + 3600,
            "role": "admin",
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        assert_eq!(codec().verify(&token).unwrap_err(), VerifyError::Malformed);
    }
}
