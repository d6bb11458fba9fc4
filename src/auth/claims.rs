use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The identity projected into a token at issuance. A snapshot: a later
/// profile change is not reflected until the subject logs in again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityClaims {
    pub sub: Uuid,
    pub name: String,
    pub handle: String,
}

/// The full decoded token payload. The shape is fixed: tokens whose payload
/// carries unknown fields or misses one of these are rejected as malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AuthClaims {
    pub sub: Uuid,
    pub name: String,
    pub handle: String,
    /// Issued-at, epoch seconds.
    pub iat: i64,
    /// Expiry, epoch seconds. Tokens at or past this instant fail verification.
    pub exp: i64,
}

impl AuthClaims {
    pub fn identity(&self) -> IdentityClaims {
        IdentityClaims { sub: self.sub, name: self.name.clone(), handle: self.handle.clone() }
    }
}
