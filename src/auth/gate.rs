//! The authentication chokepoint. Every protected request passes through
//! here; the `Identity` this gate attaches is the only channel downstream
//! services may trust for actor identity, never a body field or a custom
//! header.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::error::AppError;
use crate::server::AppState;

use super::claims::AuthClaims;
use super::codec::TokenCodec;
use super::revocation::RevocationBackend;

const BEARER_PREFIX: &str = "Bearer ";

/// The verified, request-scoped actor identity. Owned by the request
/// lifecycle; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub sub: Uuid,
    pub name: String,
    pub handle: String,
}

impl From<&AuthClaims> for Identity {
    fn from(claims: &AuthClaims) -> Self {
        Identity { sub: claims.sub, name: claims.name.clone(), handle: claims.handle.clone() }
    }
}

/// The raw credential as presented, kept alongside `Identity` so logout can
/// revoke exactly the string the client holds.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Decide authentication for one request. Terminal on the first matching
/// state: no credential, bad shape, revoked, failed verification, ok.
/// A revocation-store error fails closed.
pub fn authenticate(
    authorization: Option<&str>,
    codec: &TokenCodec,
    revocations: &dyn RevocationBackend,
) -> Result<(Identity, String), AppError> {
    let Some(header) = authorization else {
        return Err(AppError::unauthenticated("no_token", "no token presented"));
    };
    let Some(token) = header.strip_prefix(BEARER_PREFIX).filter(|t| !t.is_empty()) else {
        return Err(AppError::unauthenticated("bad_token_format", "credential must be sent as 'Bearer <token>'"));
    };
    // Revocation first: cheaper than signature verification, and a revoked
    // token must never authenticate regardless of its signature.
    match revocations.is_revoked(token) {
        Ok(true) => {
            return Err(AppError::unauthenticated("token_revoked", "token has been revoked, log in again"));
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("revocation lookup failed, rejecting request: {}", e);
            return Err(AppError::unauthenticated("auth_unavailable", "could not authenticate the request"));
        }
    }
    let claims = codec
        .verify(token)
        .map_err(|_| AppError::unauthenticated("invalid_token", "invalid or expired token"))?;
    Ok((Identity::from(&claims), token.to_string()))
}

/// Axum layer form of the gate: rejects, or attaches `Identity` and
/// `BearerToken` to the request extensions and continues to the handler.
pub async fn require_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let (identity, token) = authenticate(header.as_deref(), &state.codec, state.revocations.as_ref())?;
    req.extensions_mut().insert(identity);
    req.extensions_mut().insert(BearerToken(token));
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::IdentityClaims;
    use crate::auth::revocation::MemoryRevocationStore;
    use std::time::Duration;

    fn codec() -> TokenCodec {
        TokenCodec::new("gate-test-secret", Duration::from_secs(3600)).unwrap()
    }

    fn issue(codec: &TokenCodec) -> (IdentityClaims, String) {
        let identity = IdentityClaims { sub: Uuid::new_v4(), name: "Ada".into(), handle: "ada".into() };
        let token = codec.issue(&identity).unwrap();
        (identity, token)
    }

    fn expect_unauthenticated(result: Result<(Identity, String), AppError>, code: &str) {
        match result {
            Err(AppError::Unauthenticated { code: c, .. }) => assert_eq!(c, code),
            other => panic!("expected Unauthenticated({}), got {:?}", code, other.map(|(i, _)| i)),
        }
    }

    #[test]
    fn missing_header_is_rejected() {
        let revocations = MemoryRevocationStore::new();
        expect_unauthenticated(authenticate(None, &codec(), &revocations), "no_token");
    }

    #[test]
    fn wrong_scheme_is_rejected() {
        let codec = codec();
        let revocations = MemoryRevocationStore::new();
        let (_, token) = issue(&codec);
        expect_unauthenticated(authenticate(Some(&token), &codec, &revocations), "bad_token_format");
        expect_unauthenticated(authenticate(Some(&format!("Basic {}", token)), &codec, &revocations), "bad_token_format");
        expect_unauthenticated(authenticate(Some("Bearer "), &codec, &revocations), "bad_token_format");
    }

    #[test]
    fn revoked_token_is_rejected_before_verification() {
        let codec = codec();
        let revocations = MemoryRevocationStore::new();
        let (_, token) = issue(&codec);
        revocations.revoke(&token, i64::MAX).unwrap();
        let header = format!("Bearer {}", token);
        expect_unauthenticated(authenticate(Some(&header), &codec, &revocations), "token_revoked");
    }

    #[test]
    fn unverifiable_token_is_rejected() {
        let codec = codec();
        let revocations = MemoryRevocationStore::new();
        expect_unauthenticated(
            authenticate(Some("Bearer not.a.token"), &codec, &revocations),
            "invalid_token",
        );
    }

    #[test]
    fn valid_token_yields_identity_and_raw_token() {
        let codec = codec();
        let revocations = MemoryRevocationStore::new();
        let (identity, token) = issue(&codec);
        let header = format!("Bearer {}", token);
        let (ctx, raw) = authenticate(Some(&header), &codec, &revocations).unwrap();
        assert_eq!(ctx.sub, identity.sub);
        assert_eq!(ctx.handle, identity.handle);
        assert_eq!(raw, token);
    }

    #[test]
    fn backend_failure_fails_closed() {
        struct BrokenStore;
        impl RevocationBackend for BrokenStore {
            fn is_revoked(&self, _: &str) -> anyhow::Result<bool> { anyhow::bail!("store offline") }
            fn revoke(&self, _: &str, _: i64) -> anyhow::Result<()> { anyhow::bail!("store offline") }
            fn purge_expired(&self, _: i64) -> anyhow::Result<usize> { anyhow::bail!("store offline") }
        }
        let codec = codec();
        let (_, token) = issue(&codec);
        let header = format!("Bearer {}", token);
        expect_unauthenticated(authenticate(Some(&header), &codec, &BrokenStore), "auth_unavailable");
    }
}
