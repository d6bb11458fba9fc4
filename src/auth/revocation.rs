//! Revoked-token records: a persisted set of token strings, each carrying the
//! token's own expiry so the sweeper knows when a record can never matter
//! again. The storage engine behind the trait is interchangeable; the access
//! pattern is not: `is_revoked` must observe every `revoke` that committed
//! before the calling request began.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;

pub trait RevocationBackend: Send + Sync {
    /// Point lookup.
    fn is_revoked(&self, token: &str) -> Result<bool>;
    /// Idempotent insert: revoking an already-revoked token is a no-op.
    fn revoke(&self, token: &str, expires_at: i64) -> Result<()>;
    /// Delete every record with `expires_at < now`; returns the count removed.
    fn purge_expired(&self, now: i64) -> Result<usize>;
}

/// In-process backend: token -> expires_at under a single RwLock, which gives
/// read-after-write consistency for free.
#[derive(Debug, Clone, Default)]
pub struct MemoryRevocationStore {
    inner: Arc<RwLock<HashMap<String, i64>>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self { Self::default() }

    #[cfg(test)]
    pub fn len(&self) -> usize { self.inner.read().len() }
}

impl RevocationBackend for MemoryRevocationStore {
    fn is_revoked(&self, token: &str) -> Result<bool> {
        Ok(self.inner.read().contains_key(token))
    }

    fn revoke(&self, token: &str, expires_at: i64) -> Result<()> {
        self.inner.write().entry(token.to_string()).or_insert(expires_at);
        Ok(())
    }

    fn purge_expired(&self, now: i64) -> Result<usize> {
        let mut m = self.inner.write();
        let before = m.len();
        m.retain(|_, exp| *exp >= now);
        Ok(before - m.len())
    }
}
