//! Background sweeper for revocation records. A record whose expiry has
//! passed can never again gate a request (the codec rejects the token on its
//! own), so deleting it is always safe, including concurrently with lookups.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use super::revocation::RevocationBackend;

/// Purge once immediately (clears stale records left over from a previous
/// run), then on every tick. A failed purge is logged and retried on the next
/// tick; it is never fatal.
pub fn spawn_revocation_gc(backend: Arc<dyn RevocationBackend>, interval: Duration) {
    tokio::spawn(async move {
        loop {
            match backend.purge_expired(Utc::now().timestamp()) {
                Ok(removed) => {
                    if removed > 0 { tracing::debug!(removed = removed, "revocation_gc_sweep"); }
                }
                Err(e) => tracing::warn!("revocation GC sweep failed, will retry: {}", e),
            }
            tokio::time::sleep(interval).await;
        }
    });
}
