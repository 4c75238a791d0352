//! Per-Target advisory locking (§5): guards the two hot boot/map endpoints
//! so at most one negotiation runs per target at a time. This is a
//! single-replica mitigation — it says nothing about a second control-plane
//! process talking to the same tgtadm daemon, which the Non-goals exclude.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::error::{Error, Result};

/// Default advisory-lock wait if [`Config`](crate::Core::new) is not given
/// an explicit one.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct TargetLocks {
    inner: Arc<RwLock<HashMap<i64, Arc<Mutex<()>>>>>,
    timeout: Duration,
}

impl Default for TargetLocks {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}

impl TargetLocks {
    pub fn new(timeout: Duration) -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())), timeout }
    }

    async fn entry(&self, target_id: i64) -> Arc<Mutex<()>> {
        if let Some(lock) = self.inner.read().await.get(&target_id) {
            return lock.clone();
        }
        let mut write = self.inner.write().await;
        write.entry(target_id).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }

    /// Acquires the advisory lock for `target_id`, waiting up to the
    /// configured timeout. Drop the returned guard to release it at the end
    /// of the critical section (the boot or map negotiation).
    pub async fn acquire(&self, target_id: i64) -> Result<OwnedMutexGuard<()>> {
        let lock = self.entry(target_id).await;
        tokio::time::timeout(self.timeout, lock.lock_owned())
            .await
            .map_err(|_| Error::Conflict(format!("timed out waiting for the advisory lock on target {target_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_target_id_serializes_through_one_mutex() {
        let locks = TargetLocks::default();
        let lock_a = locks.entry(1).await;
        let lock_b = locks.entry(1).await;
        assert!(Arc::ptr_eq(&lock_a, &lock_b));
    }

    #[tokio::test]
    async fn different_target_ids_get_independent_mutexes() {
        let locks = TargetLocks::default();
        let lock_a = locks.entry(1).await;
        let lock_b = locks.entry(2).await;
        assert!(!Arc::ptr_eq(&lock_a, &lock_b));
    }

    #[tokio::test]
    async fn acquire_actually_excludes_concurrent_holders() {
        let locks = TargetLocks::default();
        let lock = locks.entry(9).await;

        let first = lock.clone().lock_owned().await;
        let second_attempt = tokio::time::timeout(Duration::from_millis(50), lock.clone().lock_owned()).await;
        assert!(second_attempt.is_err());
        drop(first);
    }

    #[tokio::test]
    async fn acquire_times_out_when_the_lock_is_held_past_the_configured_wait() {
        let locks = TargetLocks::new(Duration::from_millis(20));
        let _held = locks.acquire(1).await.unwrap();
        let err = locks.acquire(1).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }
}
