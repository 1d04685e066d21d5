//! Per-user mutation locks.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use rustc_hash::FxHashMap;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Serializes read-modify-write cycles on the same cart inside this process.
///
/// Entries are held weakly and pruned once no caller references them.
#[derive(Debug, Default)]
pub(crate) struct UserLocks {
    locks: Mutex<FxHashMap<String, Weak<AsyncMutex<()>>>>,
}

impl UserLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = self.lock_for(key);

        lock.lock_owned().await
    }

    fn lock_for(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(lock) = locks.get(key).and_then(Weak::upgrade) {
            return lock;
        }

        let lock = Arc::new(AsyncMutex::new(()));

        locks.insert(key.to_string(), Arc::downgrade(&lock));
        locks.retain(|_, entry| entry.strong_count() > 0);

        lock
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);

        locks.values().filter(|entry| entry.strong_count() > 0).count()
    }
}
