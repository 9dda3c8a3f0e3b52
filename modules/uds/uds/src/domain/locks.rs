//! Per-infrastructure serialization of dynamic-state mutations.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

/// One async mutex per infrastructure id, created on demand and dropped when
/// no task holds or waits for it.
#[derive(Debug, Default)]
pub struct InfraLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl InfraLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `op` while holding the lock of `infra_id`.
    ///
    /// The entry is pruned on the way out even if the returned future is
    /// dropped while waiting for the lock or inside `op`.
    pub async fn run<T, F>(&self, infra_id: &str, op: F) -> T
    where
        F: Future<Output = T>,
    {
        // Declared first so it is dropped after `lock` and `_guard`.
        let _prune = PruneOnDrop {
            locks: &self.locks,
            infra_id,
        };
        let lock = Arc::clone(&self.locks.entry(infra_id.to_owned()).or_default());
        let _guard = lock.lock().await;
        op.await
    }

    /// Number of infrastructures with a live lock.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

struct PruneOnDrop<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    infra_id: &'a str,
}

impl Drop for PruneOnDrop<'_> {
    fn drop(&mut self) {
        self.locks
            .remove_if(self.infra_id, |_, l| Arc::strong_count(l) == 1);
    }
}
