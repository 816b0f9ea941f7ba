use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use service::ServiceError;
use time::Date;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

type CommitKey = (Uuid, Date);

/// Serializes booking commits per provider and calendar date.
///
/// Each key maps to an async mutex which only lives while somebody holds or awaits
/// it. The entry is dropped by the last holder.
#[derive(Debug, Default)]
pub struct CommitGuard {
    locks: DashMap<CommitKey, Arc<Mutex<()>>>,
}

/// Proof of exclusive access to a set of (provider, date) keys. Releases them on drop.
pub struct CommitPermit<'a> {
    guard: &'a CommitGuard,
    held: Vec<(CommitKey, OwnedMutexGuard<()>)>,
}

impl CommitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks all `dates` of the provider in ascending order so that two commits
    /// spanning the same dates can never wait on each other crosswise.
    pub async fn acquire(
        &self,
        provider_id: Uuid,
        dates: &[Date],
        timeout: Duration,
    ) -> Result<CommitPermit<'_>, ServiceError> {
        let mut keys = dates
            .iter()
            .map(|date| (provider_id, *date))
            .collect::<Vec<_>>();
        keys.sort();
        keys.dedup();

        let mut permit = CommitPermit {
            guard: self,
            held: Vec::with_capacity(keys.len()),
        };
        let lock_all = async {
            for key in keys {
                let mutex = Arc::clone(self.locks.entry(key).or_default().value());
                let lock = mutex.lock_owned().await;
                permit.held.push((key, lock));
            }
        };
        if tokio::time::timeout(timeout, lock_all).await.is_err() {
            tracing::warn!(
                "Commit lock for provider {} not acquired within {:?}",
                provider_id,
                timeout
            );
            return Err(ServiceError::CommitLockTimeout(timeout));
        }
        Ok(permit)
    }

    /// Number of keys currently locked or awaited.
    pub fn active_keys(&self) -> usize {
        self.locks.len()
    }
}

impl Drop for CommitPermit<'_> {
    fn drop(&mut self) {
        for (key, lock) in self.held.drain(..).rev() {
            drop(lock);
            self.guard
                .locks
                .remove_if(&key, |_, mutex| Arc::strong_count(mutex) == 1);
        }
    }
}
