// ── Per-network-domain locks ──
//
// Mutating calls against the same network domain are serialized so two
// rules cannot race on the domain's ACL ordering. Different domains
// proceed independently. Reads never lock.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Registry of one async mutex per network domain ID.
#[derive(Debug, Default)]
pub struct DomainLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Held while a mutating call runs. Dropping it releases the domain.
#[derive(Debug)]
pub struct DomainLockGuard {
    network_domain: String,
    owner: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl DomainLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `network_domain`. `owner` labels the
    /// caller in lock logs, e.g. `create(name = 'web')`.
    pub async fn lock(&self, network_domain: &str, owner: impl Into<String>) -> DomainLockGuard {
        let owner = owner.into();
        // Clone the mutex out so the map shard is not held across the await.
        let mutex = Arc::clone(
            self.locks
                .entry(network_domain.to_owned())
                .or_default()
                .value(),
        );

        debug!(network_domain, owner, "acquiring network domain lock");
        let guard = mutex.lock_owned().await;
        debug!(network_domain, owner, "acquired network domain lock");

        DomainLockGuard {
            network_domain: network_domain.to_owned(),
            owner,
            guard: Some(guard),
        }
    }

    /// Number of domains that have been locked at least once.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl DomainLockGuard {
    pub fn network_domain(&self) -> &str {
        &self.network_domain
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }
}

impl Drop for DomainLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        debug!(
            network_domain = %self.network_domain,
            owner = %self.owner,
            "released network domain lock"
        );
    }
}
