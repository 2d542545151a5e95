use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type Relays = Arc<DashMap<i64, Arc<Mutex<()>>>>;

/// One async mutex per relay. Whoever holds a relay's guard is the only
/// writer choosing a leg on that relay.
#[derive(Debug, Clone, Default)]
pub struct RelayLocks {
    relays: Relays,
}

impl RelayLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, relay_id: i64) -> RelayGuard {
        let mutex = self.relays.entry(relay_id).or_default().clone();
        let guard = mutex.lock_owned().await;
        RelayGuard {
            guard: Some(guard),
            relays: self.relays.clone(),
            relay_id,
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.relays.len()
    }

    #[cfg(test)]
    fn holders(&self, relay_id: i64) -> usize {
        self.relays
            .get(&relay_id)
            .map_or(0, |mutex| Arc::strong_count(mutex.value()))
    }
}

// Waiters hold a clone of the mutex, so only the map's own copy means the
// relay is idle.
fn is_idle(_: &i64, mutex: &Arc<Mutex<()>>) -> bool {
    Arc::strong_count(mutex) == 1
}

/// Held while a relay's legs are read and written. Dropping the last guard
/// of a relay that nobody waits for removes its mutex from the map.
#[derive(Debug)]
pub struct RelayGuard {
    guard: Option<OwnedMutexGuard<()>>,
    relays: Relays,
    relay_id: i64,
}

impl Drop for RelayGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.relays.remove_if(&self.relay_id, is_idle);
    }
}
