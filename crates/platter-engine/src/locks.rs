//! # Per-User Cart Locks
//!
//! Every cart mutation is a read-modify-write of the whole cart. Two
//! overlapping requests from the same user (two browser tabs) would
//! otherwise both read the old cart and the second write would discard the
//! first. Operations for one user are serialized here; different users
//! never wait on each other.
//!
//! ```text
//! user A ─┐                 ┌─ Mutex(A) ─► load → mutate → save
//! user A ─┤──► CartLocks ───┤     (second request waits)
//! user B ─┘                 └─ Mutex(B) ─► load → mutate → save
//! ```
//!
//! Only the map itself sits behind a std `Mutex`; it is never held across
//! an `.await`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Idle entries are pruned once the map grows past this many users.
const PRUNE_THRESHOLD: usize = 1024;

/// Keyed async mutexes, one per user id.
#[derive(Debug, Clone, Default)]
pub struct CartLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl CartLocks {
    pub fn new() -> Self {
        CartLocks::default()
    }

    /// Waits for exclusive access to a user's cart.
    ///
    /// The guard releases the lock on drop.
    pub async fn lock(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let entry = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            if map.len() >= PRUNE_THRESHOLD {
                prune(&mut map);
            }
            map.entry(user_id.to_string()).or_default().clone()
        };
        entry.lock_owned().await
    }

    /// Number of users with a lock entry.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops entries nobody holds or waits on.
    pub fn prune_idle(&self) {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        prune(&mut map);
    }
}

// An entry only the map references has no holder and no waiter. New
// references are only handed out under the map lock, so removal is safe.
fn prune(map: &mut HashMap<String, Arc<AsyncMutex<()>>>) {
    map.retain(|_, entry| Arc::strong_count(entry) > 1);
}

// =============================================================================
// Unit Tests
// =============================================================================
