//! Per-entity write serialisation.
//!
//! Lifecycle operations read an entity, validate a precondition against that
//! snapshot, and write it back. Holding the entity's lock across all three
//! steps makes the precondition check and the write atomic with respect to
//! other operations on the same identifier. Operations on different
//! identifiers never contend.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Guard returned by [`KeyedLocks::lock`]; the key stays locked until it is
/// dropped.
pub type KeyGuard = OwnedMutexGuard<()>;

/// Map of lazily created async mutexes, one per key.
#[derive(Debug)]
pub struct KeyedLocks<K> {
    slots: Mutex<HashMap<K, Weak<AsyncMutex<()>>>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty lock map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until `key` is free and locks it.
    pub async fn lock(&self, key: &K) -> KeyGuard {
        let slot = self.slot(key);
        slot.lock_owned().await
    }

    /// Returns the number of keys that currently have a live mutex.
    #[must_use]
    pub fn live_keys(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.strong_count() > 0).count()
    }

    fn slot(&self, key: &K) -> Arc<AsyncMutex<()>> {
        // The map only holds plain data, so a poisoned lock is still usable.
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = slots.get(key).and_then(Weak::upgrade) {
            return existing;
        }
        slots.retain(|_, slot| slot.strong_count() > 0);
        let created = Arc::new(AsyncMutex::new(()));
        slots.insert(key.clone(), Arc::downgrade(&created));
        created
    }
}
