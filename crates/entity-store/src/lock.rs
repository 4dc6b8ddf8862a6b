//! Collection-wide and per-key exclusive locks.
//!
//! Both locks release when their guard is dropped, so every exit path of a
//! critical section (including `?` returns) gives the lock back.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};

/// Exclusive lock over a whole collection, regardless of the row touched.
#[derive(Debug, Default)]
pub struct SimpleLock {
    inner: Mutex<()>,
}

impl SimpleLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until the lock is free and takes it.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner.lock().await
    }
}

#[derive(Debug, Default)]
struct Slot {
    mutex: Arc<Mutex<()>>,
    held: AtomicBool,
}

/// Exclusive lock partitioned by key.
///
/// Holders of different keys never wait on each other. Besides the waiting
/// [`lock`](Self::lock), the lock records which keys are held so
/// [`is_locked`](Self::is_locked) can answer without waiting.
/// A key's entry is removed when its last guard drops with no other caller
/// waiting, so the table only holds keys in use.
pub struct KeyedLock<K> {
    slots: Arc<Slots<K>>,
}

type Slots<K> = StdMutex<HashMap<K, Arc<Slot>>>;

impl<K> Default for KeyedLock<K> {
    fn default() -> Self {
        Self {
            slots: Arc::new(StdMutex::new(HashMap::new())),
        }
    }
}

impl<K> fmt::Debug for KeyedLock<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedLock").finish_non_exhaustive()
    }
}

impl<K> KeyedLock<K>
where
    K: Eq + Hash + Copy,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until `key` is free and takes it.
    pub async fn lock(&self, key: K) -> KeyGuard<K> {
        let slot = self.slot(key);
        let guard = slot.mutex.clone().lock_owned().await;
        slot.held.store(true, Ordering::Release);
        KeyGuard {
            key,
            slot,
            slots: self.slots.clone(),
            _guard: guard,
        }
    }

    /// Returns true while some caller holds exactly `key`. Never waits.
    pub fn is_locked(&self, key: K) -> bool {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .is_some_and(|slot| slot.held.load(Ordering::Acquire))
    }

    fn slot(&self, key: K) -> Arc<Slot> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_default()
            .clone()
    }
}

/// Proof that the holder owns one key of a [`KeyedLock`].
pub struct KeyGuard<K: Eq + Hash> {
    key: K,
    slot: Arc<Slot>,
    slots: Arc<Slots<K>>,
    _guard: OwnedMutexGuard<()>,
}

impl<K: Eq + Hash + Copy> KeyGuard<K> {
    /// The key this guard holds.
    pub fn key(&self) -> K {
        self.key
    }
}

impl<K: Eq + Hash + fmt::Debug> fmt::Debug for KeyGuard<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyGuard").field("key", &self.key).finish()
    }
}

impl<K: Eq + Hash> Drop for KeyGuard<K> {
    fn drop(&mut self) {
        // Cleared before the mutex guard field drops and wakes the next waiter.
        self.slot.held.store(false, Ordering::Release);

        // Callers clone a slot only under the table lock, so two references
        // (the table's and ours) mean nobody else is waiting on this key.
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let unused = slots.get(&self.key).is_some_and(|slot| {
            Arc::ptr_eq(slot, &self.slot) && Arc::strong_count(&self.slot) == 2
        });
        if unused {
            slots.remove(&self.key);
        }
    }
}
