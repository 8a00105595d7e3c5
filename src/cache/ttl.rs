//! Keyed cache with a fixed time-to-live per entry.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug)]
struct Entry<V> {
    value: Arc<V>,
    expires_at: Instant,
}

/// Unbounded map whose entries expire `ttl` after insertion.
///
/// Values are shared as `Arc<V>` so hits never clone the payload.
/// Expired entries are invisible to [`TtlCache::get`] and are dropped by
/// [`TtlCache::purge_expired`] or the next insert under the same key.
/// Concurrent inserts for one key are last-write-wins. A zero TTL
/// disables caching.
///
/// Every invalidation advances a generation counter. A value computed
/// before an invalidation is offered back through
/// [`TtlCache::insert_if_current`] and is dropped instead of stored.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    generation: AtomicU64,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty cache with the given time-to-live.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
            ttl,
        }
    }

    /// The configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns `true` when the TTL is non-zero.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Current invalidation generation. Read it before computing a value
    /// that will be passed to [`TtlCache::insert_if_current`].
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Returns the live value for `key`, if any.
    pub async fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let map = self.entries.read().await;
        map.get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Stores `value` under `key`, replacing any previous entry, and
    /// returns the shared handle. Nothing is stored when caching is
    /// disabled.
    pub async fn insert(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        if self.is_enabled() {
            let entry = Entry {
                value: Arc::clone(&value),
                expires_at: Instant::now() + self.ttl,
            };
            self.entries.write().await.insert(key, entry);
        }
        value
    }

    /// Like [`TtlCache::insert`], but stores only when no invalidation
    /// happened since `generation` was read. The value is returned either
    /// way.
    pub async fn insert_if_current(&self, key: K, value: V, generation: u64) -> Arc<V> {
        let value = Arc::new(value);
        if self.is_enabled() {
            let mut map = self.entries.write().await;
            if self.generation.load(Ordering::Acquire) == generation {
                let entry = Entry {
                    value: Arc::clone(&value),
                    expires_at: Instant::now() + self.ttl,
                };
                map.insert(key, entry);
            }
        }
        value
    }

    /// Removes the entry for `key`. Returns `true` if one was present.
    pub async fn invalidate<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let mut map = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        map.remove(key).is_some()
    }

    /// Removes every entry. Returns how many were present.
    pub async fn invalidate_all(&self) -> usize {
        let mut map = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        let count = map.len();
        map.clear();
        count
    }

    /// Drops expired entries. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut map = self.entries.write().await;
        let before = map.len();
        map.retain(|_, entry| entry.expires_at > now);
        before - map.len()
    }

    /// Number of stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
