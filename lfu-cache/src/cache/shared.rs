use parking_lot::Mutex;
use std::hash::Hash;
use std::sync::Arc;

use super::stats::CacheStats;
use super::{CacheStrategy, FrequencyCache, build_cache};
use crate::error::Result;

/// Thread-safe handle to an LFU cache
///
/// A single lock guards the whole cache: a promotion rewrites two buckets and
/// the key index together, so nothing finer-grained is sound.
pub struct SharedCache<K, V> {
    inner: Arc<Mutex<Box<dyn FrequencyCache<K, V> + Send>>>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    /// Create a shared cache using the given strategy
    pub fn new(strategy: CacheStrategy, capacity: usize) -> Self {
        Self::from_cache(build_cache(strategy, capacity))
    }

    /// Wrap an existing cache
    pub fn from_cache(cache: Box<dyn FrequencyCache<K, V> + Send>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Get a copy of the value for `key`, counting the access
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    pub fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    pub fn frequency_of(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency_of(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn strategy(&self) -> CacheStrategy {
        self.inner.lock().strategy()
    }

    /// Snapshot of the current statistics
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats().clone()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn check_invariants(&self) -> Result<()> {
        self.inner.lock().check_invariants()
    }

    /// Run a compound operation while holding the lock
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn FrequencyCache<K, V>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut **guard)
    }
}
