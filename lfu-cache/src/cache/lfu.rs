//! LFU (Least Frequently Used) Cache Implementation
//!
//! Entries are grouped into buckets by access frequency. Each bucket is a
//! [`RecencyCache`], so ties on the lowest frequency are broken by evicting
//! the least-recently touched entry. A key index records which bucket every
//! entry lives in, and the lowest occupied frequency is tracked directly, so
//! `get` and `put` are O(1) amortized.
//!
//! # Example
//! ```
//! use lfu_cache::LfuCache;
//!
//! let mut cache = LfuCache::new(2);
//! cache.put(1, "one");
//! cache.put(2, "two");
//! assert_eq!(cache.get(&1), Some(&"one")); // frequency 2
//!
//! cache.put(3, "three"); // evicts key 2, the only entry at frequency 1
//! assert_eq!(cache.get(&2), None);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, trace};

use super::entry::Entry;
use super::recency::RecencyCache;
use super::stats::CacheStats;
use super::{CacheStrategy, FrequencyCache, invariant_violation};
use crate::error::{CacheError, Result};

/// Frequency-bucketed LFU cache
pub struct LfuCache<K, V> {
    capacity: usize,
    len: usize,
    /// Key → frequency of the bucket holding it
    index: HashMap<K, u64>,
    /// Frequency → entries at that frequency; only non-empty buckets are kept
    buckets: HashMap<u64, RecencyCache<K, V>>,
    /// Lowest key in `buckets` while the cache is non-empty
    least_frequency: u64,
    stats: CacheStats,
}

impl<K, V> fmt::Debug for LfuCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len)
            .field("buckets", &self.buckets.len())
            .field("least_frequency", &self.least_frequency)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<K: Hash + Eq + Clone, V> LfuCache<K, V> {
    /// Create a cache holding at most `capacity` entries. Zero is allowed and
    /// stores nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            len: 0,
            index: HashMap::new(),
            buckets: HashMap::new(),
            least_frequency: 1,
            stats: CacheStats::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Number of distinct frequencies currently occupied
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn least_frequency(&self) -> Option<u64> {
        (self.len > 0).then_some(self.least_frequency)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn frequency_of(&self, key: &K) -> Option<u64> {
        self.index.get(key).copied()
    }

    /// Get the value for `key`, bumping its frequency
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let Some(&frequency) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };
        self.stats.record_hit();
        let entry = self.promote(key, frequency);
        Some(&entry.value)
    }

    /// Get the value without counting an access
    pub fn peek(&self, key: &K) -> Option<&V> {
        let frequency = self.index.get(key)?;
        self.buckets
            .get(frequency)
            .and_then(|bucket| bucket.get(key))
            .map(|entry| &entry.value)
    }

    /// Insert or update a key-value pair
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&frequency) = self.index.get(&key) {
            self.stats.record_update();
            let entry = self.promote(&key, frequency);
            entry.value = value;
            return;
        }

        if self.capacity == 0 {
            trace!("LFU cache has zero capacity, dropping put");
            return;
        }

        if self.len >= self.capacity {
            self.evict();
        }

        self.index.insert(key.clone(), 1);
        self.insert_into_bucket(1, Entry::new(key, value));
        self.len += 1;
        self.least_frequency = 1;
        self.stats.record_insert();
    }

    /// Remove all entries, keeping statistics
    pub fn clear(&mut self) {
        let count = self.len;
        self.index.clear();
        self.buckets.clear();
        self.len = 0;
        self.least_frequency = 1;
        debug!(count, "LFU cache cleared");
    }

    /// Move the entry for `key` from bucket `frequency` to `frequency + 1`
    fn promote(&mut self, key: &K, frequency: u64) -> &mut Entry<K, V> {
        let Some(bucket) = self.buckets.get_mut(&frequency) else {
            invariant_violation(format!("no bucket for indexed frequency {frequency}"));
        };
        let Some(mut entry) = bucket.remove(key) else {
            invariant_violation(format!("key missing from its frequency {frequency} bucket"));
        };

        if bucket.is_empty() {
            self.buckets.remove(&frequency);
            trace!(frequency, "dropped empty frequency bucket");
            // Frequencies only ever grow by one, so nothing can sit between
            // the emptied minimum and the bucket this entry is moving into.
            if frequency == self.least_frequency {
                self.least_frequency = frequency + 1;
            }
        }

        let next = frequency + 1;
        entry.frequency = next;
        if let Some(indexed) = self.index.get_mut(key) {
            *indexed = next;
        }
        trace!(from = frequency, to = next, "promoted entry");
        self.insert_into_bucket(next, entry)
    }

    fn insert_into_bucket(&mut self, frequency: u64, entry: Entry<K, V>) -> &mut Entry<K, V> {
        let capacity = self.capacity;
        let bucket = self.buckets.entry(frequency).or_insert_with(|| {
            trace!(frequency, "created frequency bucket");
            RecencyCache::new(capacity)
        });
        bucket.insert(entry).unwrap_or_else(|err| {
            invariant_violation(format!("bucket {frequency} rejected entry: {err}"))
        })
    }

    /// Drop the least-recently used entry at the lowest frequency
    fn evict(&mut self) {
        let frequency = self.least_frequency;
        let Some(bucket) = self.buckets.get_mut(&frequency) else {
            invariant_violation(format!("no bucket at least frequency {frequency}"));
        };
        let Some(victim) = bucket.pop_least_recent() else {
            invariant_violation(format!("empty bucket retained at frequency {frequency}"));
        };
        if bucket.is_empty() {
            self.buckets.remove(&frequency);
        }

        self.index.remove(&victim.key);
        self.len -= 1;
        self.stats.record_eviction();
        debug!(frequency, remaining = self.len, "LFU evict");
    }

    /// Verify every structural invariant by exhaustive scan
    pub fn check_invariants(&self) -> Result<()> {
        if self.len != self.index.len() {
            return Err(CacheError::InvariantViolation(format!(
                "occupancy {} differs from index size {}",
                self.len,
                self.index.len()
            )));
        }
        if self.len > self.capacity {
            return Err(CacheError::InvariantViolation(format!(
                "occupancy {} exceeds capacity {}",
                self.len, self.capacity
            )));
        }

        let mut resident = 0;
        for (&frequency, bucket) in &self.buckets {
            if bucket.is_empty() {
                return Err(CacheError::InvariantViolation(format!(
                    "empty bucket retained at frequency {frequency}"
                )));
            }
            bucket.check_consistency()?;
            for entry in bucket.iter() {
                if entry.frequency != frequency {
                    return Err(CacheError::InvariantViolation(format!(
                        "entry at frequency {} stored in bucket {frequency}",
                        entry.frequency
                    )));
                }
                if self.index.get(&entry.key) != Some(&frequency) {
                    return Err(CacheError::InvariantViolation(format!(
                        "bucket {frequency} holds a key indexed elsewhere"
                    )));
                }
            }
            resident += bucket.len();
        }
        if resident != self.index.len() {
            return Err(CacheError::InvariantViolation(format!(
                "buckets hold {resident} entries, index holds {}",
                self.index.len()
            )));
        }

        if self.len > 0 {
            let minimum = self.buckets.keys().min().copied();
            if minimum != Some(self.least_frequency) {
                return Err(CacheError::InvariantViolation(format!(
                    "least frequency {} but lowest bucket is {minimum:?}",
                    self.least_frequency
                )));
            }
        }
        Ok(())
    }
}

impl<K: Hash + Eq + Clone, V> FrequencyCache<K, V> for LfuCache<K, V> {
    fn get(&mut self, key: &K) -> Option<&V> {
        LfuCache::get(self, key)
    }

    fn put(&mut self, key: K, value: V) {
        LfuCache::put(self, key, value)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        LfuCache::peek(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        LfuCache::contains_key(self, key)
    }

    fn frequency_of(&self, key: &K) -> Option<u64> {
        LfuCache::frequency_of(self, key)
    }

    fn least_frequency(&self) -> Option<u64> {
        LfuCache::least_frequency(self)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn reset_stats(&mut self) {
        self.stats.reset();
    }

    fn clear(&mut self) {
        LfuCache::clear(self)
    }

    fn check_invariants(&self) -> Result<()> {
        LfuCache::check_invariants(self)
    }

    fn strategy(&self) -> CacheStrategy {
        CacheStrategy::Bucketed
    }
}
