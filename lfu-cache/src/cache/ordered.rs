//! Single-list LFU cache
//!
//! Keeps every entry in one list sorted front-to-back by frequency, then by
//! last access. An access bumps the entry and walks it towards the front past
//! everything now ranked below it, so reordering is O(n) in the worst case.
//! Eviction takes the back of the list. Observable behavior matches
//! [`LfuCache`](super::LfuCache); this strategy mainly serves as a simple
//! reference to check it against.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::debug;

use super::entry::Entry;
use super::slab::{LinkedSlab, NodeId};
use super::stats::CacheStats;
use super::{CacheStrategy, FrequencyCache, invariant_violation};
use crate::error::{CacheError, Result};

#[derive(Debug)]
struct Ranked<K, V> {
    entry: Entry<K, V>,
    /// Tick of the last get/put
    touched: u64,
}

impl<K, V> Ranked<K, V> {
    fn rank(&self) -> (u64, u64) {
        (self.entry.frequency, self.touched)
    }
}

/// LFU cache backed by one (frequency, recency)-ordered list
pub struct OrderedLfuCache<K, V> {
    capacity: usize,
    index: HashMap<K, NodeId>,
    list: LinkedSlab<Ranked<K, V>>,
    tick: u64,
    stats: CacheStats,
}

impl<K, V> fmt::Debug for OrderedLfuCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedLfuCache")
            .field("capacity", &self.capacity)
            .field("len", &self.list.len())
            .field("tick", &self.tick)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<K: Hash + Eq + Clone, V> OrderedLfuCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            index: HashMap::new(),
            list: LinkedSlab::new(),
            tick: 0,
            stats: CacheStats::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn frequency_of(&self, key: &K) -> Option<u64> {
        self.ranked(key).map(|ranked| ranked.entry.frequency)
    }

    /// Frequency of the entry next in line for eviction
    pub fn least_frequency(&self) -> Option<u64> {
        self.list
            .back()
            .and_then(|id| self.list.get(id))
            .map(|ranked| ranked.entry.frequency)
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };
        self.stats.record_hit();
        self.touch(id);
        self.list.get(id).map(|ranked| &ranked.entry.value)
    }

    pub fn peek(&self, key: &K) -> Option<&V> {
        self.ranked(key).map(|ranked| &ranked.entry.value)
    }

    pub fn put(&mut self, key: K, value: V) {
        if let Some(&id) = self.index.get(&key) {
            self.stats.record_update();
            if let Some(ranked) = self.list.get_mut(id) {
                ranked.entry.value = value;
            }
            self.touch(id);
            return;
        }

        if self.capacity == 0 {
            return;
        }

        if self.list.len() >= self.capacity {
            self.evict();
        }

        let touched = self.next_tick();
        let id = self.list.push_back(Ranked {
            entry: Entry::new(key.clone(), value),
            touched,
        });
        self.index.insert(key, id);
        self.bubble_up(id);
        self.stats.record_insert();
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
        self.tick = 0;
    }

    fn ranked(&self, key: &K) -> Option<&Ranked<K, V>> {
        let id = self.index.get(key)?;
        self.list.get(*id)
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn touch(&mut self, id: NodeId) {
        let touched = self.next_tick();
        let Some(ranked) = self.list.get_mut(id) else {
            invariant_violation("indexed node is vacant".to_string());
        };
        ranked.entry.frequency += 1;
        ranked.touched = touched;
        self.bubble_up(id);
    }

    /// Relink `id` in front of every predecessor that now ranks below it
    fn bubble_up(&mut self, id: NodeId) {
        let Some(rank) = self.list.get(id).map(Ranked::rank) else {
            return;
        };
        let mut anchor = None;
        let mut cursor = self.list.prev(id);
        while let Some(prev) = cursor {
            match self.list.get(prev) {
                Some(ranked) if ranked.rank() < rank => {
                    anchor = Some(prev);
                    cursor = self.list.prev(prev);
                }
                _ => break,
            }
        }
        if let Some(anchor) = anchor {
            self.list.move_before(id, anchor);
        }
    }

    fn evict(&mut self) {
        let Some(victim) = self.list.pop_back() else {
            invariant_violation("eviction from an empty list".to_string());
        };
        self.index.remove(&victim.entry.key);
        self.stats.record_eviction();
        debug!(
            frequency = victim.entry.frequency,
            remaining = self.list.len(),
            "ordered LFU evict"
        );
    }

    pub fn check_invariants(&self) -> Result<()> {
        if self.index.len() != self.list.len() {
            return Err(CacheError::InvariantViolation(format!(
                "index holds {} keys but list holds {} entries",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.list.len() > self.capacity {
            return Err(CacheError::InvariantViolation(format!(
                "occupancy {} exceeds capacity {}",
                self.list.len(),
                self.capacity
            )));
        }
        let mut previous: Option<(u64, u64)> = None;
        for (id, ranked) in self.list.iter() {
            if self.index.get(&ranked.entry.key) != Some(&id) {
                return Err(CacheError::InvariantViolation(
                    "list entry not indexed at its own node".to_string(),
                ));
            }
            if previous.is_some_and(|above| above <= ranked.rank()) {
                return Err(CacheError::InvariantViolation(
                    "list is not ordered by (frequency, recency)".to_string(),
                ));
            }
            previous = Some(ranked.rank());
        }
        Ok(())
    }
}

impl<K: Hash + Eq + Clone, V> FrequencyCache<K, V> for OrderedLfuCache<K, V> {
    fn get(&mut self, key: &K) -> Option<&V> {
        OrderedLfuCache::get(self, key)
    }

    fn put(&mut self, key: K, value: V) {
        OrderedLfuCache::put(self, key, value)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        OrderedLfuCache::peek(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        OrderedLfuCache::contains_key(self, key)
    }

    fn frequency_of(&self, key: &K) -> Option<u64> {
        OrderedLfuCache::frequency_of(self, key)
    }

    fn least_frequency(&self) -> Option<u64> {
        OrderedLfuCache::least_frequency(self)
    }

    fn len(&self) -> usize {
        self.list.len()
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
        OrderedLfuCache::clear(self)
    }

    fn check_invariants(&self) -> Result<()> {
        OrderedLfuCache::check_invariants(self)
    }

    fn strategy(&self) -> CacheStrategy {
        CacheStrategy::Ordered
    }
}
