//! Bounded recency-ordered sub-cache
//!
//! Holds entries from most-recently to least-recently used, with a key index
//! into the linked slab. The sub-cache never evicts on its own: callers decide
//! what to drop before inserting into a full bucket.

use std::collections::HashMap;
use std::hash::Hash;

use super::entry::Entry;
use super::slab::{LinkedSlab, NodeId};
use crate::error::{CacheError, Result};

/// Fixed-capacity LRU ordering over [`Entry`] values
#[derive(Debug)]
pub struct RecencyCache<K, V> {
    capacity: usize,
    index: HashMap<K, NodeId>,
    list: LinkedSlab<Entry<K, V>>,
}

impl<K: Hash + Eq + Clone, V> RecencyCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            index: HashMap::new(),
            list: LinkedSlab::new(),
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

    pub fn is_full(&self) -> bool {
        self.list.len() >= self.capacity
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Place `entry` at the most-recent end
    pub fn insert(&mut self, entry: Entry<K, V>) -> Result<&mut Entry<K, V>> {
        if self.index.contains_key(&entry.key) {
            return Err(CacheError::DuplicateKey);
        }
        if self.is_full() {
            return Err(CacheError::BucketFull {
                capacity: self.capacity,
            });
        }
        let key = entry.key.clone();
        let id = self.list.push_front(entry);
        self.index.insert(key, id);
        self.list.get_mut(id).ok_or_else(|| {
            CacheError::InvariantViolation("freshly linked node is vacant".to_string())
        })
    }

    /// Detach the entry for `key`
    pub fn remove(&mut self, key: &K) -> Option<Entry<K, V>> {
        let id = self.index.remove(key)?;
        self.list.remove(id)
    }

    /// Detach the least-recently used entry
    pub fn pop_least_recent(&mut self) -> Option<Entry<K, V>> {
        let entry = self.list.pop_back()?;
        self.index.remove(&entry.key);
        Some(entry)
    }

    /// Move an entry to the most-recent end. Returns false if absent.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.list.move_to_front(id),
            None => false,
        }
    }

    /// Look up without changing recency
    pub fn get(&self, key: &K) -> Option<&Entry<K, V>> {
        let id = self.index.get(key)?;
        self.list.get(*id)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut Entry<K, V>> {
        let id = self.index.get(key)?;
        self.list.get_mut(*id)
    }

    pub fn peek_least_recent(&self) -> Option<&Entry<K, V>> {
        self.list.back().and_then(|id| self.list.get(id))
    }

    /// Entries from most-recent to least-recent
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Entry<K, V>> + '_ {
        self.list.iter().map(|(_, entry)| entry)
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Verify that the key index and the linked sequence agree
    pub fn check_consistency(&self) -> Result<()> {
        if self.index.len() != self.list.len() {
            return Err(CacheError::InvariantViolation(format!(
                "recency index holds {} keys but list holds {} entries",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.list.len() > self.capacity {
            return Err(CacheError::InvariantViolation(format!(
                "recency bucket holds {} entries over capacity {}",
                self.list.len(),
                self.capacity
            )));
        }
        for (id, entry) in self.list.iter() {
            if self.index.get(&entry.key) != Some(&id) {
                return Err(CacheError::InvariantViolation(
                    "list entry not indexed at its own node".to_string(),
                ));
            }
        }
        Ok(())
    }
}
