use serde::{Deserialize, Serialize};

/// Cache hit/miss/eviction counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub updates: u64,
    pub evictions: u64,
    pub hit_rate: f64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
        self.update_hit_rate();
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.update_hit_rate();
    }

    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Total number of `get` calls (hits + misses)
    pub fn total_lookups(&self) -> u64 {
        self.hits + self.misses
    }

    fn update_hit_rate(&mut self) {
        let total = self.total_lookups();
        if total > 0 {
            self.hit_rate = self.hits as f64 / total as f64;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
