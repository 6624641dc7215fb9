//! Cache Module
//!
//! Least-Frequently-Used caching with two interchangeable strategies:
//! - Bucketed: one recency sub-cache per frequency, O(1) get/put
//! - Ordered: a single list kept sorted by (frequency, recency)
//!
//! Both evict the least-recently touched entry among those with the lowest
//! access frequency.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use tracing::error;

use crate::error::{CacheError, Result};

pub mod entry;
pub mod lfu;
pub mod ordered;
pub mod recency;
pub mod shared;
mod slab;
pub mod stats;

pub use entry::Entry;
pub use lfu::LfuCache;
pub use ordered::OrderedLfuCache;
pub use recency::RecencyCache;
pub use shared::SharedCache;
pub use stats::CacheStats;

/// Cache implementation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStrategy {
    /// Frequency buckets of recency sub-caches
    #[default]
    Bucketed,
    /// Single list ordered by (frequency, recency)
    Ordered,
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bucketed => write!(f, "bucketed"),
            Self::Ordered => write!(f, "ordered"),
        }
    }
}

impl FromStr for CacheStrategy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bucketed" => Ok(Self::Bucketed),
            "ordered" => Ok(Self::Ordered),
            other => Err(CacheError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Common contract of the LFU strategies
pub trait FrequencyCache<K, V> {
    /// Look up `key`, counting the access. `None` on a miss.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Insert or overwrite `key`, evicting first if a new key finds the cache full
    fn put(&mut self, key: K, value: V);

    /// Look up without counting the access
    fn peek(&self, key: &K) -> Option<&V>;

    fn contains_key(&self, key: &K) -> bool;

    /// Current access frequency of a resident key
    fn frequency_of(&self, key: &K) -> Option<u64>;

    /// Lowest frequency among resident entries
    fn least_frequency(&self) -> Option<u64>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn stats(&self) -> &CacheStats;

    fn reset_stats(&mut self);

    fn clear(&mut self);

    /// Exhaustively verify internal consistency
    fn check_invariants(&self) -> Result<()>;

    fn strategy(&self) -> CacheStrategy;
}

/// Build a boxed cache for the given strategy
pub fn build_cache<K, V>(
    strategy: CacheStrategy,
    capacity: usize,
) -> Box<dyn FrequencyCache<K, V> + Send>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    match strategy {
        CacheStrategy::Bucketed => Box::new(LfuCache::new(capacity)),
        CacheStrategy::Ordered => Box::new(OrderedLfuCache::new(capacity)),
    }
}

/// Abort on a broken internal invariant; this is a logic bug, never a runtime condition
#[cold]
pub(crate) fn invariant_violation(message: String) -> ! {
    error!(%message, "cache invariant violated");
    panic!("cache invariant violated: {message}");
}
