// Conformance scenarios shared by every LFU strategy

use lfu_cache::{CacheStrategy, FrequencyCache, build_cache};

const STRATEGIES: [CacheStrategy; 2] = [CacheStrategy::Bucketed, CacheStrategy::Ordered];

fn cache(strategy: CacheStrategy, capacity: usize) -> Box<dyn FrequencyCache<i64, i64> + Send> {
    build_cache(strategy, capacity)
}

#[test]
fn test_evicts_least_frequent() {
    for strategy in STRATEGIES {
        let mut lfu = cache(strategy, 2);
        lfu.put(1, 1);
        lfu.put(2, 2);
        assert_eq!(lfu.len(), 2);
        assert_eq!(lfu.get(&1), Some(&1), "{strategy}");

        // 2 is the only key at frequency 1
        lfu.put(3, 3);
        assert_eq!(lfu.len(), 2);
        assert_eq!(lfu.get(&2), None, "{strategy}");
        assert_eq!(lfu.get(&3), Some(&3), "{strategy}");
        lfu.check_invariants().unwrap();
    }
}

#[test]
fn test_tie_on_frequency_evicts_least_recent() {
    for strategy in STRATEGIES {
        let mut lfu = cache(strategy, 2);
        lfu.put(1, 1);
        lfu.put(2, 2);
        lfu.get(&1);
        lfu.put(3, 3);
        lfu.get(&3);

        // 1 and 3 both at frequency 2; 1 was touched earlier
        lfu.put(4, 4);
        assert_eq!(lfu.len(), 2);
        assert_eq!(lfu.get(&1), None, "{strategy}");
        assert_eq!(lfu.get(&3), Some(&3), "{strategy}");
        assert_eq!(lfu.get(&4), Some(&4), "{strategy}");

        assert_eq!(lfu.frequency_of(&3), Some(3));
        assert_eq!(lfu.frequency_of(&4), Some(2));
        lfu.check_invariants().unwrap();
    }
}

#[test]
fn test_zero_capacity_never_stores() {
    for strategy in STRATEGIES {
        let mut lfu = cache(strategy, 0);
        lfu.put(1, 1);
        assert_eq!(lfu.get(&1), None, "{strategy}");
        lfu.put(1, 2);
        assert_eq!(lfu.get(&1), None, "{strategy}");
        assert!(lfu.is_empty());
        assert_eq!(lfu.stats().inserts, 0);
        lfu.check_invariants().unwrap();
    }
}

#[test]
fn test_single_key_churn() {
    for strategy in STRATEGIES {
        let mut lfu = cache(strategy, 1);
        lfu.put(1, 1);
        lfu.put(1, 2);
        assert_eq!(lfu.get(&1), Some(&2), "{strategy}");
        assert_eq!(lfu.len(), 1);
        assert_eq!(lfu.stats().evictions, 0);
        assert_eq!(lfu.frequency_of(&1), Some(3));
    }
}

#[test]
fn test_emptied_frequency_is_not_revisited() {
    for strategy in STRATEGIES {
        let mut lfu = cache(strategy, 2);
        lfu.put(1, 1);
        lfu.put(2, 2);

        // Drain frequency 1 by promoting both keys
        lfu.get(&1);
        lfu.get(&2);
        assert_eq!(lfu.least_frequency(), Some(2), "{strategy}");

        // Drain frequency 2 as well
        lfu.get(&1);
        lfu.get(&2);
        assert_eq!(lfu.least_frequency(), Some(3), "{strategy}");
        lfu.check_invariants().unwrap();

        // Eviction must come from frequency 3, never a stale bucket
        lfu.put(3, 3);
        assert_eq!(lfu.get(&1), None, "{strategy}");
        assert_eq!(lfu.get(&2), Some(&2), "{strategy}");
        assert_eq!(lfu.least_frequency(), Some(1), "{strategy}");
        lfu.check_invariants().unwrap();
    }
}

#[test]
fn test_put_then_get_frequencies() {
    for strategy in STRATEGIES {
        let mut lfu = cache(strategy, 4);

        // New key: created at 1, first get makes it 2
        lfu.put(10, 100);
        assert_eq!(lfu.get(&10), Some(&100));
        assert_eq!(lfu.frequency_of(&10), Some(2), "{strategy}");

        // Existing key: +1 for the put, +1 for the get
        lfu.put(10, 101);
        assert_eq!(lfu.get(&10), Some(&101));
        assert_eq!(lfu.frequency_of(&10), Some(4), "{strategy}");
    }
}

#[test]
fn test_written_keys_count_as_recent() {
    for strategy in STRATEGIES {
        let mut lfu = cache(strategy, 2);
        lfu.put(1, 1);
        lfu.put(2, 2);

        // Both reach frequency 2 through writes; 1 is written last
        lfu.put(2, 22);
        lfu.put(1, 11);
        lfu.put(3, 3);

        assert!(!lfu.contains_key(&2), "{strategy}");
        assert_eq!(lfu.peek(&1), Some(&11));
        assert_eq!(lfu.peek(&3), Some(&3));
        assert_eq!(lfu.stats().updates, 2);
    }
}

#[test]
fn test_clear_resets_contents() {
    for strategy in STRATEGIES {
        let mut lfu = cache(strategy, 3);
        lfu.put(1, 1);
        lfu.put(2, 2);
        lfu.get(&1);

        lfu.clear();
        assert!(lfu.is_empty());
        assert_eq!(lfu.least_frequency(), None);
        assert_eq!(lfu.get(&1), None);

        lfu.put(5, 5);
        assert_eq!(lfu.least_frequency(), Some(1));
        lfu.check_invariants().unwrap();
    }
}
