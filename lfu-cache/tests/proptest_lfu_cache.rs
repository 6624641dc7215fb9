//! Property-based tests for the LFU strategies.
//!
//! Verifies against an exhaustive-scan reference model:
//! - Capacity bound: len() <= capacity() at all times, nothing stored at 0
//! - Residency: resident keys are exactly those inserted and not evicted
//! - Frequency: +1 per get or put on a resident key, 1 on first insert
//! - Least frequency: equals the minimum over resident entries
//! - Eviction ordering: lowest frequency, then least recently touched
//! - Round trip: put(k, v) then get(k) returns v
//! - Differential: bucketed and ordered strategies agree on every result

use proptest::prelude::*;
use std::collections::HashMap;

use lfu_cache::{CacheStrategy, FrequencyCache, LfuCache, build_cache};

// ────────────────────────────────────────────────────────────────────
// Strategies
// ────────────────────────────────────────────────────────────────────

fn arb_capacity() -> impl Strategy<Value = usize> {
    0usize..=8
}

fn arb_key() -> impl Strategy<Value = u8> {
    0u8..16
}

#[derive(Debug, Clone)]
enum Op {
    Put(u8, i32),
    Get(u8),
    Peek(u8),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (arb_key(), any::<i32>()).prop_map(|(k, v)| Op::Put(k, v)),
        arb_key().prop_map(Op::Get),
        arb_key().prop_map(Op::Peek),
    ]
}

fn arb_ops(max: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(arb_op(), 1..max)
}

/// Reference model: flat map, victim found by scanning for the lowest
/// (frequency, last touch) pair.
struct RefModel {
    capacity: usize,
    tick: u64,
    entries: HashMap<u8, (i32, u64, u64)>, // key → (value, frequency, touched)
}

impl RefModel {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            tick: 0,
            entries: HashMap::new(),
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn get(&mut self, key: u8) -> Option<i32> {
        let tick = self.next_tick();
        let entry = self.entries.get_mut(&key)?;
        entry.1 += 1;
        entry.2 = tick;
        Some(entry.0)
    }

    fn put(&mut self, key: u8, value: i32) -> Option<u8> {
        let tick = self.next_tick();
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.0 = value;
            entry.1 += 1;
            entry.2 = tick;
            return None;
        }
        if self.capacity == 0 {
            return None;
        }
        let evicted = if self.entries.len() >= self.capacity {
            let victim = self
                .entries
                .iter()
                .min_by_key(|(_, (_, frequency, touched))| (*frequency, *touched))
                .map(|(k, _)| *k)
                .unwrap();
            self.entries.remove(&victim);
            Some(victim)
        } else {
            None
        };
        self.entries.insert(key, (value, 1, tick));
        evicted
    }

    fn peek(&self, key: u8) -> Option<i32> {
        self.entries.get(&key).map(|e| e.0)
    }

    fn frequency_of(&self, key: u8) -> Option<u64> {
        self.entries.get(&key).map(|e| e.1)
    }

    fn least_frequency(&self) -> Option<u64> {
        self.entries.values().map(|e| e.1).min()
    }
}

fn check_against_model(
    strategy: CacheStrategy,
    capacity: usize,
    ops: &[Op],
) -> Result<(), TestCaseError> {
    let mut cache: Box<dyn FrequencyCache<u8, i32> + Send> = build_cache(strategy, capacity);
    let mut model = RefModel::new(capacity);

    for op in ops {
        match *op {
            Op::Put(k, v) => {
                let evicted = model.put(k, v);
                cache.put(k, v);
                if let Some(victim) = evicted {
                    prop_assert!(!cache.contains_key(&victim), "victim {} still resident", victim);
                }
            }
            Op::Get(k) => {
                let expected = model.get(k);
                prop_assert_eq!(cache.get(&k).copied(), expected);
            }
            Op::Peek(k) => {
                prop_assert_eq!(cache.peek(&k).copied(), model.peek(k));
            }
        }

        prop_assert!(cache.len() <= capacity);
        prop_assert_eq!(cache.len(), model.entries.len());
        prop_assert_eq!(cache.least_frequency(), model.least_frequency());
        for key in 0u8..16 {
            prop_assert_eq!(cache.frequency_of(&key), model.frequency_of(key));
        }
        prop_assert!(cache.check_invariants().is_ok());
    }
    Ok(())
}

proptest! {
    #[test]
    fn bucketed_matches_model(capacity in arb_capacity(), ops in arb_ops(200)) {
        check_against_model(CacheStrategy::Bucketed, capacity, &ops)?;
    }

    #[test]
    fn ordered_matches_model(capacity in arb_capacity(), ops in arb_ops(200)) {
        check_against_model(CacheStrategy::Ordered, capacity, &ops)?;
    }

    #[test]
    fn strategies_agree(capacity in arb_capacity(), ops in arb_ops(300)) {
        let mut bucketed = build_cache::<u8, i32>(CacheStrategy::Bucketed, capacity);
        let mut ordered = build_cache::<u8, i32>(CacheStrategy::Ordered, capacity);

        for op in &ops {
            match *op {
                Op::Put(k, v) => {
                    bucketed.put(k, v);
                    ordered.put(k, v);
                }
                Op::Get(k) => {
                    prop_assert_eq!(bucketed.get(&k).copied(), ordered.get(&k).copied());
                }
                Op::Peek(k) => {
                    prop_assert_eq!(bucketed.peek(&k).copied(), ordered.peek(&k).copied());
                }
            }
            prop_assert_eq!(bucketed.len(), ordered.len());
            prop_assert_eq!(bucketed.least_frequency(), ordered.least_frequency());
        }
        prop_assert_eq!(bucketed.stats(), ordered.stats());
    }

    #[test]
    fn zero_capacity_admits_nothing(ops in arb_ops(100)) {
        let mut cache = LfuCache::new(0);
        for op in &ops {
            match *op {
                Op::Put(k, v) => cache.put(k, v),
                Op::Get(k) => prop_assert_eq!(cache.get(&k), None),
                Op::Peek(k) => prop_assert_eq!(cache.peek(&k), None),
            }
            prop_assert!(cache.is_empty());
        }
        prop_assert_eq!(cache.bucket_count(), 0);
    }

    #[test]
    fn put_then_get_round_trips(
        capacity in 1usize..=8,
        ops in arb_ops(100),
        key in arb_key(),
        value in any::<i32>(),
    ) {
        let mut cache = LfuCache::new(capacity);
        for op in &ops {
            match *op {
                Op::Put(k, v) => cache.put(k, v),
                Op::Get(k) => { cache.get(&k); }
                Op::Peek(k) => { cache.peek(&k); }
            }
        }

        let before = cache.frequency_of(&key);
        cache.put(key, value);
        prop_assert_eq!(cache.get(&key).copied(), Some(value));
        let expected = before.map_or(2, |f| f + 2);
        prop_assert_eq!(cache.frequency_of(&key), Some(expected));
    }

    #[test]
    fn frequency_is_monotonic_while_resident(capacity in 1usize..=8, ops in arb_ops(200)) {
        let mut cache = LfuCache::new(capacity);
        let mut last_seen: HashMap<u8, u64> = HashMap::new();

        for op in &ops {
            let key = match *op {
                Op::Put(k, v) => { cache.put(k, v); k }
                Op::Get(k) => { cache.get(&k); k }
                Op::Peek(k) => { cache.peek(&k); k }
            };

            // Evicted keys start over
            last_seen.retain(|k, _| cache.contains_key(k));

            if let Some(frequency) = cache.frequency_of(&key) {
                if let Some(&previous) = last_seen.get(&key) {
                    let step = match op { Op::Peek(_) => 0, _ => 1 };
                    prop_assert_eq!(frequency, previous + step);
                }
                last_seen.insert(key, frequency);
            }
        }
    }
}
