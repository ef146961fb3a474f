// src/render/tint_cache.rs
//
// Bounded least-recently-used cache of tinted textures.

use super::TintKey;
use std::collections::HashMap;

struct CacheEntry<T> {
    value: T,
    last_used: u64,
}

pub struct TintCache<T> {
    entries: HashMap<TintKey, CacheEntry<T>>,
    capacity: usize,
    clock: u64,
}

impl<T> TintCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            clock: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &TintKey) -> Option<&T> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Look up `key`, creating the value if missing. Evicts the least recently
    /// used entry when full.
    pub fn get_or_insert_with<F>(&mut self, key: TintKey, create: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.clock += 1;
        let clock = self.clock;

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        let entry = self.entries.entry(key).or_insert_with(|| CacheEntry {
            value: create(),
            last_used: clock,
        });
        entry.last_used = clock;
        &entry.value
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| *key);
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}
