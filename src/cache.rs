//! Bounded insertion-ordered cache.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Default number of icons kept alive at once.
pub const DEFAULT_CAPACITY: usize = 50;

/// A map with a hard size limit that evicts the oldest insertion first.
///
/// Lookups never refresh an entry's position; eviction order is purely the
/// order of insertion. Evicted values are handed back to the caller so it can
/// release whatever they own.
#[derive(Debug)]
pub struct FifoCache<K, V> {
    capacity: usize,
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Copy, V> FifoCache<K, V> {
    /// Creates an empty cache holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts an entry, returning the one it displaced.
    ///
    /// A new key arriving at a full cache first evicts the oldest entry. An
    /// existing key has its value replaced in place and keeps its position.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(old) = self.entries.insert(key, value) {
            return Some((key, old));
        }

        let evicted = if self.order.len() >= self.capacity {
            self.pop_oldest()
        } else {
            None
        };
        self.order.push_back(key);
        evicted
    }

    /// Removes and returns the oldest entry.
    pub fn pop_oldest(&mut self) -> Option<(K, V)> {
        while let Some(key) = self.order.pop_front() {
            if let Some(value) = self.entries.remove(&key) {
                return Some((key, value));
            }
        }
        None
    }

    /// Empties the cache, yielding entries oldest first.
    pub fn drain(&mut self) -> Vec<(K, V)> {
        let mut drained = Vec::with_capacity(self.entries.len());
        while let Some(entry) = self.pop_oldest() {
            drained.push(entry);
        }
        drained
    }

    /// Keys in insertion order, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K: Eq + Hash + Copy, V> Default for FifoCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
