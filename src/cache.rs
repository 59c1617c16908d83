//! Computed tables for apply memoization.
//!
//! The apply engine memoizes every recursive call on its operands, which turns
//! the exponential unfolding of shared sub-diagrams into work polynomial in the
//! diagram sizes. Entries are never evicted: a cache lives as long as its
//! manager, unless explicitly cleared.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::hash::Hash;

/// Hit/miss counters of a cache.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl std::ops::Add for CacheStats {
    type Output = CacheStats;

    fn add(self, rhs: Self) -> Self::Output {
        CacheStats {
            entries: self.entries + rhs.entries,
            hits: self.hits + rhs.hits,
            misses: self.misses + rhs.misses,
        }
    }
}

impl Display for CacheStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} entries, {} hits, {} misses ({:.1}% hit rate)",
            self.entries,
            self.hits,
            self.misses,
            100.0 * self.hit_rate()
        )
    }
}

/// A cache backed by [HashMap], with no collisions and no eviction.
pub struct Cache<K, V> {
    map: HashMap<K, V>,
    hits: usize,
    misses: usize,
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self::new(14)
    }
}

impl<K, V> Cache<K, V> {
    /// Creates a cache with room for `2^bits` entries before the first resize.
    ///
    /// # Panics
    ///
    /// Panics if `bits` exceeds 31.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Cache bits should be in the range 0..=31");
        Self {
            map: HashMap::with_capacity(1 << bits),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.map.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }

    /// Drops all entries and resets the counters.
    pub fn clear(&mut self) {
        self.map.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq,
    V: Copy,
{
    /// Looks up a key in the cache.
    #[inline]
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.map.get(key) {
            Some(&v) => {
                self.hits += 1;
                Some(v)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Inserts a key-value pair into the cache.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) {
        self.map.insert(key, value);
    }
}
