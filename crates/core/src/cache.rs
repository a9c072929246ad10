//! Bounded LRU caches for derived propagation kernels.
//!
//! Iterative engines request the same kernel thousands of times per
//! reconstruction; rebuilding it each call would dominate the runtime.
//! Each kernel kind keeps its own small cache, keyed by the full normalized
//! parameter tuple. Values are handed out as shared `Arc` handles, so a hit
//! returns the stored allocation itself rather than a numerically equal
//! copy.

use std::collections::VecDeque;
use std::sync::Arc;

/// How many kernels are retained per kernel kind. Higher can be faster for
/// parameter sweeps but costs (device) memory.
pub const DEFAULT_KERNEL_CACHE_CAPACITY: usize = 10;

/// Hit/miss counters and current occupancy of one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// `f64` cache-key component compared and hashed by exact bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitKey(u64);

impl From<f64> for BitKey {
    fn from(value: f64) -> Self {
        Self(value.to_bits())
    }
}

/// Normalized immutable form of a sequence-valued parameter (the spectral
/// density), converted to an ordered tuple of bit patterns before lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpectrumKey(Vec<u64>);

impl SpectrumKey {
    pub fn new(values: &[f64]) -> Self {
        Self(values.iter().map(|v| v.to_bits()).collect())
    }
}

/// Bounded cache with least-recently-used eviction.
///
/// Lookup is a linear scan; capacities are small enough (default 10) that
/// this beats hashing the key twice.
#[derive(Debug)]
pub struct KernelCache<K, V> {
    capacity: usize,
    // front = most recently used
    entries: VecDeque<(K, Arc<V>)>,
    hits: u64,
    misses: u64,
}

impl<K: PartialEq, V> KernelCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be non-zero");
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached value for `key`, computing and retaining it on a
    /// miss. A hit refreshes the entry's recency and returns the stored
    /// allocation.
    pub fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce() -> V) -> Arc<V> {
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            self.hits += 1;
            let entry = self.entries.remove(pos).expect("position is in bounds");
            self.entries.push_front(entry);
            return Arc::clone(&self.entries[0].1);
        }
        self.misses += 1;
        let value = Arc::new(compute());
        self.entries.push_front((key, Arc::clone(&value)));
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
        value
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
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
