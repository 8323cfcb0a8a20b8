//! Bounded in-memory cache with first-in-first-out eviction.
//!
//! Reads never refresh an entry's position and overwriting a key keeps its
//! original slot. There is no expiry: an entry lives until enough newer keys
//! push it out.

use accessnav_core::{CacheKey, DirectionsResponse};
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 100;

/// Enriched directions keyed by request fingerprint.
pub type RouteCache = FifoCache<CacheKey, Arc<DirectionsResponse>>;

pub struct FifoCache<K, V> {
    capacity: usize,
    inner: Mutex<FifoInner<K, V>>,
}

struct FifoInner<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K, V> FifoCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Capacity is clamped to at least one entry.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(FifoInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FifoInner<K, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().entries.get(key).cloned()
    }

    /// Insert or overwrite, then evict oldest entries down to capacity.
    /// Returns the number of evicted entries.
    pub fn put(&self, key: K, value: V) -> usize {
        let mut inner = self.lock();
        if inner.entries.insert(key.clone(), value).is_none() {
            inner.order.push_back(key);
        }

        let mut evicted = 0;
        while inner.entries.len() > self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
            evicted += 1;
        }
        evicted
    }

    #[cfg(test)]
    pub fn contains(&self, key: &K) -> bool {
        self.lock().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from oldest to newest.
    #[cfg(test)]
    pub fn keys(&self) -> Vec<K> {
        self.lock().order.iter().cloned().collect()
    }

    #[cfg(test)]
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}

impl<K, V> Default for FifoCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_ROUTE_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_never_exceeds_capacity_and_keeps_newest() {
        let cache: FifoCache<u32, u32> = FifoCache::new(100);
        for i in 0..101 {
            cache.put(i, i * 10);
            assert!(cache.len() <= 100);
        }
        assert_eq!(cache.len(), 100);
        assert!(!cache.contains(&0));
        assert_eq!(cache.keys(), (1..101).collect::<Vec<_>>());
        assert_eq!(cache.get(&100), Some(1000));
    }

    #[test]
    fn reads_do_not_refresh_position() {
        let cache: FifoCache<&str, u32> = FifoCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.get(&"a"), Some(1));
        cache.put("c", 3);
        assert!(!cache.contains(&"a"));
        assert!(cache.contains(&"b"));
        assert!(cache.contains(&"c"));
    }

    #[test]
    fn overwrite_keeps_original_slot() {
        let cache: FifoCache<&str, u32> = FifoCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.put("a", 10), 0);
        assert_eq!(cache.get(&"a"), Some(10));
        assert_eq!(cache.put("c", 3), 1);
        assert!(!cache.contains(&"a"));
        assert_eq!(cache.keys(), vec!["b", "c"]);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let cache: FifoCache<u8, u8> = FifoCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.put(1, 1);
        cache.put(2, 2);
        assert_eq!(cache.keys(), vec![2]);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_puts_respect_bound() {
        let cache: Arc<FifoCache<usize, usize>> = Arc::new(FifoCache::new(50));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..500 {
                        cache.put(t * 1_000 + i, i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 50);
        assert_eq!(cache.keys().len(), 50);
    }
}
