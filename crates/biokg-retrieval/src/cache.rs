//! Bounded memoization shared by concurrent queries.
//!
//! Entries are evicted first-in first-out once `capacity` is reached.
//! Values are cloned out so the lock is never held across graph access.

use ahash::AHashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::hash::Hash;

pub(crate) struct BoundedCache<K, V> {
    capacity: usize,
    inner: Mutex<CacheInner<K, V>>,
}

struct CacheInner<K, V> {
    entries: AHashMap<K, V>,
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V: Clone> BoundedCache<K, V> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner {
                entries: AHashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        if self.capacity == 0 {
            return None;
        }
        self.inner.lock().entries.get(key).cloned()
    }

    pub(crate) fn insert(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.inner.lock();
        if inner.entries.contains_key(&key) {
            inner.entries.insert(key, value);
            return;
        }
        while inner.entries.len() >= self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
        inner.order.push_back(key.clone());
        inner.entries.insert(key, value);
    }

    /// Return the cached value or compute, store and return it.
    pub(crate) fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(hit) = self.get(&key) {
            return hit;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }
}
