//! Get-or-compute memoization.
//!
//! Model quantities that need numeric integration (similarity integrals,
//! Gibbs function values) are cached behind a `Mutex` so that concurrent
//! callers never observe a half-written entry. The value is computed outside
//! the lock; two threads racing on the same key both compute and the first
//! insert wins.
//!
//! Tables are bounded: inserting a new key into a full table empties it
//! first, so solver trial points cannot grow a long-lived model without limit.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

/// Bitwise-hashed float for use inside structured cache keys.
///
/// `-0.0` is folded onto `0.0`; NaN keys compare equal to themselves.
#[derive(Debug, Clone, Copy)]
pub struct FloatKey(u64);

impl FloatKey {
    pub fn new(v: f64) -> Self {
        let v = if v == 0.0 { 0.0 } else { v };
        Self(v.to_bits())
    }

    pub fn value(self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl From<f64> for FloatKey {
    fn from(v: f64) -> Self {
        Self::new(v)
    }
}

impl PartialEq for FloatKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for FloatKey {}

impl Hash for FloatKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// Entries held by a [`MemoCache`] built with `new`/`default`.
pub const DEFAULT_MEMO_CAPACITY: usize = 4096;

/// Thread-safe memo table with get-or-compute semantics.
#[derive(Debug)]
pub struct MemoCache<K, V> {
    entries: Mutex<HashMap<K, V>>,
    capacity: usize,
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MEMO_CAPACITY)
    }
}

impl<K, V> MemoCache<K, V> {
    /// Table holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached value.
    pub fn get(&self, key: &K) -> Option<V> {
        let guard = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        guard.get(key).cloned()
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    pub fn get_or_compute<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(v) = self.get(&key) {
            return v;
        }
        let value = compute();
        self.insert(key, value)
    }

    /// Fallible variant: errors are returned and never cached.
    pub fn try_get_or_compute<F, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(v) = self.get(&key) {
            return Ok(v);
        }
        let value = compute()?;
        Ok(self.insert(key, value))
    }

    fn insert(&self, key: K, value: V) -> V {
        let mut guard = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        if guard.len() >= self.capacity && !guard.contains_key(&key) {
            guard.clear();
        }
        guard.entry(key).or_insert(value).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn computes_once_per_key() {
        let cache: MemoCache<(u8, FloatKey), f64> = MemoCache::new();
        let calls = Cell::new(0);
        let f = || {
            calls.set(calls.get() + 1);
            42.0
        };
        assert_eq!(cache.get_or_compute((1, FloatKey::new(1873.0)), f), 42.0);
        assert_eq!(
            cache.get_or_compute((1, FloatKey::new(1873.0)), || unreachable!()),
            42.0
        );
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn float_key_folds_negative_zero() {
        assert_eq!(FloatKey::new(0.0), FloatKey::new(-0.0));
        assert_ne!(FloatKey::new(1.0), FloatKey::new(1.0 + 1e-12));
    }

    #[test]
    fn errors_are_not_cached() {
        let cache: MemoCache<u32, f64> = MemoCache::new();
        let r: Result<f64, &str> = cache.try_get_or_compute(7, || Err("boom"));
        assert!(r.is_err());
        assert!(cache.is_empty());
        let r: Result<f64, &str> = cache.try_get_or_compute(7, || Ok(1.5));
        assert_eq!(r, Ok(1.5));
    }

    #[test]
    fn full_table_starts_over() {
        let cache: MemoCache<u32, f64> = MemoCache::with_capacity(3);
        for k in 0..3 {
            cache.get_or_compute(k, || k as f64);
        }
        assert_eq!(cache.len(), 3);
        // Hits never evict.
        assert_eq!(cache.get_or_compute(1, || unreachable!()), 1.0);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get_or_compute(10, || 10.0), 10.0);
        assert_eq!(cache.len(), 1);
        for k in 0..1000 {
            cache.get_or_compute(k, || 0.0);
        }
        assert!(cache.len() <= cache.capacity());
        assert_eq!(MemoCache::<u32, f64>::new().capacity(), DEFAULT_MEMO_CAPACITY);
    }

    #[test]
    fn clear_empties_cache() {
        let cache: MemoCache<u32, f64> = MemoCache::new();
        cache.get_or_compute(1, || 1.0);
        cache.clear();
        assert!(cache.is_empty());
    }
}
