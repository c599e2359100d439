use std::hash::Hash;
use std::time::{Duration, Instant};

use moka::sync::Cache;

/// A value that must not be served once `expires_at` is reached.
#[derive(Clone)]
struct Expirable<V> {
    expires_at: Instant,
    value: V,
}

impl<V> Expirable<V> {
    fn new(value: V, validity: Duration) -> Self {
        Self {
            expires_at: Instant::now() + validity,
            value,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// A bounded cache whose entries all share the same validity period.
///
/// Expired entries are never returned; they are lazily replaced by the next
/// [`ExpirableCache::insert`] on the same key.
#[derive(Clone)]
pub struct ExpirableCache<K, V> {
    cache: Cache<K, Expirable<V>>,
    validity: Duration,
}

impl<K, V> ExpirableCache<K, V>
where
    K: 'static + Eq + Hash + Send + Sync,
    V: 'static + Clone + Send + Sync,
{
    pub fn new(capacity: u64, validity: Duration) -> Self {
        Self {
            cache: Cache::new(capacity),
            validity,
        }
    }

    /// Returns the value if it exists and is not expired.
    pub fn get(&self, key: &K) -> Option<V> {
        self.cache.get(key).filter(|x| !x.is_expired()).map(|x| x.value)
    }

    pub fn insert(&self, key: K, value: V) {
        self.cache.insert(key, Expirable::new(value, self.validity));
    }
}
