//! In-memory caches shared by the API clients
//!
//! Every cache follows the same contract: it starts empty, the first
//! successful fetch populates it, and later reads are served from memory for
//! the rest of the process. Nothing is ever invalidated.
//!
//! - Whole-response caches are plain `tokio::sync::OnceCell`s owned by each
//!   client (`get_or_try_init` makes read-check-populate atomic).
//! - [`KeyedCache`] holds per-key entries such as player details by name.
//! - [`AppendList`] holds a fetched list that individual lookups may extend.

use std::{
    collections::HashMap,
    hash::Hash,
    sync::{Mutex, MutexGuard},
};


fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock cannot leave a half-written entry behind,
    // so a poisoned cache is still usable.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Populate-once map from key to value.
#[derive(Debug)]
pub struct KeyedCache<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> Default for KeyedCache<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Hash + Eq, V: Clone> KeyedCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, if one was stored.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        lock(&self.entries).get(key).cloned()
    }

    /// Store `value` under `key`, replacing an older entry.
    pub fn insert(&self, key: K, value: V) {
        lock(&self.entries).insert(key, value);
    }
}

/// A fetched list that single-item lookups can append to.
#[derive(Debug)]
pub struct AppendList<T> {
    items: Mutex<Vec<T>>,
}

impl<T: Clone> AppendList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    /// First item matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        lock(&self.items).iter().find(|item| predicate(item)).cloned()
    }

    pub fn push(&self, item: T) {
        lock(&self.items).push(item);
    }

    pub fn to_vec(&self) -> Vec<T> {
        lock(&self.items).clone()
    }
}
